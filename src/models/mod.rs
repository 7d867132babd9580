pub mod alert;
pub mod event;
pub mod flow;

pub use alert::{Direction, OwnerId, PriceAlert, SharpTurnAlert, Timeframe};
pub use event::{Button, Inbound, Keyboard, Outbound};
pub use flow::{Flow, FlowData, FlowKind, PriceFlow, PriceFlowState, SharpFlowState, SharpTurnFlow};
