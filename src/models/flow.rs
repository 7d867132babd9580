use uuid::Uuid;

use super::alert::{Direction, Timeframe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Price,
    SharpTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceFlowState {
    AwaitSymbol,
    AwaitType,
    AwaitPrice,
    /// Completion in flight. A text racing the save matches no step and is
    /// dropped instead of double-saving.
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharpFlowState {
    AwaitSymbol,
    AwaitTimeframe,
    AwaitPriceA,
    AwaitPriceB,
    Saving,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceFlow {
    pub state: PriceFlowState,
    pub symbol: Option<String>,
    pub direction: Option<Direction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SharpTurnFlow {
    pub state: SharpFlowState,
    pub symbol: Option<String>,
    pub timeframe: Option<Timeframe>,
    pub price_a: Option<f64>,
}

/// Kind-specific payload. Keeping the two shapes separate means a price
/// step can't touch timeframe fields and vice versa.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowData {
    Price(PriceFlow),
    SharpTurn(SharpTurnFlow),
}

/// One in-progress alert-creation conversation. The id correlates button
/// callbacks back to this flow even when several are interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub id: String,
    pub data: FlowData,
}

impl Flow {
    pub fn new(kind: FlowKind) -> Flow {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(8);

        let data = match kind {
            FlowKind::Price => FlowData::Price(PriceFlow {
                state: PriceFlowState::AwaitSymbol,
                symbol: None,
                direction: None,
            }),
            FlowKind::SharpTurn => FlowData::SharpTurn(SharpTurnFlow {
                state: SharpFlowState::AwaitSymbol,
                symbol: None,
                timeframe: None,
                price_a: None,
            }),
        };

        Flow { id, data }
    }

    pub fn kind(&self) -> FlowKind {
        match self.data {
            FlowData::Price(_) => FlowKind::Price,
            FlowData::SharpTurn(_) => FlowKind::SharpTurn,
        }
    }
}
