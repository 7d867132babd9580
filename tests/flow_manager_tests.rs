use tickwatch::models::{FlowData, FlowKind, PriceFlowState};
use tickwatch::services::flow_manager::FlowManager;

const OWNER: i64 = 1001;

#[test]
fn flows_queue_fifo_and_never_replace() {
    let flows = FlowManager::new();

    let first = flows.start(OWNER, FlowKind::Price);
    let second = flows.start(OWNER, FlowKind::SharpTurn);

    assert_ne!(first.id, second.id);
    assert_eq!(flows.open_flows(OWNER), 2);
    assert_eq!(flows.head(OWNER).unwrap().id, first.id);
    assert_eq!(flows.find(OWNER, &second.id).unwrap().id, second.id);
}

#[test]
fn advance_applies_only_when_the_mutation_accepts() {
    let flows = FlowManager::new();
    let flow = flows.start(OWNER, FlowKind::Price);

    // Caller expects AwaitType, but the flow is still AwaitSymbol: the
    // mutation rejects and the stored flow must be untouched.
    let before = flows.find(OWNER, &flow.id).unwrap();
    let advanced = flows.advance(OWNER, &flow.id, |f| match &mut f.data {
        FlowData::Price(p) if p.state == PriceFlowState::AwaitType => {
            p.state = PriceFlowState::AwaitPrice;
            Some(())
        }
        _ => None,
    });
    assert!(advanced.is_none());
    assert_eq!(flows.find(OWNER, &flow.id).unwrap(), before);

    // Matching expectation goes through.
    let advanced = flows.advance(OWNER, &flow.id, |f| match &mut f.data {
        FlowData::Price(p) if p.state == PriceFlowState::AwaitSymbol => {
            p.symbol = Some("EURUSD".to_string());
            p.state = PriceFlowState::AwaitType;
            Some(())
        }
        _ => None,
    });
    assert!(advanced.is_some());

    let after = flows.find(OWNER, &flow.id).unwrap();
    match after.data {
        FlowData::Price(p) => {
            assert_eq!(p.state, PriceFlowState::AwaitType);
            assert_eq!(p.symbol.as_deref(), Some("EURUSD"));
        }
        _ => panic!("flow changed kind"),
    }
}

#[test]
fn advance_on_a_missing_flow_is_reported() {
    let flows = FlowManager::new();
    flows.start(OWNER, FlowKind::Price);

    let advanced = flows.advance(OWNER, "nope", |_| Some(()));
    assert!(advanced.is_none());

    let advanced = flows.advance(OWNER + 1, "nope", |_| Some(()));
    assert!(advanced.is_none());
}

#[test]
fn remove_handles_head_middle_and_missing() {
    let flows = FlowManager::new();
    let a = flows.start(OWNER, FlowKind::Price);
    let b = flows.start(OWNER, FlowKind::Price);
    let c = flows.start(OWNER, FlowKind::SharpTurn);

    // Middle removal keeps order of the rest.
    assert!(flows.remove(OWNER, &b.id));
    assert_eq!(flows.head(OWNER).unwrap().id, a.id);
    assert_eq!(flows.open_flows(OWNER), 2);

    // Head removal promotes the next flow.
    assert!(flows.remove(OWNER, &a.id));
    assert_eq!(flows.head(OWNER).unwrap().id, c.id);

    assert!(!flows.remove(OWNER, &a.id));
    assert!(flows.remove(OWNER, &c.id));
    assert_eq!(flows.open_flows(OWNER), 0);
    assert!(flows.head(OWNER).is_none());
}

#[test]
fn advance_head_targets_only_the_first_flow() {
    let flows = FlowManager::new();
    let first = flows.start(OWNER, FlowKind::Price);
    let second = flows.start(OWNER, FlowKind::Price);

    let seen = flows.advance_head(OWNER, |f| Some(f.id.clone()));
    assert_eq!(seen.as_deref(), Some(first.id.as_str()));

    // The non-head flow is reachable by id, untouched by head stepping.
    assert_eq!(flows.find(OWNER, &second.id).unwrap(), second);
}
