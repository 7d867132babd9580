use crate::models::{
    Button, Direction, FlowData, FlowKind, Inbound, Keyboard, Outbound, OwnerId, PriceAlert,
    PriceFlowState, SharpFlowState, SharpTurnAlert, Timeframe,
};
use crate::{auth, AppState};

/// Entry point for every inbound event. Returns the replies to deliver;
/// nothing is sent from in here, so no reply I/O ever runs under a store
/// lock.
pub async fn dispatch(state: &AppState, event: Inbound) -> Vec<Outbound> {
    match event {
        Inbound::Command { owner, name } => {
            if !auth::is_allowed(&state.settings, owner) {
                return vec![Outbound::send(owner, "❌ You are not authorized to use this bot.")];
            }
            match name.as_str() {
                "/start" => start_menu(owner),
                "/listalerts" => list_alerts(state, owner),
                _ => Vec::new(),
            }
        }
        Inbound::Text { owner, text } => {
            if !auth::is_allowed(&state.settings, owner) {
                return vec![Outbound::send(owner, "❌ You are not authorized to use this bot.")];
            }
            handle_text(state, owner, text.trim()).await
        }
        Inbound::Callback { owner, callback_id, message_id, data } => {
            if !auth::is_allowed(&state.settings, owner) {
                return Vec::new();
            }
            handle_callback(state, owner, callback_id, message_id, &data).await
        }
    }
}

// ---------------- Commands ----------------

fn start_menu(owner: OwnerId) -> Vec<Outbound> {
    let keyboard = Keyboard::default().row(vec![
        Button::new("📈 Set Price Alert", "menu_price"),
        Button::new("⚡ SharpTurn Alert", "menu_sharpturn"),
    ]);

    vec![Outbound::send_keyboard(owner, "Hello! Choose an option:", keyboard)]
}

fn list_alerts(state: &AppState, owner: OwnerId) -> Vec<Outbound> {
    let (price, sharp) = state.alerts.list_by_owner(owner);

    if price.is_empty() && sharp.is_empty() {
        return vec![Outbound::send(owner, "You have no saved alerts.")];
    }

    let mut lines: Vec<String> = Vec::new();
    if !price.is_empty() {
        lines.push("📈 Price Alerts:".to_string());
        for a in &price {
            lines.push(format!("  • {} → {} ({})", a.symbol, a.target, a.direction.as_str()));
        }
    }
    if !sharp.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("⚡ SharpTurn Alerts:".to_string());
        for a in &sharp {
            lines.push(format!(
                "  • {} | {} | A={} B={}",
                a.symbol,
                a.timeframe.label(),
                a.price_a,
                a.price_b
            ));
        }
    }

    vec![Outbound::send(owner, lines.join("\n"))]
}

// ---------------- Callbacks ----------------

async fn handle_callback(
    state: &AppState,
    owner: OwnerId,
    callback_id: String,
    message_id: i64,
    data: &str,
) -> Vec<Outbound> {
    match data {
        "menu_price" => begin_flow(state, owner, callback_id, FlowKind::Price),
        "menu_sharpturn" => begin_flow(state, owner, callback_id, FlowKind::SharpTurn),
        _ if data.starts_with("price_type|") => {
            price_type_selected(state, owner, callback_id, message_id, data)
        }
        _ if data.starts_with("sharp_tf|") => {
            timeframe_selected(state, owner, callback_id, message_id, data)
        }
        _ => vec![Outbound::ack(callback_id)],
    }
}

fn begin_flow(
    state: &AppState,
    owner: OwnerId,
    callback_id: String,
    kind: FlowKind,
) -> Vec<Outbound> {
    let flow = state.flows.start(owner, kind);

    let prompt = match kind {
        FlowKind::Price => format!(
            "✍️ (Price Alert) Enter symbol (case insensitive). This alert id: {}",
            flow.id
        ),
        FlowKind::SharpTurn => format!(
            "✍️ (SharpTurn) Enter symbol (case insensitive). This alert id: {}",
            flow.id
        ),
    };

    vec![Outbound::ack(callback_id), Outbound::send(owner, prompt)]
}

/// `price_type|<flow_id>|<BUY|SELL>`: applies to the addressed flow, not
/// the head, but only if that flow is still waiting for a type.
fn price_type_selected(
    state: &AppState,
    owner: OwnerId,
    callback_id: String,
    message_id: i64,
    data: &str,
) -> Vec<Outbound> {
    let mut parts = data.splitn(3, '|');
    parts.next();
    let (Some(flow_id), Some(raw)) = (parts.next(), parts.next()) else {
        return Vec::new();
    };
    let Some(direction) = Direction::parse(raw) else {
        return Vec::new();
    };

    let advanced = state.flows.advance(owner, flow_id, |flow| match &mut flow.data {
        FlowData::Price(p) if p.state == PriceFlowState::AwaitType => {
            let symbol = p.symbol.clone()?;
            p.direction = Some(direction);
            p.state = PriceFlowState::AwaitPrice;
            Some(symbol)
        }
        _ => None,
    });

    match advanced {
        Some(symbol) => vec![
            Outbound::Edit {
                owner,
                message_id,
                text: format!(
                    "✅ Type set: {}\n✍️ Now enter target price for {symbol}:",
                    direction.as_str()
                ),
            },
            Outbound::ack(callback_id),
        ],
        None => vec![Outbound::reject(callback_id, "Flow not found or not waiting for type.")],
    }
}

/// `sharp_tf|<flow_id>|<timeframe>`: same addressing rules as the type
/// selection.
fn timeframe_selected(
    state: &AppState,
    owner: OwnerId,
    callback_id: String,
    message_id: i64,
    data: &str,
) -> Vec<Outbound> {
    let mut parts = data.splitn(3, '|');
    parts.next();
    let (Some(flow_id), Some(raw)) = (parts.next(), parts.next()) else {
        return Vec::new();
    };
    let Some(timeframe) = Timeframe::parse(raw) else {
        return Vec::new();
    };

    let advanced = state.flows.advance(owner, flow_id, |flow| match &mut flow.data {
        FlowData::SharpTurn(s) if s.state == SharpFlowState::AwaitTimeframe => {
            let symbol = s.symbol.clone()?;
            s.timeframe = Some(timeframe);
            s.state = SharpFlowState::AwaitPriceA;
            Some(symbol)
        }
        _ => None,
    });

    match advanced {
        Some(symbol) => vec![
            Outbound::Edit {
                owner,
                message_id,
                text: format!(
                    "✅ Timeframe set: {}\n✍️ Now enter first price (A) for {symbol}:",
                    timeframe.label()
                ),
            },
            Outbound::ack(callback_id),
        ],
        None => vec![Outbound::reject(callback_id, "Flow not found or expired.")],
    }
}

// ---------------- Text (head flow) ----------------

/// What the head flow asked for, captured under the queue lock and executed
/// after release.
enum Step {
    Reply(String),
    ReplyKeyboard(String, Keyboard),
    SavePrice {
        flow_id: String,
        symbol: String,
        target: f64,
        direction: Direction,
    },
    SaveSharp {
        flow_id: String,
        symbol: String,
        timeframe: Timeframe,
        price_a: f64,
        price_b: f64,
    },
}

async fn handle_text(state: &AppState, owner: OwnerId, text: &str) -> Vec<Outbound> {
    let step = state.flows.advance_head(owner, |flow| {
        let flow_id = flow.id.clone();
        match &mut flow.data {
            FlowData::Price(p) => match p.state {
                PriceFlowState::AwaitSymbol => {
                    let symbol = text.to_uppercase();
                    p.symbol = Some(symbol.clone());
                    p.state = PriceFlowState::AwaitType;

                    let keyboard = Keyboard::default()
                        .row(vec![Button::new(
                            "BUY (>= target)",
                            format!("price_type|{flow_id}|BUY"),
                        )])
                        .row(vec![Button::new(
                            "SELL (<= target)",
                            format!("price_type|{flow_id}|SELL"),
                        )]);

                    Some(Step::ReplyKeyboard(
                        format!("✅ Symbol set for Price Alert: {symbol}\nChoose type:"),
                        keyboard,
                    ))
                }
                PriceFlowState::AwaitPrice => match text.parse::<f64>() {
                    Err(_) => Some(Step::Reply(
                        "⚠️ Please enter a valid number for the price.".to_string(),
                    )),
                    Ok(target) => {
                        let symbol = p.symbol.clone().unwrap_or_default();
                        let direction = p.direction.unwrap_or(Direction::Buy);
                        p.state = PriceFlowState::Saving;
                        Some(Step::SavePrice { flow_id, symbol, target, direction })
                    }
                },
                // AwaitType is button-driven, Saving is terminal.
                _ => None,
            },
            FlowData::SharpTurn(s) => match s.state {
                SharpFlowState::AwaitSymbol => {
                    let symbol = text.to_uppercase();
                    s.symbol = Some(symbol.clone());
                    s.state = SharpFlowState::AwaitTimeframe;

                    let mut keyboard = Keyboard::default();
                    for tf in Timeframe::ALL {
                        keyboard = keyboard.row(vec![Button::new(
                            tf.label(),
                            format!("sharp_tf|{flow_id}|{}", tf.label()),
                        )]);
                    }

                    Some(Step::ReplyKeyboard(
                        format!("✅ Symbol set for SharpTurn: {symbol}\n⏱ Select timeframe:"),
                        keyboard,
                    ))
                }
                SharpFlowState::AwaitPriceA => match text.parse::<f64>() {
                    Err(_) => Some(Step::Reply(
                        "⚠️ Please enter a valid number for price A.".to_string(),
                    )),
                    Ok(price_a) => {
                        s.price_a = Some(price_a);
                        s.state = SharpFlowState::AwaitPriceB;
                        let symbol = s.symbol.clone().unwrap_or_default();
                        let tf = s.timeframe.map(|t| t.label()).unwrap_or_default();
                        Some(Step::Reply(format!(
                            "✍️ Now enter second price (B) for {symbol} on {tf}:"
                        )))
                    }
                },
                SharpFlowState::AwaitPriceB => match text.parse::<f64>() {
                    Err(_) => Some(Step::Reply(
                        "⚠️ Please enter a valid number for price B.".to_string(),
                    )),
                    Ok(price_b) => {
                        let symbol = s.symbol.clone().unwrap_or_default();
                        let timeframe = s.timeframe.unwrap_or(Timeframe::H1);
                        let price_a = s.price_a.unwrap_or_default();
                        s.state = SharpFlowState::Saving;
                        Some(Step::SaveSharp { flow_id, symbol, timeframe, price_a, price_b })
                    }
                },
                _ => None,
            },
        }
    });

    let Some(step) = step else {
        // No open flow, or the head isn't consuming text right now.
        if text.eq_ignore_ascii_case("hi") {
            return vec![Outbound::send(owner, "hi 👋")];
        }
        return Vec::new();
    };

    match step {
        Step::Reply(text) => vec![Outbound::send(owner, text)],
        Step::ReplyKeyboard(text, keyboard) => vec![Outbound::send_keyboard(owner, text, keyboard)],
        Step::SavePrice { flow_id, symbol, target, direction } => {
            save_price(state, owner, flow_id, symbol, target, direction).await
        }
        Step::SaveSharp { flow_id, symbol, timeframe, price_a, price_b } => {
            save_sharp(state, owner, flow_id, symbol, timeframe, price_a, price_b)
        }
    }
}

// ---------------- Completion ----------------

/// Runs after the queue lock is released. Lock order is fixed: the flow
/// was already stepped to Saving, so here it is feed check, then alert
/// store, then flow removal; the two store locks are never nested.
async fn save_price(
    state: &AppState,
    owner: OwnerId,
    flow_id: String,
    symbol: String,
    target: f64,
    direction: Direction,
) -> Vec<Outbound> {
    let mut out = Vec::new();

    if state.feed.is_connected() {
        if !state.feed.resolve(&symbol).await {
            out.push(Outbound::send(
                owner,
                format!("⚠️ Symbol '{symbol}' not found. Alert not saved."),
            ));
            state.flows.remove(owner, &flow_id);
            return out;
        }
    } else {
        // Degraded mode: accept the alert; it starts matching once the
        // feed comes back.
        out.push(Outbound::send(
            owner,
            "⚠️ Warning: price feed not connected. Alert saved but will not trigger until the feed connects.",
        ));
    }

    state.alerts.add_price(PriceAlert {
        owner,
        symbol: symbol.clone(),
        target,
        direction,
    });
    state.flows.remove(owner, &flow_id);

    out.push(Outbound::send(
        owner,
        format!("✅ Price alert saved: {symbol} → {target} ({})", direction.as_str()),
    ));
    out
}

fn save_sharp(
    state: &AppState,
    owner: OwnerId,
    flow_id: String,
    symbol: String,
    timeframe: Timeframe,
    price_a: f64,
    price_b: f64,
) -> Vec<Outbound> {
    state.alerts.add_sharp_turn(SharpTurnAlert {
        owner,
        symbol: symbol.clone(),
        timeframe,
        price_a,
        price_b,
    });
    state.flows.remove(owner, &flow_id);

    vec![Outbound::send(
        owner,
        format!(
            "✅ SharpTurn alert saved: {symbol} on {} with A={price_a}, B={price_b}",
            timeframe.label()
        ),
    )]
}
