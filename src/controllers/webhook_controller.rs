use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    models::Inbound,
    services::{
        conversation,
        telegram::{self, Update},
    },
    AppState,
};

// GET /health
pub async fn get_health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// POST /telegram/webhook
pub async fn post_update(State(state): State<AppState>, Json(update): Json<Update>) -> Response {
    let Some(event) = parse_update(update) else {
        // Nothing actionable (sticker, edit, join event, ...). Still 200 so
        // the transport does not redeliver.
        return StatusCode::OK.into_response();
    };

    let replies = conversation::dispatch(&state, event).await;
    telegram::deliver(state.notifier.as_ref(), replies).await;

    StatusCode::OK.into_response()
}

fn parse_update(update: Update) -> Option<Inbound> {
    if let Some(cb) = update.callback_query {
        let message = cb.message?;
        return Some(Inbound::Callback {
            owner: message.chat.id,
            callback_id: cb.id,
            message_id: message.message_id,
            data: cb.data?,
        });
    }

    let message = update.message?;
    let text = message.text?.trim().to_string();

    if text.starts_with('/') {
        // "/listalerts extra words" still routes as /listalerts.
        let name = text.split_whitespace().next().unwrap_or(&text).to_string();
        return Some(Inbound::Command {
            owner: message.chat.id,
            name,
        });
    }

    Some(Inbound::Text {
        owner: message.chat.id,
        text,
    })
}
