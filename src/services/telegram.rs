use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::models::{Keyboard, Outbound, OwnerId};

/// Outbound side of the chat transport. Best-effort from the core's point
/// of view: callers log failures and move on, they never retry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        owner: OwnerId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), String>;

    async fn edit(&self, owner: OwnerId, message_id: i64, text: &str) -> Result<(), String>;

    async fn ack(&self, callback_id: &str, text: Option<&str>) -> Result<(), String>;
}

/// Delivers a batch of engine intents, in order. Called strictly after the
/// engine returns, so no store lock is ever held across this I/O. An edit
/// that is refused (message too old, already edited) degrades to a plain
/// send.
pub async fn deliver(notifier: &dyn Notifier, outbounds: Vec<Outbound>) {
    for out in outbounds {
        match out {
            Outbound::Send { owner, text, keyboard } => {
                if let Err(e) = notifier.send(owner, &text, keyboard.as_ref()).await {
                    tracing::warn!("send to {owner} failed: {e}");
                }
            }
            Outbound::Edit { owner, message_id, text } => {
                if notifier.edit(owner, message_id, &text).await.is_err() {
                    if let Err(e) = notifier.send(owner, &text, None).await {
                        tracing::warn!("send to {owner} failed: {e}");
                    }
                }
            }
            Outbound::Ack { callback_id, text } => {
                let _ = notifier.ack(&callback_id, text.as_deref()).await;
            }
        }
    }
}

/// Thin Bot API client. Only the three methods the bot actually calls.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    token: String,
}

impl TelegramClient {
    pub fn new(token: String) -> TelegramClient {
        TelegramClient {
            http: Client::new(),
            token,
        }
    }

    fn url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.token)
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> Result<(), String> {
        let res = self
            .http
            .post(self.url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("telegram {method} failed: {status} {body}"));
        }

        Ok(())
    }
}

fn keyboard_json(keyboard: &Keyboard) -> serde_json::Value {
    let rows: Vec<Vec<serde_json::Value>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|b| json!({ "text": b.label, "callback_data": b.data }))
                .collect()
        })
        .collect();

    json!({ "inline_keyboard": rows })
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send(
        &self,
        owner: OwnerId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), String> {
        let mut body = json!({ "chat_id": owner, "text": text });
        if let Some(kb) = keyboard {
            body["reply_markup"] = keyboard_json(kb);
        }
        self.call("sendMessage", body).await
    }

    async fn edit(&self, owner: OwnerId, message_id: i64, text: &str) -> Result<(), String> {
        self.call(
            "editMessageText",
            json!({ "chat_id": owner, "message_id": message_id, "text": text }),
        )
        .await
    }

    async fn ack(&self, callback_id: &str, text: Option<&str>) -> Result<(), String> {
        let mut body = json!({ "callback_query_id": callback_id });
        if let Some(t) = text {
            body["text"] = json!(t);
        }
        self.call("answerCallbackQuery", body).await
    }
}

// ---------------- Update DTOs ----------------

/// Subset of the Bot API update payload the webhook cares about.
#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub data: Option<String>,
    pub message: Option<Message>,
}
