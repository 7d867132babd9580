use super::alert::OwnerId;

/// One inbound update from the chat transport, reduced to what the
/// conversation engine needs. The transport may deliver these from any
/// number of threads; the engine does not assume serialization.
#[derive(Debug, Clone)]
pub enum Inbound {
    Command {
        owner: OwnerId,
        name: String,
    },
    Text {
        owner: OwnerId,
        text: String,
    },
    Callback {
        owner: OwnerId,
        callback_id: String,
        message_id: i64,
        data: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Button {
        Button {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Transport-agnostic inline keyboard: rows of labeled callback buttons.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn row(mut self, buttons: Vec<Button>) -> Keyboard {
        self.rows.push(buttons);
        self
    }
}

/// A delivery intent produced by the conversation engine. Nothing here has
/// been sent yet; the caller delivers the batch after every lock is
/// released.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Send {
        owner: OwnerId,
        text: String,
        keyboard: Option<Keyboard>,
    },
    /// Edit-in-place of the message carrying the pressed button. Delivery
    /// falls back to a plain send when the edit is refused.
    Edit {
        owner: OwnerId,
        message_id: i64,
        text: String,
    },
    /// Callback acknowledgement; rejections carry their reason here.
    Ack {
        callback_id: String,
        text: Option<String>,
    },
}

impl Outbound {
    pub fn send(owner: OwnerId, text: impl Into<String>) -> Outbound {
        Outbound::Send {
            owner,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn send_keyboard(owner: OwnerId, text: impl Into<String>, keyboard: Keyboard) -> Outbound {
        Outbound::Send {
            owner,
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }

    pub fn ack(callback_id: impl Into<String>) -> Outbound {
        Outbound::Ack {
            callback_id: callback_id.into(),
            text: None,
        }
    }

    pub fn reject(callback_id: impl Into<String>, text: impl Into<String>) -> Outbound {
        Outbound::Ack {
            callback_id: callback_id.into(),
            text: Some(text.into()),
        }
    }
}
