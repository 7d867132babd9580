use crate::config::Settings;
use crate::models::OwnerId;

/// The bot's entire authorization model: a static allow-list of chat ids.
/// Messages from unknown users get a polite refusal, callbacks are dropped
/// silently; both decisions live with the caller.
pub fn is_allowed(settings: &Settings, owner: OwnerId) -> bool {
    settings.allowed_users.contains(&owner)
}
