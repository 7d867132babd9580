use std::env;

use crate::models::OwnerId;

#[derive(Debug, Clone)]
pub struct Settings {
    pub bot_token: String,
    pub allowed_users: Vec<OwnerId>,
    pub host: String,
    pub port: u16,

    pub feed_base_url: String,
    pub feed_token: String,
    pub poll_interval_ms: u64,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let bot_token = env::var("BOT_TOKEN").unwrap_or_default();

    // Comma-separated chat ids; entries that don't parse are skipped.
    let allowed_users = env::var("ALLOWED_USERS")
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse::<OwnerId>().ok())
        .collect();

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let feed_base_url = env::var("FEED_BASE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8787".to_string());

    let feed_token = env::var("FEED_TOKEN").unwrap_or_default();

    let poll_interval_ms = env::var("POLL_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(200);

    Settings {
        bot_token,
        allowed_users,
        host,
        port,
        feed_base_url,
        feed_token,
        poll_interval_ms,
    }
}
