#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tickwatch::config::Settings;
use tickwatch::models::{Inbound, Keyboard, OwnerId};
use tickwatch::services::alert_store::AlertStore;
use tickwatch::services::feed::{PriceFeed, Tick};
use tickwatch::services::flow_manager::FlowManager;
use tickwatch::services::telegram::Notifier;
use tickwatch::AppState;

pub const OWNER: OwnerId = 1001;
pub const STRANGER: OwnerId = 4040;

/// Feed fake: connectivity is a flag the test flips, ticks are set per
/// symbol, resolve succeeds for registered symbols only.
#[derive(Default)]
pub struct FakeFeed {
    connected: AtomicBool,
    known: Mutex<Vec<String>>,
    ticks: Mutex<HashMap<String, Tick>>,
}

impl FakeFeed {
    pub fn connected_with(symbols: &[&str]) -> FakeFeed {
        let feed = FakeFeed::default();
        feed.connected.store(true, Ordering::Relaxed);
        *feed.known.lock().unwrap() = symbols.iter().map(|s| s.to_string()).collect();
        feed
    }

    pub fn disconnected() -> FakeFeed {
        FakeFeed::default()
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    pub fn set_tick(&self, symbol: &str, tick: Tick) {
        self.ticks.lock().unwrap().insert(symbol.to_string(), tick);
    }
}

#[async_trait]
impl PriceFeed for FakeFeed {
    async fn resolve(&self, symbol: &str) -> bool {
        self.known.lock().unwrap().iter().any(|s| s == symbol)
    }

    async fn latest_tick(&self, symbol: &str) -> Option<Tick> {
        self.ticks.lock().unwrap().get(symbol).copied()
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    async fn reconnect(&self) -> bool {
        self.is_connected()
    }
}

/// Notifier fake: records every delivered text; `fail_sends` makes `send`
/// error to exercise the best-effort paths.
#[derive(Default)]
pub struct FakeNotifier {
    pub fail_sends: AtomicBool,
    sent: Mutex<Vec<(OwnerId, String)>>,
}

impl FakeNotifier {
    pub fn texts_for(&self, owner: OwnerId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(o, _)| *o == owner)
            .map(|(_, t)| t.clone())
            .collect()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(
        &self,
        owner: OwnerId,
        text: &str,
        _keyboard: Option<&Keyboard>,
    ) -> Result<(), String> {
        if self.fail_sends.load(Ordering::Relaxed) {
            return Err("delivery refused".to_string());
        }
        self.sent.lock().unwrap().push((owner, text.to_string()));
        Ok(())
    }

    async fn edit(&self, owner: OwnerId, _message_id: i64, text: &str) -> Result<(), String> {
        self.sent.lock().unwrap().push((owner, text.to_string()));
        Ok(())
    }

    async fn ack(&self, _callback_id: &str, _text: Option<&str>) -> Result<(), String> {
        Ok(())
    }
}

pub fn test_settings() -> Settings {
    Settings {
        bot_token: String::new(),
        allowed_users: vec![OWNER],
        host: "127.0.0.1".to_string(),
        port: 0,
        feed_base_url: String::new(),
        feed_token: String::new(),
        poll_interval_ms: 200,
    }
}

pub fn test_state(feed: Arc<FakeFeed>, notifier: Arc<FakeNotifier>) -> AppState {
    AppState {
        settings: test_settings(),
        alerts: Arc::new(AlertStore::new()),
        flows: Arc::new(FlowManager::new()),
        feed,
        notifier,
    }
}

// ---------------- Inbound builders ----------------

pub fn text(owner: OwnerId, t: &str) -> Inbound {
    Inbound::Text {
        owner,
        text: t.to_string(),
    }
}

pub fn command(owner: OwnerId, name: &str) -> Inbound {
    Inbound::Command {
        owner,
        name: name.to_string(),
    }
}

pub fn callback(owner: OwnerId, data: &str) -> Inbound {
    Inbound::Callback {
        owner,
        callback_id: "cb-1".to_string(),
        message_id: 77,
        data: data.to_string(),
    }
}

pub fn tick_at(last: f64, ts_ms: i64) -> Tick {
    Tick {
        last: Some(last),
        bid: None,
        ask: None,
        time: None,
        time_msc: Some(ts_ms),
    }
}
