use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// One price observation from the feed.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Tick {
    pub last: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    /// Seconds since epoch, for bridges without a millisecond clock.
    pub time: Option<i64>,
    /// Milliseconds since epoch; preferred when present.
    pub time_msc: Option<i64>,
}

impl Tick {
    /// Last trade price when positive, otherwise the bid/ask mid. `None`
    /// means the tick is unusable and the symbol should be skipped.
    pub fn price(&self) -> Option<f64> {
        match self.last {
            Some(p) if p.is_finite() && p > 0.0 => Some(p),
            _ => match (self.bid, self.ask) {
                (Some(bid), Some(ask)) => {
                    let mid = (bid + ask) / 2.0;
                    mid.is_finite().then_some(mid)
                }
                _ => None,
            },
        }
    }

    /// Millisecond timestamp; second-resolution feeds are upscaled x1000.
    pub fn timestamp_ms(&self) -> Option<i64> {
        self.time_msc.or_else(|| self.time.map(|s| s * 1000))
    }
}

/// The price source the matching loop and symbol validation run against.
/// Object safe so tests can substitute a fake.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// True when the symbol is tradable. Tries to register a not-yet-active
    /// symbol with the feed before giving up.
    async fn resolve(&self, symbol: &str) -> bool;

    async fn latest_tick(&self, symbol: &str) -> Option<Tick>;

    fn is_connected(&self) -> bool;

    /// Attempts to (re)establish the feed session; returns the new
    /// connectivity state.
    async fn reconnect(&self) -> bool;
}

/// HTTP client for the quote bridge that fronts the trading terminal.
pub struct BridgeFeed {
    http: Client,
    base_url: String,
    token: String,
    connected: AtomicBool,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    known: bool,
}

impl BridgeFeed {
    pub fn new(base_url: String, token: String) -> BridgeFeed {
        BridgeFeed {
            http: Client::new(),
            base_url,
            token,
            connected: AtomicBool::new(false),
        }
    }

    fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, String> {
        let url = format!("{}/{path}", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("token", self.token.as_str())])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("bridge {path} failed: {status} {body}"));
        }

        res.json::<T>().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl PriceFeed for BridgeFeed {
    async fn resolve(&self, symbol: &str) -> bool {
        if !self.has_token() {
            return false;
        }

        match self.get_json::<SymbolInfo>("symbols/info", &[("symbol", symbol)]).await {
            Ok(info) if info.known => return true,
            _ => {}
        }

        // Unknown so far: ask the bridge to select the symbol into the
        // active set, then look it up once more.
        if self
            .get_json::<serde_json::Value>("symbols/select", &[("symbol", symbol)])
            .await
            .is_err()
        {
            return false;
        }

        matches!(
            self.get_json::<SymbolInfo>("symbols/info", &[("symbol", symbol)]).await,
            Ok(info) if info.known
        )
    }

    async fn latest_tick(&self, symbol: &str) -> Option<Tick> {
        match self.get_json::<Tick>("ticks/latest", &[("symbol", symbol)]).await {
            Ok(tick) => Some(tick),
            Err(e) => {
                tracing::debug!("tick fetch for {symbol} failed: {e}");
                None
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    async fn reconnect(&self) -> bool {
        let ok = self.has_token()
            && self.get_json::<serde_json::Value>("health", &[]).await.is_ok();
        self.connected.store(ok, Ordering::Relaxed);
        ok
    }
}
