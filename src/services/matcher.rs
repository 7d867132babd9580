use std::collections::HashMap;
use std::time::Duration;

use tokio::time;

use crate::AppState;

/// Spawns the background matching loop. Runs until process shutdown; a bad
/// symbol or a failed delivery never stops the loop.
pub fn spawn_price_alert_monitor(state: AppState) {
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_millis(state.settings.poll_interval_ms));
        // Last processed tick timestamp per symbol, for dedup across
        // iterations.
        let mut last_seen: HashMap<String, i64> = HashMap::new();

        loop {
            interval.tick().await;

            let fired = run_tick(&state, &mut last_seen).await;
            if fired > 0 {
                tracing::debug!("[alert-monitor] fired {fired} alert(s)");
            }
        }
    });
}

/// One polling iteration; returns how many alerts fired. Public so tests
/// can drive the loop tick by tick.
pub async fn run_tick(state: &AppState, last_seen: &mut HashMap<String, i64>) -> usize {
    if !state.feed.is_connected() && state.feed.reconnect().await {
        tracing::info!("price feed reconnected");
    }

    let mut fired = 0;

    for symbol in state.alerts.symbols_with_active_alerts() {
        if !state.feed.is_connected() {
            continue;
        }

        let Some(tick) = state.feed.latest_tick(&symbol).await else {
            continue;
        };
        let Some(ts) = tick.timestamp_ms() else {
            continue;
        };

        // Same timestamp as last time means no new data for this symbol;
        // skip the whole evaluation pass.
        if last_seen.get(&symbol) == Some(&ts) {
            continue;
        }
        last_seen.insert(symbol.clone(), ts);

        let Some(price) = tick.price() else {
            continue;
        };

        // Snapshot, so a concurrent flow completion can't mutate the list
        // mid-iteration.
        for alert in state.alerts.alerts_for(&symbol) {
            if !alert.triggered_by(price) {
                continue;
            }

            // Best effort: a failed delivery must not keep the alert
            // alive, or it would re-fire on every subsequent tick.
            if let Err(e) = state
                .notifier
                .send(
                    alert.owner,
                    &format!(
                        "🚨 {symbol} {} alert: current {price} target {}",
                        alert.direction.as_str(),
                        alert.target
                    ),
                    None,
                )
                .await
            {
                tracing::warn!("trigger notify for {} failed: {e}", alert.owner);
            }

            state.alerts.remove_price(&alert);
            fired += 1;
        }
    }

    fired
}
