use std::net::SocketAddr;
use std::sync::Arc;

use tickwatch::services::alert_store::AlertStore;
use tickwatch::services::feed::{BridgeFeed, PriceFeed};
use tickwatch::services::flow_manager::FlowManager;
use tickwatch::services::matcher;
use tickwatch::services::telegram::{Notifier, TelegramClient};
use tickwatch::{config, routes, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    if settings.bot_token.trim().is_empty() {
        tracing::warn!("BOT_TOKEN is empty; outbound messages will fail");
    }

    let feed: Arc<dyn PriceFeed> = Arc::new(BridgeFeed::new(
        settings.feed_base_url.clone(),
        settings.feed_token.clone(),
    ));
    if feed.reconnect().await {
        tracing::info!("price feed connected");
    } else {
        tracing::warn!("price feed unreachable; alerts will not trigger until it connects");
    }

    let notifier: Arc<dyn Notifier> = Arc::new(TelegramClient::new(settings.bot_token.clone()));

    let state = AppState {
        settings: settings.clone(),
        alerts: Arc::new(AlertStore::new()),
        flows: Arc::new(FlowManager::new()),
        feed,
        notifier,
    };

    matcher::spawn_price_alert_monitor(state.clone());

    let app = routes::app(state);

    let addr = SocketAddr::from((settings.host.parse::<std::net::IpAddr>().unwrap(), settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
