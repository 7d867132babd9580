use axum::{routing::get, Router};

use crate::{controllers::webhook_controller, AppState};

pub mod webhook_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = webhook_routes::add_routes(router);

    router
        .route("/health", get(webhook_controller::get_health))
        .with_state(state)
}
