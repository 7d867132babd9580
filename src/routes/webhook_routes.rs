use axum::{routing::post, Router};

use crate::{controllers::webhook_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/telegram/webhook", post(webhook_controller::post_update))
}
