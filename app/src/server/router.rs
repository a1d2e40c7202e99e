use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;

use super::{api, websocket};
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        .route("/ws", get(websocket::ws_handler))
        // --- Voter ---
        .route("/api/session", get(api::voter::get_session))
        .route("/api/categories", get(api::voter::get_categories))
        .route("/api/vote/{id}", get(api::voter::mount_vote_view))
        .route("/api/vote/{id}/selection", put(api::voter::select_choice))
        .route("/api/vote/{id}/confirm", post(api::voter::confirm_vote))
        .route("/api/vote/{id}/next", get(api::voter::next_category))
        .route("/api/vote/{id}/watch", delete(api::voter::unmount_vote_view))
        .route("/api/vote/{id}/adjacent/{direction}", get(api::voter::adjacent_category))
        // --- Admin ---
        .route("/api/admin/login", post(api::admin::login))
        .route("/api/admin/logout", post(api::admin::logout))
        .route("/api/admin/app-status", get(api::admin::get_app_status))
        .route("/api/admin/app-status/toggle", post(api::admin::toggle_app_status))
        .route("/api/admin/categories", get(api::admin::list_categories).post(api::admin::create_category))
        .route("/api/admin/categories/{id}", delete(api::admin::delete_category))
        .route("/api/admin/categories/{id}/status", put(api::admin::set_category_status))
        .route("/api/admin/categories/{id}/choices", get(api::admin::list_choices).post(api::admin::create_choice))
        .route("/api/admin/choices/{id}", delete(api::admin::delete_choice))
        .route("/api/admin/choices/{id}/hidden", put(api::admin::set_choice_hidden))
        .route("/api/admin/results", get(api::admin::get_results))
        .route("/api/admin/results/{id}", get(api::admin::get_category_results))
        // --- Announcement ---
        .route("/api/admin/announce", get(api::announce::current))
        .route("/api/admin/announce/{id}", post(api::announce::start))
        .route("/api/admin/announce/reveal", post(api::announce::reveal))
        .route("/api/admin/announce/next", post(api::announce::next))
        // --- Settings ---
        .route("/api/settings", get(api::settings::get_settings).put(api::settings::update_settings))
        .route("/api/settings/status", get(api::settings::get_settings_status))
        // --- Middleware ---
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
