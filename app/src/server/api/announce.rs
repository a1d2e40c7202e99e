//! Winner announcement API (admin only):
//!   GET  /api/admin/announce         – current view
//!   POST /api/admin/announce/{id}    – start at a category
//!   POST /api/admin/announce/reveal  – begin the timed reveal
//!   POST /api/admin/announce/next    – advance after the winner is shown

use axum::Json;
use axum::extract::{Path, State};
use serde_json::json;

use crate::app::SharedState;

use super::{ApiResult, app_err, require_admin};

/// GET /api/admin/announce
pub async fn current(State(state): State<SharedState>) -> ApiResult {
    require_admin(&state).await?;
    let view = state.announcer().view().await;
    Ok(Json(json!(view)))
}

/// POST /api/admin/announce/{id}
pub async fn start(State(state): State<SharedState>, Path(category_id): Path<String>) -> ApiResult {
    require_admin(&state).await?;
    let backend = state.backend().await.map_err(app_err)?;
    let view = state
        .announcer()
        .start(backend.as_ref(), &category_id)
        .await
        .map_err(app_err)?;
    Ok(Json(json!(view)))
}

/// POST /api/admin/announce/reveal
pub async fn reveal(State(state): State<SharedState>) -> ApiResult {
    require_admin(&state).await?;
    let duration = state.config().await.reveal_duration();
    let view = state
        .announcer()
        .reveal(duration, state.ws_sender().clone())
        .await
        .map_err(app_err)?;
    Ok(Json(json!(view)))
}

/// POST /api/admin/announce/next
pub async fn next(State(state): State<SharedState>) -> ApiResult {
    require_admin(&state).await?;
    let backend = state.backend().await.map_err(app_err)?;
    let view = state
        .announcer()
        .next(backend.as_ref())
        .await
        .map_err(app_err)?;
    Ok(Json(json!(view)))
}
