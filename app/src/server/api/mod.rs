//! REST API handlers grouped by audience.

pub mod admin;
pub mod announce;
pub mod settings;
pub mod voter;

use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::app::SharedState;
use crate::error::AppError;
use crate::services::session::SessionContext;

pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult = Result<Json<Value>, ApiError>;

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> ApiError {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message })),
    )
}

/// Map a service error onto the standard error response.
pub fn app_err(e: AppError) -> ApiError {
    if !matches!(e, AppError::Validation(_) | AppError::NotFound(_)) {
        tracing::warn!("Request failed: {e}");
    }
    err_json(e.status_code(), &e.to_string())
}

/// The session context, provided the admin flag is set.
pub async fn require_admin(state: &SharedState) -> Result<SessionContext, ApiError> {
    let ctx = state.session().await.map_err(app_err)?;
    if !ctx.is_admin() {
        return Err(err_json(403, "Admin login required"));
    }
    Ok(ctx)
}
