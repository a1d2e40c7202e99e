//! Admin API. Every route except login requires the admin flag.
//!
//!   POST   /api/admin/login | /logout
//!   GET    /api/admin/app-status, POST /api/admin/app-status/toggle
//!   GET|POST /api/admin/categories, DELETE /api/admin/categories/{id}
//!   PUT    /api/admin/categories/{id}/status
//!   GET|POST /api/admin/categories/{id}/choices
//!   DELETE /api/admin/choices/{id}, PUT /api/admin/choices/{id}/hidden
//!   GET    /api/admin/results[/{id}]

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::json;
use voting_backend::{CategoryStatus, NewCategory, NewChoice};

use crate::app::SharedState;
use crate::events::{self, AppStatusPayload, CategoryStatusPayload};
use crate::services::catalog::{self, ChoiceView};
use crate::services::results;

use super::{ApiResult, app_err, err_json, require_admin};

#[derive(Deserialize)]
pub struct LoginBody {
    pub password: String,
}

/// POST /api/admin/login
pub async fn login(State(state): State<SharedState>, Json(body): Json<LoginBody>) -> ApiResult {
    let ctx = state.session().await.map_err(app_err)?;
    let expected = state.config().await.admin_password.clone();
    if expected.is_empty() {
        return Err(err_json(503, "ADMIN_PASSWORD is not configured"));
    }
    if !ctx.authenticate(&body.password, &expected).map_err(app_err)? {
        return Err(err_json(401, "Invalid password"));
    }
    Ok(Json(json!({ "success": true, "is_admin": true })))
}

/// POST /api/admin/logout
pub async fn logout(State(state): State<SharedState>) -> ApiResult {
    let ctx = state.session().await.map_err(app_err)?;
    ctx.logout().map_err(app_err)?;
    Ok(Json(json!({ "success": true, "is_admin": false })))
}

/// GET /api/admin/app-status
pub async fn get_app_status(State(state): State<SharedState>) -> ApiResult {
    require_admin(&state).await?;
    let backend = state.backend().await.map_err(app_err)?;
    let status = backend.get_app_status().await.map_err(|e| app_err(e.into()))?;
    Ok(Json(json!({ "is_running": status.is_running })))
}

/// POST /api/admin/app-status/toggle
pub async fn toggle_app_status(State(state): State<SharedState>) -> ApiResult {
    require_admin(&state).await?;
    let backend = state.backend().await.map_err(app_err)?;
    let is_running = backend
        .toggle_app_status()
        .await
        .map_err(|e| app_err(e.into()))?;

    tracing::info!(is_running, "App status toggled");
    events::broadcast(
        state.ws_sender(),
        events::APP_STATUS,
        &AppStatusPayload { is_running },
    );
    Ok(Json(json!({ "success": true, "is_running": is_running })))
}

/// GET /api/admin/categories
pub async fn list_categories(State(state): State<SharedState>) -> ApiResult {
    require_admin(&state).await?;
    let backend = state.backend().await.map_err(app_err)?;
    let categories = catalog::list_categories(backend.as_ref())
        .await
        .map_err(app_err)?;
    Ok(Json(json!({ "categories": categories })))
}

#[derive(Deserialize)]
pub struct CreateCategoryBody {
    pub name: String,
    pub order_index: Option<i64>,
    pub status: Option<CategoryStatus>,
}

/// POST /api/admin/categories
///
/// Without an explicit `order_index` the category goes last.
pub async fn create_category(
    State(state): State<SharedState>,
    Json(body): Json<CreateCategoryBody>,
) -> ApiResult {
    require_admin(&state).await?;
    let name = body.name.trim();
    if name.is_empty() {
        return Err(err_json(400, "Category name is required"));
    }
    let backend = state.backend().await.map_err(app_err)?;

    let order_index = match body.order_index {
        Some(index) => index,
        None => catalog::list_categories(backend.as_ref())
            .await
            .map_err(app_err)?
            .last()
            .map_or(0, |c| c.order_index + 1),
    };

    let created = backend
        .create_category(&NewCategory {
            name: name.to_string(),
            order_index,
            status: body.status.unwrap_or(CategoryStatus::Disabled),
        })
        .await
        .map_err(|e| app_err(e.into()))?;
    tracing::info!(category_id = %created.id, "Category created");
    Ok(Json(json!({ "success": true, "category": created })))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete_category(
    State(state): State<SharedState>,
    Path(category_id): Path<String>,
) -> ApiResult {
    require_admin(&state).await?;
    let backend = state.backend().await.map_err(app_err)?;
    backend
        .delete_category(&category_id)
        .await
        .map_err(|e| app_err(e.into()))?;
    tracing::info!(category_id = %category_id, "Category deleted");
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct CategoryStatusBody {
    pub status: CategoryStatus,
}

/// PUT /api/admin/categories/{id}/status
pub async fn set_category_status(
    State(state): State<SharedState>,
    Path(category_id): Path<String>,
    Json(body): Json<CategoryStatusBody>,
) -> ApiResult {
    require_admin(&state).await?;
    let backend = state.backend().await.map_err(app_err)?;
    backend
        .update_category_status(&category_id, body.status)
        .await
        .map_err(|e| app_err(e.into()))?;

    tracing::info!(category_id = %category_id, status = body.status.as_str(), "Category status changed");
    events::broadcast(
        state.ws_sender(),
        events::CATEGORY_STATUS,
        &CategoryStatusPayload {
            category_id: category_id.clone(),
            status: body.status,
        },
    );
    Ok(Json(json!({ "success": true, "category_id": category_id, "status": body.status })))
}

/// GET /api/admin/categories/{id}/choices
pub async fn list_choices(
    State(state): State<SharedState>,
    Path(category_id): Path<String>,
) -> ApiResult {
    require_admin(&state).await?;
    let backend = state.backend().await.map_err(app_err)?;
    let choices = catalog::list_choices(backend.as_ref(), &category_id, ChoiceView::Admin)
        .await
        .map_err(app_err)?;
    Ok(Json(json!({ "choices": choices })))
}

#[derive(Deserialize)]
pub struct CreateChoiceBody {
    pub name: String,
    #[serde(default)]
    pub image_ref: String,
    #[serde(default)]
    pub hidden: bool,
}

/// POST /api/admin/categories/{id}/choices
pub async fn create_choice(
    State(state): State<SharedState>,
    Path(category_id): Path<String>,
    Json(body): Json<CreateChoiceBody>,
) -> ApiResult {
    require_admin(&state).await?;
    let name = body.name.trim();
    if name.is_empty() {
        return Err(err_json(400, "Choice name is required"));
    }
    let backend = state.backend().await.map_err(app_err)?;
    let created = backend
        .create_choice(&NewChoice {
            category_id,
            name: name.to_string(),
            image_ref: body.image_ref,
            hidden: body.hidden,
        })
        .await
        .map_err(|e| app_err(e.into()))?;
    Ok(Json(json!({ "success": true, "choice": created })))
}

/// DELETE /api/admin/choices/{id}
pub async fn delete_choice(
    State(state): State<SharedState>,
    Path(choice_id): Path<String>,
) -> ApiResult {
    require_admin(&state).await?;
    let backend = state.backend().await.map_err(app_err)?;
    backend
        .delete_choice(&choice_id)
        .await
        .map_err(|e| app_err(e.into()))?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct HiddenBody {
    pub hidden: bool,
}

/// PUT /api/admin/choices/{id}/hidden
pub async fn set_choice_hidden(
    State(state): State<SharedState>,
    Path(choice_id): Path<String>,
    Json(body): Json<HiddenBody>,
) -> ApiResult {
    require_admin(&state).await?;
    let backend = state.backend().await.map_err(app_err)?;
    backend
        .set_choice_hidden(&choice_id, body.hidden)
        .await
        .map_err(|e| app_err(e.into()))?;
    Ok(Json(json!({ "success": true, "hidden": body.hidden })))
}

/// GET /api/admin/results
pub async fn get_results(State(state): State<SharedState>) -> ApiResult {
    require_admin(&state).await?;
    let backend = state.backend().await.map_err(app_err)?;
    let results = results::get_results(backend.as_ref())
        .await
        .map_err(app_err)?;
    Ok(Json(json!({ "results": results })))
}

/// GET /api/admin/results/{id}
pub async fn get_category_results(
    State(state): State<SharedState>,
    Path(category_id): Path<String>,
) -> ApiResult {
    require_admin(&state).await?;
    let backend = state.backend().await.map_err(app_err)?;
    let result = results::get_category_results(backend.as_ref(), &category_id)
        .await
        .map_err(app_err)?;
    Ok(Json(json!({ "result": result })))
}
