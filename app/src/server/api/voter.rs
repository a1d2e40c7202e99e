//! Voter-facing API:
//!   GET    /api/session                         – session id + flags
//!   GET    /api/categories                      – ordered categories
//!   GET    /api/vote/{id}                       – mount the vote view
//!   PUT    /api/vote/{id}/selection             – local selection
//!   POST   /api/vote/{id}/confirm               – submit or update
//!   GET    /api/vote/{id}/next                  – next open category
//!   DELETE /api/vote/{id}/watch                 – unmount the vote view
//!   GET    /api/vote/{id}/adjacent/{direction}  – previous/next category

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use crate::app::SharedState;
use crate::events::{self, VoteConfirmedPayload};
use crate::services::catalog::{self, ChoiceView, Direction};
use crate::services::voting::ConfirmOutcome;
use crate::services::{gate, next_category};

use super::{ApiResult, app_err, err_json};

/// GET /api/session
pub async fn get_session(State(state): State<SharedState>) -> ApiResult {
    let ctx = state.session().await.map_err(app_err)?;
    Ok(Json(json!({
        "session_id": ctx.session_id(),
        "registered": ctx.is_registered(),
        "is_admin": ctx.is_admin(),
    })))
}

/// GET /api/categories
///
/// A failed read still answers with an empty list plus the error message.
pub async fn get_categories(State(state): State<SharedState>) -> ApiResult {
    let backend = state.backend().await.map_err(app_err)?;
    match catalog::list_categories(backend.as_ref()).await {
        Ok(categories) => Ok(Json(json!({ "categories": categories }))),
        Err(e) => {
            tracing::warn!("Category list failed: {e}");
            Ok(Json(json!({ "categories": [], "error": e.to_string() })))
        }
    }
}

/// GET /api/vote/{id}
///
/// Checks admission first; a closed view performs no vote lookups and
/// starts no watcher.
pub async fn mount_vote_view(
    State(state): State<SharedState>,
    Path(category_id): Path<String>,
) -> ApiResult {
    let backend = state.backend().await.map_err(app_err)?;
    let ctx = state.session().await.map_err(app_err)?;

    let admission = gate::admit(backend.as_ref(), &category_id)
        .await
        .map_err(app_err)?;
    if !admission.is_open() {
        state.unmount_watcher(&category_id).await;
        return Ok(Json(json!({ "closed": true, "view": admission })));
    }

    let (choices, error) =
        match catalog::list_choices(backend.as_ref(), &category_id, ChoiceView::Voter).await {
            Ok(choices) => (choices, None),
            Err(e) => {
                tracing::warn!(category_id = %category_id, "Choice list failed: {e}");
                (Vec::new(), Some(e.to_string()))
            }
        };

    let votes = state.votes();
    votes
        .check_voted(backend.as_ref(), ctx.session_id(), &category_id)
        .await;
    let tracker = votes.tracker(ctx.session_id(), &category_id).await;

    state.mount_watcher(backend.clone(), &category_id).await;

    Ok(Json(json!({
        "closed": false,
        "view": admission,
        "choices": choices,
        "vote": tracker,
        "pending_change": tracker.has_pending_change(),
        "error": error,
    })))
}

#[derive(Deserialize)]
pub struct SelectionBody {
    pub choice_id: String,
}

/// PUT /api/vote/{id}/selection
pub async fn select_choice(
    State(state): State<SharedState>,
    Path(category_id): Path<String>,
    Json(body): Json<SelectionBody>,
) -> ApiResult {
    let ctx = state.session().await.map_err(app_err)?;
    let tracker = state
        .votes()
        .select(ctx.session_id(), &category_id, &body.choice_id)
        .await;
    Ok(Json(json!({
        "vote": tracker,
        "pending_change": tracker.has_pending_change(),
    })))
}

/// POST /api/vote/{id}/confirm
///
/// A selection that would be written must be a visible choice of this
/// category; anything else is 404 with no write.
pub async fn confirm_vote(
    State(state): State<SharedState>,
    Path(category_id): Path<String>,
) -> ApiResult {
    let backend = state.backend().await.map_err(app_err)?;
    let ctx = state.session().await.map_err(app_err)?;

    let admission = gate::admit(backend.as_ref(), &category_id)
        .await
        .map_err(app_err)?;
    if !admission.is_open() {
        return Err(err_json(403, "Voting is closed for this category"));
    }

    let votes = state.votes();
    if let Some(choice_id) = votes.pending_write(ctx.session_id(), &category_id).await {
        catalog::voter_choice(backend.as_ref(), &category_id, &choice_id)
            .await
            .map_err(app_err)?;
    }
    let outcome = votes
        .confirm(backend.as_ref(), ctx.session_id(), &category_id)
        .await
        .map_err(app_err)?;

    let tracker = votes.tracker(ctx.session_id(), &category_id).await;
    if outcome != ConfirmOutcome::Unchanged {
        events::broadcast(
            state.ws_sender(),
            events::VOTE_CONFIRMED,
            &VoteConfirmedPayload {
                category_id: category_id.clone(),
                choice_id: tracker.state.voted_choice().unwrap_or_default().to_string(),
                outcome: outcome.as_str(),
            },
        );
    }

    Ok(Json(json!({
        "success": true,
        "result": outcome,
        "vote": tracker,
    })))
}

/// GET /api/vote/{id}/next
///
/// Answers from the mounted watcher when it has polled this category,
/// otherwise polls once.
pub async fn next_category(
    State(state): State<SharedState>,
    Path(category_id): Path<String>,
) -> ApiResult {
    if let Some((watched, Some(status))) = state.watcher_status().await {
        if watched == category_id {
            return Ok(Json(json!(status)));
        }
    }

    let backend = state.backend().await.map_err(app_err)?;
    let status = next_category::poll_once(backend.as_ref(), &category_id)
        .await
        .map_err(app_err)?;
    Ok(Json(json!(status)))
}

/// DELETE /api/vote/{id}/watch
pub async fn unmount_vote_view(
    State(state): State<SharedState>,
    Path(category_id): Path<String>,
) -> ApiResult {
    let stopped = state.unmount_watcher(&category_id).await;
    Ok(Json(json!({ "success": true, "stopped": stopped })))
}

#[derive(Deserialize, Default)]
pub struct AdjacentQuery {
    /// Also land on disabled categories.
    #[serde(default)]
    pub include_closed: bool,
}

/// GET /api/vote/{id}/adjacent/{direction}
pub async fn adjacent_category(
    State(state): State<SharedState>,
    Path((category_id, direction)): Path<(String, String)>,
    Query(query): Query<AdjacentQuery>,
) -> ApiResult {
    let direction: Direction = direction.parse().map_err(app_err)?;
    let backend = state.backend().await.map_err(app_err)?;
    let categories = catalog::list_categories(backend.as_ref())
        .await
        .map_err(app_err)?;

    let found = if query.include_closed {
        catalog::adjacent(&categories, &category_id, direction)
    } else {
        catalog::adjacent_open(&categories, &category_id, direction)
    }
    .map_err(app_err)?;

    Ok(Json(json!({ "category": found })))
}
