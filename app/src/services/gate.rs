//! Admission control for the vote flow.
//!
//! The global app status is checked first; when voting is stopped no
//! category or vote lookups happen at all. Failed status reads fail closed.

use serde::Serialize;
use voting_backend::{Category, VotingBackend};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "admission", rename_all = "snake_case")]
pub enum Admission {
    Open { category: Category },
    AppStopped,
    CategoryClosed { category: Category },
    /// The backend could not tell us; treated as closed.
    Unavailable,
}

impl Admission {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// `false` when voting is stopped or the status cannot be read.
pub async fn app_is_running(backend: &dyn VotingBackend) -> bool {
    match backend.get_app_status().await {
        Ok(status) => status.is_running,
        Err(e) => {
            tracing::warn!("App status read failed, treating voting as closed: {e}");
            false
        }
    }
}

/// Decide whether the vote view for `category_id` may open.
///
/// An unknown category is [`AppError::NotFound`]; every other failure
/// resolves to a closed admission.
pub async fn admit(backend: &dyn VotingBackend, category_id: &str) -> Result<Admission, AppError> {
    if !app_is_running(backend).await {
        return Ok(Admission::AppStopped);
    }

    match backend.get_category(category_id).await {
        Ok(Some(category)) if category.is_enabled() => Ok(Admission::Open { category }),
        Ok(Some(category)) => Ok(Admission::CategoryClosed { category }),
        Ok(None) => Err(AppError::not_found(format!("category {category_id}"))),
        Err(e) => {
            tracing::warn!(category_id, "Category read failed, treating as closed: {e}");
            Ok(Admission::Unavailable)
        }
    }
}
