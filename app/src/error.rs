//! Application error taxonomy shared by services and HTTP handlers.

use voting_backend::BackendError;
use voting_db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The backend request failed or the backend is not configured.
    #[error("Backend request failed: {0}")]
    Network(#[from] BackendError),

    /// The request is locally invalid (e.g. nothing selected before confirm).
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Confirming an unchanged vote. Callers short-circuit on this.
    #[error("Nothing to change")]
    NoOp,

    #[error("Local storage error: {0}")]
    Storage(#[from] DbError),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// HTTP status used when the error reaches the presentation API.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Network(BackendError::NotConfigured(_)) => 503,
            Self::Network(_) => 502,
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::NoOp => 409,
            Self::Storage(_) => 500,
        }
    }
}
