//! Client library for the hosted voting backend.
//!
//! Speaks the backend's PostgREST-style REST + RPC interface, converts raw
//! rows into typed entities, and exposes [`VotingBackend`] as the contract
//! the application consumes.

pub mod api;
pub mod backend;
pub mod models;
mod rows;

pub use api::BackendClient;
pub use backend::VotingBackend;
pub use models::*;

/// Connection settings for the hosted backend.
///
/// The caller is responsible for loading these (e.g. from the settings table).
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub base_url: String,
    pub api_key: String,
}

/// Unified error type for the voting-backend crate.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Backend API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl BackendError {
    /// HTTP status reported by the backend, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
