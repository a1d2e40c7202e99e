//! The backend contract consumed by the application.

use async_trait::async_trait;

use crate::BackendError;
use crate::models::{
    AppStatus, Category, CategoryStatus, Choice, ChoiceTally, NewCategory, NewChoice, Vote,
};

/// Reads and writes against the hosted backend.
///
/// Uniqueness of `(session_id, category_id)` votes and vote aggregation are
/// enforced by the backend; implementations only transport.
#[async_trait]
pub trait VotingBackend: Send + Sync {
    /// Categories ordered by `order_index` ascending.
    async fn list_categories(&self) -> Result<Vec<Category>, BackendError>;

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>, BackendError>;

    /// Choices of a category ordered by name. Hidden choices only when asked.
    async fn list_choices(
        &self,
        category_id: &str,
        include_hidden: bool,
    ) -> Result<Vec<Choice>, BackendError>;

    async fn find_vote(
        &self,
        session_id: &str,
        category_id: &str,
    ) -> Result<Option<Vote>, BackendError>;

    /// Insert, or overwrite on the `(session_id, category_id)` key.
    async fn upsert_vote(&self, vote: &Vote) -> Result<(), BackendError>;

    async fn update_vote(&self, vote: &Vote) -> Result<(), BackendError>;

    async fn register_session(&self, session_id: &str) -> Result<(), BackendError>;

    async fn get_app_status(&self) -> Result<AppStatus, BackendError>;

    async fn set_app_status(&self, is_running: bool) -> Result<(), BackendError>;

    async fn update_category_status(
        &self,
        category_id: &str,
        status: CategoryStatus,
    ) -> Result<(), BackendError>;

    async fn fetch_results(&self) -> Result<Vec<ChoiceTally>, BackendError>;

    async fn fetch_category_results(
        &self,
        category_id: &str,
    ) -> Result<Vec<ChoiceTally>, BackendError>;

    async fn create_category(&self, category: &NewCategory) -> Result<Category, BackendError>;

    async fn delete_category(&self, category_id: &str) -> Result<(), BackendError>;

    async fn create_choice(&self, choice: &NewChoice) -> Result<Choice, BackendError>;

    async fn set_choice_hidden(&self, choice_id: &str, hidden: bool) -> Result<(), BackendError>;

    async fn delete_choice(&self, choice_id: &str) -> Result<(), BackendError>;

    /// Read the current status and write its negation. Returns the new value.
    async fn toggle_app_status(&self) -> Result<bool, BackendError> {
        let current = self.get_app_status().await?;
        let next = !current.is_running;
        self.set_app_status(next).await?;
        Ok(next)
    }
}
