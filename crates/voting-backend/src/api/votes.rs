use reqwest::Method;
use serde_json::json;

use super::*;

impl BackendClient {
    /// The stored vote for `(session_id, category_id)`, if any.
    pub async fn find_vote(
        &self,
        session_id: &str,
        category_id: &str,
    ) -> Result<Option<Vote>, BackendError> {
        let session = eq(session_id);
        let category = eq(category_id);
        let url = self.endpoint(
            VOTES,
            &[("select", "*"), ("session_id", session.as_str()), ("category_id", category.as_str())],
        )?;
        let rows: Vec<VoteRow> = self.get_rows(url).await?;
        Ok(rows.into_iter().next().map(Vote::from))
    }

    /// Insert a vote, merging on the `(session_id, category_id)` key.
    pub async fn upsert_vote(&self, vote: &Vote) -> Result<(), BackendError> {
        let url = self.endpoint(VOTES, &[("on_conflict", "session_id,category_id")])?;
        self.execute(Method::POST, url, Some(&VoteRow::from(vote)), Some(PREFER_UPSERT))
            .await?;
        Ok(())
    }

    /// Change the choice of an existing vote. Fails with 404 when no vote matched.
    pub async fn update_vote(&self, vote: &Vote) -> Result<(), BackendError> {
        let session = eq(&vote.session_id);
        let category = eq(&vote.category_id);
        let url = self.endpoint(VOTES, &[("session_id", session.as_str()), ("category_id", category.as_str())])?;

        let updated: Vec<VoteRow> = self
            .write_returning(Method::PATCH, url, &json!({ "choice_id": vote.choice_id }))
            .await?;
        if updated.is_empty() {
            return Err(BackendError::ApiError {
                status: 404,
                message: format!(
                    "no vote for session {} in category {}",
                    vote.session_id, vote.category_id
                ),
            });
        }
        Ok(())
    }

    pub async fn register_session(&self, session_id: &str) -> Result<(), BackendError> {
        let url = self.endpoint(USERS, &[])?;
        self.execute(
            Method::POST,
            url,
            Some(&json!([{ "session_id": session_id }])),
            None,
        )
        .await?;
        Ok(())
    }
}
