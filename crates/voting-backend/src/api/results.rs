use reqwest::Method;
use serde_json::json;

use super::*;

impl BackendClient {
    /// Per-choice vote counts for every category.
    pub async fn fetch_results(&self) -> Result<Vec<ChoiceTally>, BackendError> {
        let url = self.endpoint(RESULTS_FUNCTION, &[])?;
        let body = self.execute(Method::POST, url, Some(&json!({})), None).await?;
        let rows: Vec<TallyRow> = serde_json::from_str(&body)?;
        Ok(rows.into_iter().map(ChoiceTally::from).collect())
    }

    pub async fn fetch_category_results(
        &self,
        category_id: &str,
    ) -> Result<Vec<ChoiceTally>, BackendError> {
        let url = self.endpoint(CATEGORY_RESULTS_FUNCTION, &[])?;
        let body = self
            .execute(
                Method::POST,
                url,
                Some(&json!({ "input_category_id": category_id })),
                None,
            )
            .await?;
        let rows: Vec<TallyRow> = serde_json::from_str(&body)?;
        Ok(rows.into_iter().map(ChoiceTally::from).collect())
    }
}
