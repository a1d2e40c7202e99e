use reqwest::Method;
use serde_json::json;

use super::*;

impl BackendClient {
    pub async fn get_app_status(&self) -> Result<AppStatus, BackendError> {
        let url = self.endpoint(APP_STATUS, &[("select", "is_running"), ("id", APP_STATUS_ID)])?;
        let rows: Vec<AppStatusRow> = self.get_rows(url).await?;
        rows.into_iter()
            .next()
            .map(AppStatus::from)
            .ok_or_else(|| BackendError::UnexpectedResponse("app status row missing".into()))
    }

    pub async fn set_app_status(&self, is_running: bool) -> Result<(), BackendError> {
        let url = self.endpoint(APP_STATUS, &[("id", APP_STATUS_ID)])?;
        self.execute(
            Method::PATCH,
            url,
            Some(&json!({ "is_running": is_running })),
            None,
        )
        .await?;
        Ok(())
    }

    pub async fn update_category_status(
        &self,
        category_id: &str,
        status: CategoryStatus,
    ) -> Result<(), BackendError> {
        let id = eq(category_id);
        let url = self.endpoint(CATEGORIES, &[("id", id.as_str())])?;
        let updated: Vec<CategoryRow> = self
            .write_returning(Method::PATCH, url, &json!({ "status": status.as_flag() }))
            .await?;
        if updated.is_empty() {
            return Err(BackendError::ApiError {
                status: 404,
                message: format!("category {category_id} not found"),
            });
        }
        Ok(())
    }
}
