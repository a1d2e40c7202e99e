//! Category and choice management writes.

use reqwest::Method;
use serde_json::json;

use super::*;

impl BackendClient {
    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, BackendError> {
        let url = self.endpoint(CATEGORIES, &[])?;
        let body = json!({
            "name": category.name,
            "order_index": category.order_index,
            "status": category.status.as_flag(),
        });
        let rows: Vec<CategoryRow> = self.write_returning(Method::POST, url, &body).await?;
        rows.into_iter()
            .next()
            .map(Category::from)
            .ok_or_else(|| BackendError::UnexpectedResponse("created category not returned".into()))
    }

    pub async fn delete_category(&self, category_id: &str) -> Result<(), BackendError> {
        let id = eq(category_id);
        let url = self.endpoint(CATEGORIES, &[("id", id.as_str())])?;
        self.execute(Method::DELETE, url, None::<&()>, None).await?;
        Ok(())
    }

    pub async fn create_choice(&self, choice: &NewChoice) -> Result<Choice, BackendError> {
        let url = self.endpoint(CHOICES, &[])?;
        let body = json!({
            "category_id": choice.category_id,
            "name": choice.name,
            "image_src": choice.image_ref,
            "hidden": choice.hidden,
        });
        let rows: Vec<ChoiceRow> = self.write_returning(Method::POST, url, &body).await?;
        rows.into_iter()
            .next()
            .map(Choice::from)
            .ok_or_else(|| BackendError::UnexpectedResponse("created choice not returned".into()))
    }

    pub async fn set_choice_hidden(&self, choice_id: &str, hidden: bool) -> Result<(), BackendError> {
        let id = eq(choice_id);
        let url = self.endpoint(CHOICES, &[("id", id.as_str())])?;
        self.execute(Method::PATCH, url, Some(&json!({ "hidden": hidden })), None)
            .await?;
        Ok(())
    }

    pub async fn delete_choice(&self, choice_id: &str) -> Result<(), BackendError> {
        let id = eq(choice_id);
        let url = self.endpoint(CHOICES, &[("id", id.as_str())])?;
        self.execute(Method::DELETE, url, None::<&()>, None).await?;
        Ok(())
    }
}
