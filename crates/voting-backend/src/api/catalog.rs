use super::*;

impl BackendClient {
    /// All categories ordered by `order_index` ascending.
    pub async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        let url = self.endpoint(CATEGORIES, &[("select", "*"), ("order", "order_index.asc")])?;
        let rows: Vec<CategoryRow> = self.get_rows(url).await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn get_category(&self, category_id: &str) -> Result<Option<Category>, BackendError> {
        let id = eq(category_id);
        let url = self.endpoint(CATEGORIES, &[("select", "*"), ("id", id.as_str())])?;
        let rows: Vec<CategoryRow> = self.get_rows(url).await?;
        Ok(rows.into_iter().next().map(Category::from))
    }

    /// Choices of a category ordered by name.
    ///
    /// The voter view passes `include_hidden = false`; the admin view sees all.
    pub async fn list_choices(
        &self,
        category_id: &str,
        include_hidden: bool,
    ) -> Result<Vec<Choice>, BackendError> {
        let category = eq(category_id);
        let mut query = vec![("select", "*"), ("category_id", category.as_str())];
        if !include_hidden {
            query.push(("hidden", "eq.false"));
        }
        query.push(("order", "name.asc"));

        let url = self.endpoint(CHOICES, &query)?;
        let rows: Vec<ChoiceRow> = self.get_rows(url).await?;
        Ok(rows.into_iter().map(Choice::from).collect())
    }
}
