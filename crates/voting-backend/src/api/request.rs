use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::*;

impl BackendClient {
    /// Build a client for the backend at `credentials.base_url`.
    pub fn new(credentials: &Credentials) -> Result<Self, BackendError> {
        let base_url = credentials.base_url.trim();
        if base_url.is_empty() {
            return Err(BackendError::NotConfigured("backend URL is empty".into()));
        }
        if credentials.api_key.trim().is_empty() {
            return Err(BackendError::NotConfigured("backend API key is empty".into()));
        }

        let root = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        let rest_base = root.join(REST_PREFIX)?;

        Ok(Self {
            http: reqwest::Client::new(),
            rest_base,
            headers: auth_headers(credentials.api_key.trim())?,
        })
    }

    /// `{base}/rest/v1/{path}?{query}`.
    pub(super) fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, BackendError> {
        let mut url = self.rest_base.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// GET and decode a JSON array of rows.
    pub(super) async fn get_rows<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Vec<T>, BackendError> {
        let body = self.execute(Method::GET, url, None::<&()>, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a write and decode the returned representation rows.
    pub(super) async fn write_returning<B, T>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .execute(method, url, Some(body), Some(PREFER_REPRESENTATION))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Execute a request with auth headers and an optional JSON body.
    pub(super) async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        prefer: Option<&str>,
    ) -> Result<String, BackendError> {
        let path = url.path().to_string();
        tracing::debug!(%method, path = %path, "Backend request");

        let mut req = self
            .http
            .request(method.clone(), url)
            .headers(self.headers.clone());
        if let Some(prefer) = prefer {
            req = req.header("Prefer", prefer);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(%method, path = %path, status = status.as_u16(), "Backend request failed");
            return Err(BackendError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(text)
    }
}

fn auth_headers(api_key: &str) -> Result<HeaderMap, BackendError> {
    let invalid = |_| BackendError::NotConfigured("backend API key is not a valid header".into());
    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(api_key).map_err(invalid)?);
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(invalid)?,
    );
    Ok(headers)
}
