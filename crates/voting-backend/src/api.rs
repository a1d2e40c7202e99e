//! Hosted backend REST client.
//!
//! Table reads and writes go through `{base}/rest/v1/{table}` with
//! PostgREST-style filters (`column=eq.value`); aggregations go through
//! `{base}/rest/v1/rpc/{function}`. Every request carries the project API
//! key both as `apikey` and as a bearer token. No request timeout and no
//! retry are configured here.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use url::Url;

use crate::backend::VotingBackend;
use crate::models::{
    AppStatus, Category, CategoryStatus, Choice, ChoiceTally, NewCategory, NewChoice, Vote,
};
use crate::rows::{AppStatusRow, CategoryRow, ChoiceRow, TallyRow, VoteRow};
use crate::{BackendError, Credentials};

mod admin;
mod catalog;
mod request;
mod results;
mod status;
mod votes;

const REST_PREFIX: &str = "rest/v1/";

const CATEGORIES: &str = "categories";
const CHOICES: &str = "choices";
const VOTES: &str = "votes";
const USERS: &str = "users";
const APP_STATUS: &str = "app_status";
const RESULTS_FUNCTION: &str = "rpc/get_results";
const CATEGORY_RESULTS_FUNCTION: &str = "rpc/get_category_results";

/// The singleton app status row.
const APP_STATUS_ID: &str = "eq.1";

const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=minimal";
const PREFER_REPRESENTATION: &str = "return=representation";

/// PostgREST equality filter value.
fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    rest_base: Url,
    headers: HeaderMap,
}

#[async_trait]
impl VotingBackend for BackendClient {
    async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        BackendClient::list_categories(self).await
    }

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>, BackendError> {
        BackendClient::get_category(self, category_id).await
    }

    async fn list_choices(
        &self,
        category_id: &str,
        include_hidden: bool,
    ) -> Result<Vec<Choice>, BackendError> {
        BackendClient::list_choices(self, category_id, include_hidden).await
    }

    async fn find_vote(
        &self,
        session_id: &str,
        category_id: &str,
    ) -> Result<Option<Vote>, BackendError> {
        BackendClient::find_vote(self, session_id, category_id).await
    }

    async fn upsert_vote(&self, vote: &Vote) -> Result<(), BackendError> {
        BackendClient::upsert_vote(self, vote).await
    }

    async fn update_vote(&self, vote: &Vote) -> Result<(), BackendError> {
        BackendClient::update_vote(self, vote).await
    }

    async fn register_session(&self, session_id: &str) -> Result<(), BackendError> {
        BackendClient::register_session(self, session_id).await
    }

    async fn get_app_status(&self) -> Result<AppStatus, BackendError> {
        BackendClient::get_app_status(self).await
    }

    async fn set_app_status(&self, is_running: bool) -> Result<(), BackendError> {
        BackendClient::set_app_status(self, is_running).await
    }

    async fn update_category_status(
        &self,
        category_id: &str,
        status: CategoryStatus,
    ) -> Result<(), BackendError> {
        BackendClient::update_category_status(self, category_id, status).await
    }

    async fn fetch_results(&self) -> Result<Vec<ChoiceTally>, BackendError> {
        BackendClient::fetch_results(self).await
    }

    async fn fetch_category_results(
        &self,
        category_id: &str,
    ) -> Result<Vec<ChoiceTally>, BackendError> {
        BackendClient::fetch_category_results(self, category_id).await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category, BackendError> {
        BackendClient::create_category(self, category).await
    }

    async fn delete_category(&self, category_id: &str) -> Result<(), BackendError> {
        BackendClient::delete_category(self, category_id).await
    }

    async fn create_choice(&self, choice: &NewChoice) -> Result<Choice, BackendError> {
        BackendClient::create_choice(self, choice).await
    }

    async fn set_choice_hidden(&self, choice_id: &str, hidden: bool) -> Result<(), BackendError> {
        BackendClient::set_choice_hidden(self, choice_id, hidden).await
    }

    async fn delete_choice(&self, choice_id: &str) -> Result<(), BackendError> {
        BackendClient::delete_choice(self, choice_id).await
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
