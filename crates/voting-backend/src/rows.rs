//! Wire shapes returned by the backend and their conversion into entities.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{AppStatus, Category, CategoryStatus, Choice, ChoiceTally, Vote};

/// Table ids arrive as strings (uuid) or integers depending on the table.
fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "de_id")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryRow {
    #[serde(deserialize_with = "de_id")]
    id: String,
    name: String,
    #[serde(default)]
    status: bool,
    #[serde(default)]
    order_index: Option<i64>,
    #[serde(default)]
    rigged: Option<bool>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            status: CategoryStatus::from_flag(row.status),
            order_index: row.order_index.unwrap_or_default(),
            rigged: row.rigged.unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceRow {
    #[serde(deserialize_with = "de_id")]
    id: String,
    name: String,
    #[serde(default)]
    image_src: Option<String>,
    #[serde(deserialize_with = "de_id")]
    category_id: String,
    #[serde(default)]
    hidden: Option<bool>,
    #[serde(default)]
    rigged_vote_count: Option<i64>,
}

impl From<ChoiceRow> for Choice {
    fn from(row: ChoiceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            image_ref: row.image_src.unwrap_or_default(),
            category_id: row.category_id,
            hidden: row.hidden.unwrap_or(false),
            rigged_vote_count: row.rigged_vote_count.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct VoteRow {
    #[serde(deserialize_with = "de_id")]
    pub session_id: String,
    #[serde(deserialize_with = "de_id")]
    pub category_id: String,
    #[serde(deserialize_with = "de_id")]
    pub choice_id: String,
}

impl From<VoteRow> for Vote {
    fn from(row: VoteRow) -> Self {
        Self {
            session_id: row.session_id,
            category_id: row.category_id,
            choice_id: row.choice_id,
        }
    }
}

impl From<&Vote> for VoteRow {
    fn from(vote: &Vote) -> Self {
        Self {
            session_id: vote.session_id.clone(),
            category_id: vote.category_id.clone(),
            choice_id: vote.choice_id.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppStatusRow {
    #[serde(default)]
    is_running: bool,
}

impl From<AppStatusRow> for AppStatus {
    fn from(row: AppStatusRow) -> Self {
        Self {
            is_running: row.is_running,
        }
    }
}

/// Aggregation RPC row. Older RPC versions use `option_*` / `votes` names.
#[derive(Debug, Deserialize)]
pub(crate) struct TallyRow {
    #[serde(deserialize_with = "de_id")]
    category_id: String,
    #[serde(default, alias = "option_id", deserialize_with = "de_opt_id")]
    choice_id: Option<String>,
    #[serde(alias = "option_name")]
    choice_name: String,
    #[serde(default)]
    image_src: Option<String>,
    #[serde(default)]
    hidden: Option<bool>,
    #[serde(default, alias = "votes")]
    vote_count: i64,
    #[serde(default)]
    rigged_vote_count: Option<i64>,
}

impl From<TallyRow> for ChoiceTally {
    fn from(row: TallyRow) -> Self {
        Self {
            category_id: row.category_id,
            choice_id: row.choice_id.unwrap_or_else(|| row.choice_name.clone()),
            choice_name: row.choice_name,
            image_ref: row.image_src.unwrap_or_default(),
            hidden: row.hidden.unwrap_or(false),
            vote_count: row.vote_count,
            rigged_vote_count: row.rigged_vote_count.unwrap_or_default(),
        }
    }
}
