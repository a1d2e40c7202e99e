//! Typed entities handed to the application.

use serde::{Deserialize, Serialize};

/// Whether voting in (and navigation into) a category is allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    Enabled,
    Disabled,
}

impl CategoryStatus {
    pub fn from_flag(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }

    pub fn as_flag(self) -> bool {
        matches!(self, Self::Enabled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub status: CategoryStatus,
    pub order_index: i64,
    pub rigged: bool,
}

impl Category {
    pub fn is_enabled(&self) -> bool {
        self.status.as_flag()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Choice {
    pub id: String,
    pub name: String,
    pub image_ref: String,
    pub category_id: String,
    pub hidden: bool,
    pub rigged_vote_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vote {
    pub session_id: String,
    pub category_id: String,
    pub choice_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppStatus {
    pub is_running: bool,
}

/// One row of the backend's vote aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChoiceTally {
    pub category_id: String,
    pub choice_id: String,
    pub choice_name: String,
    pub image_ref: String,
    pub hidden: bool,
    pub vote_count: i64,
    pub rigged_vote_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub order_index: i64,
    pub status: CategoryStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewChoice {
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub image_ref: String,
    #[serde(default)]
    pub hidden: bool,
}
