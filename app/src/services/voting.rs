//! Vote lifecycle per `(session_id, category_id)`.
//!
//! `Unvoted` → submit → `Voted`; a different local selection while `Voted`
//! is a pending change that `confirm` turns into an update. Votes are never
//! deleted. Selection is local only; `confirm` is the one user-initiated
//! write and issues at most one backend call.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::Mutex;
use voting_backend::{Vote, VotingBackend};

use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VoteState {
    #[default]
    Unvoted,
    Voted {
        choice_id: String,
    },
}

impl VoteState {
    pub fn voted_choice(&self) -> Option<&str> {
        match self {
            Self::Unvoted => None,
            Self::Voted { choice_id } => Some(choice_id),
        }
    }
}

/// Local view of one category's vote: the last confirmed state plus the
/// current unconfirmed selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VoteTracker {
    #[serde(flatten)]
    pub state: VoteState,
    pub selection: Option<String>,
}

impl VoteTracker {
    /// Voted, with a different choice selected but not yet confirmed.
    pub fn has_pending_change(&self) -> bool {
        match (&self.state, &self.selection) {
            (VoteState::Voted { choice_id }, Some(selected)) => choice_id != selected,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConfirmOutcome {
    Submitted { choice_id: String },
    Updated { previous: String, choice_id: String },
    Unchanged,
}

impl ConfirmOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted { .. } => "submitted",
            Self::Updated { .. } => "updated",
            Self::Unchanged => "unchanged",
        }
    }
}

type VoteKey = (String, String);

fn key(session_id: &str, category_id: &str) -> VoteKey {
    (session_id.to_string(), category_id.to_string())
}

/// Tracks vote state for every category this session has opened.
#[derive(Default)]
pub struct VoteLifecycle {
    trackers: Mutex<HashMap<VoteKey, VoteTracker>>,
}

impl VoteLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn tracker(&self, session_id: &str, category_id: &str) -> VoteTracker {
        self.trackers
            .lock()
            .await
            .get(&key(session_id, category_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Look up the stored vote and align the selection with it: the stored
    /// choice when found, nothing when the lookup finds no vote. Backend
    /// failures fail open to `Unvoted` and keep the current selection.
    pub async fn check_voted(
        &self,
        backend: &dyn VotingBackend,
        session_id: &str,
        category_id: &str,
    ) -> VoteState {
        let (state, selection) = match backend.find_vote(session_id, category_id).await {
            Ok(Some(vote)) => (
                VoteState::Voted {
                    choice_id: vote.choice_id.clone(),
                },
                Some(Some(vote.choice_id)),
            ),
            Ok(None) => (VoteState::Unvoted, Some(None)),
            Err(e) => {
                tracing::warn!(session_id, category_id, "Vote lookup failed, assuming unvoted: {e}");
                (VoteState::Unvoted, None)
            }
        };

        let mut trackers = self.trackers.lock().await;
        let tracker = trackers.entry(key(session_id, category_id)).or_default();
        tracker.state = state.clone();
        if let Some(selection) = selection {
            tracker.selection = selection;
        }
        state
    }

    /// The selection `confirm` would write, or `None` when confirming is a no-op.
    pub async fn pending_write(&self, session_id: &str, category_id: &str) -> Option<String> {
        let tracker = self.tracker(session_id, category_id).await;
        let selection = tracker.selection.as_deref().map(str::trim)?;
        if selection.is_empty() || tracker.state.voted_choice() == Some(selection) {
            return None;
        }
        Some(selection.to_string())
    }

    /// Record the local selection. No backend call.
    pub async fn select(&self, session_id: &str, category_id: &str, choice_id: &str) -> VoteTracker {
        let mut trackers = self.trackers.lock().await;
        let tracker = trackers.entry(key(session_id, category_id)).or_default();
        tracker.selection = Some(choice_id.to_string());
        tracker.clone()
    }

    /// First vote for the category. Routed to [`Self::update`] when already voted.
    pub async fn submit(
        &self,
        backend: &dyn VotingBackend,
        session_id: &str,
        category_id: &str,
        choice_id: Option<&str>,
    ) -> Result<ConfirmOutcome, AppError> {
        let choice_id = require_choice(choice_id)?;

        if let VoteState::Voted { .. } = self.tracker(session_id, category_id).await.state {
            return self.update(backend, session_id, category_id, choice_id).await;
        }

        let vote = Vote {
            session_id: session_id.into(),
            category_id: category_id.into(),
            choice_id: choice_id.into(),
        };
        backend.upsert_vote(&vote).await?;
        tracing::info!(session_id, category_id, choice_id, "Vote submitted");

        self.set_state(session_id, category_id, choice_id).await;
        Ok(ConfirmOutcome::Submitted {
            choice_id: choice_id.into(),
        })
    }

    /// Change an existing vote. The same choice is [`AppError::NoOp`].
    pub async fn update(
        &self,
        backend: &dyn VotingBackend,
        session_id: &str,
        category_id: &str,
        new_choice_id: &str,
    ) -> Result<ConfirmOutcome, AppError> {
        let new_choice_id = require_choice(Some(new_choice_id))?;
        let previous = match self.tracker(session_id, category_id).await.state {
            VoteState::Voted { choice_id } => choice_id,
            VoteState::Unvoted => {
                return Err(AppError::validation("no vote to update in this category"));
            }
        };
        if previous == new_choice_id {
            return Err(AppError::NoOp);
        }

        let vote = Vote {
            session_id: session_id.into(),
            category_id: category_id.into(),
            choice_id: new_choice_id.into(),
        };
        backend.update_vote(&vote).await?;
        tracing::info!(session_id, category_id, %previous, new_choice_id, "Vote updated");

        self.set_state(session_id, category_id, new_choice_id).await;
        Ok(ConfirmOutcome::Updated {
            previous,
            choice_id: new_choice_id.into(),
        })
    }

    /// Commit the local selection: submit, update, or nothing when unchanged.
    pub async fn confirm(
        &self,
        backend: &dyn VotingBackend,
        session_id: &str,
        category_id: &str,
    ) -> Result<ConfirmOutcome, AppError> {
        let tracker = self.tracker(session_id, category_id).await;
        let selection = require_choice(tracker.selection.as_deref())?;

        let result = match tracker.state.voted_choice() {
            None => self.submit(backend, session_id, category_id, Some(selection)).await,
            Some(current) if current == selection => Err(AppError::NoOp),
            Some(_) => self.update(backend, session_id, category_id, selection).await,
        };

        match result {
            Err(AppError::NoOp) => {
                tracing::debug!(session_id, category_id, "Confirm without change skipped");
                Ok(ConfirmOutcome::Unchanged)
            }
            other => other,
        }
    }

    async fn set_state(&self, session_id: &str, category_id: &str, choice_id: &str) {
        let mut trackers = self.trackers.lock().await;
        let tracker = trackers.entry(key(session_id, category_id)).or_default();
        tracker.state = VoteState::Voted {
            choice_id: choice_id.to_string(),
        };
        tracker.selection = Some(choice_id.to_string());
    }
}

fn require_choice(choice_id: Option<&str>) -> Result<&str, AppError> {
    match choice_id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(AppError::validation("select a choice before confirming")),
    }
}

#[cfg(test)]
#[path = "voting_tests.rs"]
mod tests;
