//! Winner announcement sequencing for the admin presentation screen.
//!
//! Per category: `Ready` (choices alphabetical, hidden excluded) → reveal →
//! `Revealing` for the configured duration → `WinnerShown` → next category
//! or `Finished`. The announced winner is always the category result's
//! winner, hidden or not; once shown, every other choice follows by votes
//! with fireworks on.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, broadcast};
use tokio_util::sync::CancellationToken;
use voting_backend::{Category, VotingBackend};

use crate::error::AppError;
use crate::events;
use crate::services::results::{self, CategoryResult, ChoiceResult};
use crate::services::{catalog, sleep_or_cancel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementPhase {
    Idle,
    Ready,
    Revealing,
    WinnerShown,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnouncementView {
    pub phase: AnnouncementPhase,
    pub category: Option<Category>,
    pub choices: Vec<ChoiceResult>,
    pub winner: Option<ChoiceResult>,
    pub fireworks: bool,
}

struct Sequence {
    phase: AnnouncementPhase,
    categories: Vec<Category>,
    current: Option<CategoryResult>,
    reveal_token: Option<CancellationToken>,
}

impl Sequence {
    fn view(&self) -> AnnouncementView {
        let category = self.current.as_ref().and_then(|r| {
            self.categories
                .iter()
                .find(|c| c.id == r.category_id)
                .cloned()
        });
        let visible: Vec<ChoiceResult> = self
            .current
            .as_ref()
            .map(|r| r.choices.iter().filter(|c| !c.hidden).cloned().collect())
            .unwrap_or_default();

        match self.phase {
            AnnouncementPhase::Ready | AnnouncementPhase::Revealing => {
                let mut choices = visible;
                choices.sort_by(|a, b| a.choice_name.cmp(&b.choice_name));
                AnnouncementView {
                    phase: self.phase,
                    category,
                    choices,
                    winner: None,
                    fireworks: false,
                }
            }
            AnnouncementPhase::WinnerShown => {
                let winner = self.current.as_ref().and_then(|r| r.winner.clone());
                let choices = self
                    .current
                    .as_ref()
                    .map(|r| {
                        r.choices
                            .iter()
                            .filter(|c| winner.as_ref().map(|w| &w.choice_id) != Some(&c.choice_id))
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default();
                AnnouncementView {
                    phase: self.phase,
                    category,
                    choices,
                    winner,
                    fireworks: true,
                }
            }
            AnnouncementPhase::Idle | AnnouncementPhase::Finished => AnnouncementView {
                phase: self.phase,
                category: None,
                choices: Vec::new(),
                winner: None,
                fireworks: false,
            },
        }
    }

    fn cancel_reveal(&mut self) {
        if let Some(token) = self.reveal_token.take() {
            token.cancel();
        }
    }
}

#[derive(Clone)]
pub struct Announcer {
    inner: Arc<Mutex<Sequence>>,
    shutdown: CancellationToken,
}

impl Announcer {
    pub fn new(shutdown: &CancellationToken) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Sequence {
                phase: AnnouncementPhase::Idle,
                categories: Vec::new(),
                current: None,
                reveal_token: None,
            })),
            shutdown: shutdown.clone(),
        }
    }

    pub async fn view(&self) -> AnnouncementView {
        self.inner.lock().await.view()
    }

    /// Load a category's results and put it in the `Ready` phase.
    pub async fn start(
        &self,
        backend: &dyn VotingBackend,
        category_id: &str,
    ) -> Result<AnnouncementView, AppError> {
        let categories = catalog::list_categories(backend).await?;
        self.load(backend, categories, category_id).await
    }

    async fn load(
        &self,
        backend: &dyn VotingBackend,
        categories: Vec<Category>,
        category_id: &str,
    ) -> Result<AnnouncementView, AppError> {
        let category = categories
            .iter()
            .find(|c| c.id == category_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("category {category_id}")))?;
        let tallies = backend.fetch_category_results(category_id).await?;
        let result = results::category_result(&category, &tallies);

        let mut seq = self.inner.lock().await;
        seq.cancel_reveal();
        seq.categories = categories;
        seq.current = Some(result);
        seq.phase = AnnouncementPhase::Ready;
        tracing::info!(category_id, "Announcement ready");
        Ok(seq.view())
    }

    /// Start the timed reveal. The winner is shown once `duration` elapses.
    pub async fn reveal(
        &self,
        duration: Duration,
        ws_tx: broadcast::Sender<String>,
    ) -> Result<AnnouncementView, AppError> {
        let mut seq = self.inner.lock().await;
        if seq.phase != AnnouncementPhase::Ready {
            return Err(AppError::validation("reveal requires a category in the ready phase"));
        }

        let token = self.shutdown.child_token();
        seq.cancel_reveal();
        seq.reveal_token = Some(token.clone());
        seq.phase = AnnouncementPhase::Revealing;
        let view = seq.view();
        drop(seq);

        events::broadcast(&ws_tx, events::REVEAL_STARTED, &view);

        let inner = self.inner.clone();
        tokio::spawn(async move {
            if sleep_or_cancel(&token, duration).await {
                tracing::debug!("Reveal cancelled");
                return;
            }
            let mut seq = inner.lock().await;
            if seq.phase != AnnouncementPhase::Revealing || token.is_cancelled() {
                return;
            }
            seq.phase = AnnouncementPhase::WinnerShown;
            seq.reveal_token = None;
            let view = seq.view();
            drop(seq);
            tracing::info!(
                winner = view.winner.as_ref().map(|w| w.choice_name.as_str()).unwrap_or("-"),
                "Winner revealed"
            );
            events::broadcast(&ws_tx, events::WINNER_REVEALED, &view);
        });

        Ok(view)
    }

    /// Move past a shown winner to the next category in order, or finish.
    pub async fn next(&self, backend: &dyn VotingBackend) -> Result<AnnouncementView, AppError> {
        let (categories, current_id) = {
            let seq = self.inner.lock().await;
            if seq.phase != AnnouncementPhase::WinnerShown {
                return Err(AppError::validation("the winner has not been shown yet"));
            }
            let current_id = seq
                .current
                .as_ref()
                .map(|r| r.category_id.clone())
                .unwrap_or_default();
            (seq.categories.clone(), current_id)
        };

        let next_id = catalog::adjacent(&categories, &current_id, catalog::Direction::Next)?
            .map(|c| c.id.clone());
        match next_id {
            Some(id) => self.load(backend, categories, &id).await,
            None => {
                let mut seq = self.inner.lock().await;
                seq.phase = AnnouncementPhase::Finished;
                seq.current = None;
                tracing::info!("Announcement finished");
                Ok(seq.view())
            }
        }
    }

    /// Abort a running reveal and return to `Ready` so it can be revealed again.
    pub async fn cancel(&self) {
        let mut seq = self.inner.lock().await;
        seq.cancel_reveal();
        if seq.phase == AnnouncementPhase::Revealing {
            seq.phase = AnnouncementPhase::Ready;
        }
    }
}
