//! Polls which category the vote view's "next" control should lead to.
//!
//! A watcher lives exactly as long as the vote view that mounted it: it is
//! cancelled on unmount, when a newer view replaces it, when dropped, and
//! when the application shuts down (its token is a child of the shutdown
//! token). Changes are published on a `watch` channel and pushed to
//! WebSocket clients as `next_category` events.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use voting_backend::{Category, VotingBackend};

use crate::error::AppError;
use crate::events;
use crate::services::{catalog, sleep_or_cancel};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextCategoryStatus {
    pub category_id: String,
    /// Next enabled category in order, skipping closed ones.
    pub next: Option<Category>,
}

/// One poll: the next open category after `category_id`.
pub async fn poll_once(
    backend: &dyn VotingBackend,
    category_id: &str,
) -> Result<NextCategoryStatus, AppError> {
    let next = catalog::next_open_category(backend, category_id).await?;
    Ok(NextCategoryStatus {
        category_id: category_id.to_string(),
        next,
    })
}

pub struct NextCategoryWatcher {
    category_id: String,
    token: CancellationToken,
    status_rx: watch::Receiver<Option<NextCategoryStatus>>,
    handle: Option<JoinHandle<()>>,
}

impl NextCategoryWatcher {
    /// Start polling immediately, then every `interval`.
    pub fn spawn(
        backend: Arc<dyn VotingBackend>,
        category_id: &str,
        interval: Duration,
        parent: &CancellationToken,
        ws_tx: broadcast::Sender<String>,
    ) -> Self {
        let token = parent.child_token();
        let (status_tx, status_rx) = watch::channel(None);

        let handle = tokio::spawn(run(
            backend,
            category_id.to_string(),
            interval,
            token.clone(),
            status_tx,
            ws_tx,
        ));
        tracing::info!(category_id, interval_ms = interval.as_millis() as u64, "Next-category watcher started");

        Self {
            category_id: category_id.to_string(),
            token,
            status_rx,
            handle: Some(handle),
        }
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    /// The last successfully polled status, if any poll has completed.
    pub fn latest(&self) -> Option<NextCategoryStatus> {
        self.status_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<NextCategoryStatus>> {
        self.status_rx.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel and wait for the polling task to exit.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Next-category watcher task failed: {e}");
            }
        }
    }
}

impl Drop for NextCategoryWatcher {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run(
    backend: Arc<dyn VotingBackend>,
    category_id: String,
    interval: Duration,
    token: CancellationToken,
    status_tx: watch::Sender<Option<NextCategoryStatus>>,
    ws_tx: broadcast::Sender<String>,
) {
    loop {
        if token.is_cancelled() {
            break;
        }
        tracing::debug!(category_id = %category_id, "Polling next category");

        match poll_once(backend.as_ref(), &category_id).await {
            Ok(status) => {
                let changed = status_tx.borrow().as_ref() != Some(&status);
                if changed && !token.is_cancelled() {
                    events::broadcast(&ws_tx, events::NEXT_CATEGORY, &status);
                    status_tx.send_replace(Some(status));
                }
            }
            Err(e) => {
                tracing::warn!(category_id = %category_id, "Next-category poll failed: {e}");
            }
        }

        if sleep_or_cancel(&token, interval).await {
            break;
        }
    }
    tracing::info!(category_id = %category_id, "Next-category watcher stopped");
}
