use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, broadcast};
use tokio_util::sync::CancellationToken;
use voting_backend::{BackendClient, BackendError, VotingBackend};
use voting_db::Database;

use crate::config::{AppConfig, SettingsManager};
use crate::error::AppError;
use crate::services::announcement::Announcer;
use crate::services::next_category::{NextCategoryStatus, NextCategoryWatcher};
use crate::services::session::SessionContext;
use crate::services::voting::VoteLifecycle;

/// Application shared state accessible from every axum handler.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Broadcast channel for WebSocket messages
    ws_tx: broadcast::Sender<String>,
    /// Application configuration (reloadable)
    config: RwLock<AppConfig>,
    /// Local database handle
    db: Database,
    /// Data directory path
    data_dir: PathBuf,
    /// Hosted backend; `None` until URL and key are configured
    backend: RwLock<Option<Arc<dyn VotingBackend>>>,
    session: RwLock<Option<SessionContext>>,
    votes: VoteLifecycle,
    /// Watcher of the currently mounted vote view
    watcher: Mutex<Option<NextCategoryWatcher>>,
    announcer: Announcer,
    shutdown_token: CancellationToken,
}

impl SharedState {
    /// Create shared state from an already-opened database and loaded config.
    ///
    /// The backend client is built from the configured credentials; missing
    /// credentials leave it unset and backend routes answer 503.
    pub fn new(db: Database, config: AppConfig, data_dir: PathBuf) -> Self {
        let backend = match BackendClient::new(&config.credentials()) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn VotingBackend>),
            Err(e) => {
                tracing::warn!("Backend client not available: {e}");
                None
            }
        };
        Self::build(db, config, data_dir, backend)
    }

    /// Create shared state around an existing backend implementation.
    pub fn with_backend(
        db: Database,
        config: AppConfig,
        data_dir: PathBuf,
        backend: Arc<dyn VotingBackend>,
    ) -> Self {
        Self::build(db, config, data_dir, Some(backend))
    }

    fn build(
        db: Database,
        config: AppConfig,
        data_dir: PathBuf,
        backend: Option<Arc<dyn VotingBackend>>,
    ) -> Self {
        let (ws_tx, _) = broadcast::channel(256);
        let shutdown_token = CancellationToken::new();

        Self {
            inner: Arc::new(SharedStateInner {
                ws_tx,
                config: RwLock::new(config),
                db,
                data_dir,
                backend: RwLock::new(backend),
                session: RwLock::new(None),
                votes: VoteLifecycle::new(),
                watcher: Mutex::new(None),
                announcer: Announcer::new(&shutdown_token),
                shutdown_token,
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        // Read from config; fallback to 8080.
        self.inner
            .config
            .try_read()
            .map(|c| c.server_port)
            .unwrap_or(8080)
    }

    pub fn ws_sender(&self) -> &broadcast::Sender<String> {
        &self.inner.ws_tx
    }

    pub fn subscribe_ws(&self) -> broadcast::Receiver<String> {
        self.inner.ws_tx.subscribe()
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.inner.data_dir
    }

    pub fn votes(&self) -> &VoteLifecycle {
        &self.inner.votes
    }

    pub fn announcer(&self) -> &Announcer {
        &self.inner.announcer
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }

    /// Get a read lock on the current config.
    pub async fn config(&self) -> tokio::sync::RwLockReadGuard<'_, AppConfig> {
        self.inner.config.read().await
    }

    /// Reload config from the database and rebuild the backend client if
    /// its credentials changed.
    pub async fn reload_config(&self) -> Result<(), anyhow::Error> {
        let sm = SettingsManager::new(self.inner.db.clone());
        let mut config = self.inner.config.write().await;
        let old_credentials = config.credentials();
        config.reload(&sm)?;

        let credentials = config.credentials();
        if credentials.base_url != old_credentials.base_url
            || credentials.api_key != old_credentials.api_key
        {
            let backend = match BackendClient::new(&credentials) {
                Ok(client) => {
                    tracing::info!("Backend client rebuilt for {}", credentials.base_url);
                    Some(Arc::new(client) as Arc<dyn VotingBackend>)
                }
                Err(e) => {
                    tracing::warn!("Backend client not available: {e}");
                    None
                }
            };
            *self.inner.backend.write().await = backend;
        }
        Ok(())
    }

    /// The configured backend, or a `NotConfigured` network error.
    pub async fn backend(&self) -> Result<Arc<dyn VotingBackend>, AppError> {
        self.inner.backend.read().await.clone().ok_or_else(|| {
            AppError::Network(BackendError::NotConfigured(
                "set BACKEND_URL and BACKEND_API_KEY".into(),
            ))
        })
    }

    /// Initialize the session context once; later calls return the same context.
    pub async fn init_session(&self) -> Result<SessionContext, AppError> {
        if let Some(ctx) = self.inner.session.read().await.clone() {
            return Ok(ctx);
        }

        let mut slot = self.inner.session.write().await;
        if let Some(ctx) = slot.clone() {
            return Ok(ctx);
        }
        let backend = self.inner.backend.read().await.clone();
        let ctx = SessionContext::initialize(self.inner.db.clone(), backend.as_deref()).await?;
        *slot = Some(ctx.clone());
        Ok(ctx)
    }

    /// The session context, initializing it on first use.
    pub async fn session(&self) -> Result<SessionContext, AppError> {
        self.init_session().await
    }

    pub async fn teardown_session(&self) {
        if let Some(ctx) = self.inner.session.write().await.take() {
            ctx.teardown();
        }
    }

    /// Start watching the category after `category_id`, replacing any previous watcher.
    pub async fn mount_watcher(&self, backend: Arc<dyn VotingBackend>, category_id: &str) {
        let interval = self.config().await.poll_interval();
        let watcher = NextCategoryWatcher::spawn(
            backend,
            category_id,
            interval,
            &self.inner.shutdown_token,
            self.inner.ws_tx.clone(),
        );
        if let Some(previous) = self.inner.watcher.lock().await.replace(watcher) {
            tracing::debug!(category_id = previous.category_id(), "Replacing next-category watcher");
            previous.cancel();
        }
    }

    /// Stop the watcher if it belongs to `category_id`. Returns whether one was stopped.
    pub async fn unmount_watcher(&self, category_id: &str) -> bool {
        let mut slot = self.inner.watcher.lock().await;
        if slot.as_ref().is_some_and(|w| w.category_id() == category_id) {
            if let Some(watcher) = slot.take() {
                watcher.cancel();
            }
            return true;
        }
        false
    }

    pub async fn stop_watcher(&self) {
        if let Some(watcher) = self.inner.watcher.lock().await.take() {
            watcher.stop().await;
        }
    }

    /// Category id and last status of the mounted watcher.
    pub async fn watcher_status(&self) -> Option<(String, Option<NextCategoryStatus>)> {
        self.inner
            .watcher
            .lock()
            .await
            .as_ref()
            .map(|w| (w.category_id().to_string(), w.latest()))
    }
}
