//! Device-local session identity and the informational admin flag.
//!
//! The session id is a UUID v4 generated once per device and kept in the
//! local store forever. Registration with the backend happens once: a
//! `session_registered` marker is written after it succeeds, and an
//! unregistered id is registered again on the next start only.

use chrono::Utc;
use voting_backend::VotingBackend;
use voting_db::Database;
use voting_db::local_storage::{
    ADMIN_AUTHENTICATED_KEY, SESSION_CREATED_AT_KEY, SESSION_ID_KEY, SESSION_REGISTERED_KEY,
};

use crate::error::AppError;

/// Return the persisted session id, creating and registering it if needed.
///
/// The id is persisted before registration is attempted; a failed or
/// skipped registration is logged and does not fail the call.
pub async fn get_or_create_session_id(
    db: &Database,
    backend: Option<&dyn VotingBackend>,
) -> Result<String, AppError> {
    let session_id = match db.get_item(SESSION_ID_KEY)? {
        Some(id) if !id.is_empty() => id,
        _ => {
            let candidate = uuid::Uuid::new_v4().to_string();
            if db.set_item_if_absent(SESSION_ID_KEY, &candidate)? {
                db.set_timestamp(SESSION_CREATED_AT_KEY, Utc::now())?;
                tracing::info!(session_id = %candidate, "Created new session id");
                candidate
            } else {
                // An empty value was stored; replace it.
                db.set_item(SESSION_ID_KEY, &candidate)?;
                db.set_timestamp(SESSION_CREATED_AT_KEY, Utc::now())?;
                candidate
            }
        }
    };

    if !db.get_flag(SESSION_REGISTERED_KEY)? {
        register_once(db, backend, &session_id).await?;
    }

    Ok(session_id)
}

async fn register_once(
    db: &Database,
    backend: Option<&dyn VotingBackend>,
    session_id: &str,
) -> Result<(), AppError> {
    let Some(backend) = backend else {
        tracing::warn!("Backend not configured, session registration deferred to next start");
        return Ok(());
    };

    match backend.register_session(session_id).await {
        Ok(()) => {
            db.set_flag(SESSION_REGISTERED_KEY, true)?;
            tracing::info!(session_id, "Session registered with backend");
        }
        Err(e) => {
            tracing::warn!(session_id, "Session registration failed: {e}");
        }
    }
    Ok(())
}

/// Process-wide session context, created once at startup and torn down on shutdown.
#[derive(Clone)]
pub struct SessionContext {
    db: Database,
    session_id: String,
}

impl SessionContext {
    pub async fn initialize(
        db: Database,
        backend: Option<&dyn VotingBackend>,
    ) -> Result<Self, AppError> {
        let session_id = get_or_create_session_id(&db, backend).await?;
        Ok(Self { db, session_id })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_registered(&self) -> bool {
        self.db.get_flag(SESSION_REGISTERED_KEY).unwrap_or(false)
    }

    pub fn is_admin(&self) -> bool {
        self.db.get_flag(ADMIN_AUTHENTICATED_KEY).unwrap_or(false)
    }

    /// Compare `password` against the configured admin password.
    ///
    /// An empty configured password never matches.
    pub fn authenticate(&self, password: &str, expected: &str) -> Result<bool, AppError> {
        let ok = !expected.is_empty() && password == expected;
        self.db.set_flag(ADMIN_AUTHENTICATED_KEY, ok)?;
        if ok {
            tracing::info!("Admin authenticated");
        } else {
            tracing::warn!("Admin authentication rejected");
        }
        Ok(ok)
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.db.set_flag(ADMIN_AUTHENTICATED_KEY, false)?;
        tracing::info!("Admin logged out");
        Ok(())
    }

    /// The session id stays persisted; only the in-process context goes away.
    pub fn teardown(self) {
        tracing::info!(session_id = %self.session_id, "Session context torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FakeBackend;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[tokio::test]
    async fn creates_and_registers_exactly_once() {
        let db = db();
        let backend = FakeBackend::new();

        let first = get_or_create_session_id(&db, Some(&backend)).await.unwrap();
        let second = get_or_create_session_id(&db, Some(&backend)).await.unwrap();

        assert_eq!(first, second);
        assert!(uuid::Uuid::parse_str(&first).is_ok());
        assert_eq!(backend.register_calls(), 1);
        assert_eq!(backend.registered(), vec![first]);
        assert!(db.get_timestamp(SESSION_CREATED_AT_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn existing_id_survives_restart_without_registration() {
        let db = db();
        db.set_item(SESSION_ID_KEY, "persisted-id").unwrap();
        db.set_flag(SESSION_REGISTERED_KEY, true).unwrap();
        let backend = FakeBackend::new();

        let ctx = SessionContext::initialize(db.clone(), Some(&backend))
            .await
            .unwrap();
        assert_eq!(ctx.session_id(), "persisted-id");
        assert!(ctx.is_registered());
        assert_eq!(backend.register_calls(), 0);
    }

    #[tokio::test]
    async fn failed_registration_keeps_id_and_retries_on_next_start() {
        let db = db();
        let backend = FakeBackend::new();
        backend.fail_register(true);

        let id = get_or_create_session_id(&db, Some(&backend)).await.unwrap();
        assert_eq!(backend.register_calls(), 1);
        assert!(!db.get_flag(SESSION_REGISTERED_KEY).unwrap());

        backend.fail_register(false);
        let ctx = SessionContext::initialize(db.clone(), Some(&backend))
            .await
            .unwrap();
        assert_eq!(ctx.session_id(), id);
        assert_eq!(backend.register_calls(), 2);
        assert!(ctx.is_registered());
    }

    #[tokio::test]
    async fn missing_backend_defers_registration() {
        let db = db();
        let id = get_or_create_session_id(&db, None).await.unwrap();
        assert!(!id.is_empty());
        assert!(!db.get_flag(SESSION_REGISTERED_KEY).unwrap());
    }

    #[tokio::test]
    async fn admin_flag_follows_authentication() {
        let ctx = SessionContext::initialize(db(), None).await.unwrap();
        assert!(!ctx.is_admin());

        assert!(!ctx.authenticate("guess", "secret").unwrap());
        assert!(!ctx.is_admin());
        assert!(!ctx.authenticate("", "").unwrap());

        assert!(ctx.authenticate("secret", "secret").unwrap());
        assert!(ctx.is_admin());

        ctx.logout().unwrap();
        assert!(!ctx.is_admin());
        ctx.teardown();
    }
}
