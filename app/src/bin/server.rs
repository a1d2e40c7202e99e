//! Headless server binary.
//!
//! Opens the local store, initializes the session, and serves the localhost
//! API until Ctrl+C.

use tracing_subscriber::EnvFilter;

use voting_app_lib::app::SharedState;
use voting_app_lib::server;
use voting_app_lib::shutdown;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting voting app server");

    let (db, config, dir) = voting_app_lib::init_foundation()?;
    let state = SharedState::new(db, config, dir);

    match state.init_session().await {
        Ok(ctx) => tracing::info!(session_id = ctx.session_id(), "Session ready"),
        Err(e) => tracing::error!("Session initialization failed: {e}"),
    }

    let server_state = state.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(server_state).await {
            tracing::error!("Server failed: {e}");
        }
    });

    tracing::info!(port = state.server_port(), "Server running. Press Ctrl+C to stop.");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    shutdown::graceful_shutdown(&state).await;
    if let Err(e) = server_handle.await {
        tracing::warn!("Server task ended abnormally: {e}");
    }
    Ok(())
}
