pub mod core;
pub mod routes;

use tracing_subscriber::EnvFilter;

use crate::core::error::{SyncError, SyncResult};
use crate::core::state::{AppState, Settings};

/// Load settings, prepare the family directories and serve the update
/// trigger until Ctrl-C.
pub async fn run() -> SyncResult<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,luximo_lib=debug")),
        )
        .init();

    tracing::info!("Luximo starting...");

    let settings = Settings::load()?;
    let state = AppState::bootstrap(settings).await?;
    let addr = state.settings.listen_addr;

    let app = routes::router(state.updater.clone());
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| SyncError::Config(format!("cannot bind {addr}: {e}")))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutting down");
        })
        .await
        .map_err(|e| SyncError::Config(format!("server error on {addr}: {e}")))
}
