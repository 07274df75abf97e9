use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use whisper_api::{
    app_builder,
    config::{Config, StoreKind},
    AppState, InMemoryStore, JsonFileStore, WhisperStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::from_env().context("failed to load configuration")?;

    // set up logging, RUST_LOG wins over the configured level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let db: Arc<dyn WhisperStore> = match cfg.store {
        StoreKind::File => {
            let store = JsonFileStore::open(cfg.db_path.clone()).await?;
            tracing::info!(path = %store.path().display(), "using file store");
            Arc::new(store)
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store, whispers are lost on exit");
            Arc::new(InMemoryStore::default())
        }
    };

    let addr = cfg.socket_addr();
    let app = app_builder(AppState::new(db, cfg)?);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind failed: {addr}"))?;

    tracing::info!("Server running on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
