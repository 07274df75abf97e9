use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod file_store;
pub mod handlers;
pub mod in_memory_store;
pub mod store;
pub mod view;

pub use file_store::JsonFileStore;
pub use in_memory_store::InMemoryStore;
pub use store::{Mutation, WhisperStore};

use config::Config;
use view::Views;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn WhisperStore>,
    pub cfg: Config,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(db: Arc<dyn WhisperStore>, cfg: Config) -> anyhow::Result<Self> {
        Ok(Self {
            db,
            cfg,
            views: Arc::new(Views::new()?),
        })
    }
}

pub fn app_builder(state: AppState) -> Router {
    let prefix = state.cfg.route_prefix();

    let router = Router::new()
        .route("/health", get(handlers::health))
        .route("/about", get(view::about));

    // axum refuses to nest at the root
    let router = if prefix.is_empty() {
        router.merge(handlers::whisper_router())
    } else {
        router.nest(&prefix, handlers::whisper_router())
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
