use crate::{app_builder, config::Config, AppState, JsonFileStore, WhisperStore};
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use common::Whisper;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

pub const INVENTED_ID: u64 = 12345;
pub const EXISTING_ID: u64 = 1;

pub fn fixtures() -> Vec<Whisper> {
    vec![Whisper::new(1, "test"), Whisper::new(2, "Hello World")]
}

/// A file-backed app whose db.json holds `whispers`. Keep the `TempDir`
/// alive for as long as the app is used.
pub async fn file_app(whispers: &[Whisper]) -> (Router, Arc<JsonFileStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db.json");
    std::fs::write(&path, serde_json::to_vec(whispers).unwrap()).unwrap();

    let store = Arc::new(JsonFileStore::open(path).await.unwrap());
    let app = app_with(store.clone(), Config::default());

    (app, store, dir)
}

pub fn app_with(db: Arc<dyn WhisperStore>, cfg: Config) -> Router {
    app_builder(AppState::new(db, cfg).unwrap())
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
