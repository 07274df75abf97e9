use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Json, Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use common::Whisper;
use serde_json::Value;

use crate::{error::ApiError, store::Mutation, AppState};

pub fn whisper_router() -> Router<AppState> {
    Router::new()
        .route("/whisper", get(list_whispers).post(create_whisper))
        .route(
            "/whisper/:id",
            get(get_whisper).patch(update_whisper).delete(delete_whisper),
        )
}

#[tracing::instrument(name = "http::health")]
pub async fn health() -> &'static str {
    "ok"
}

#[tracing::instrument(name = "http::list_whispers", skip_all)]
async fn list_whispers(State(state): State<AppState>) -> Result<Json<Vec<Whisper>>, ApiError> {
    Ok(Json(state.db.get_all().await?))
}

#[tracing::instrument(name = "http::get_whisper", skip(state))]
async fn get_whisper(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Whisper>, ApiError> {
    let id = whisper_id(id)?;

    match state.db.get_by_id(id).await? {
        Some(whisper) => Ok(Json(whisper)),
        None => Err(ApiError::NotFound),
    }
}

#[tracing::instrument(name = "http::create_whisper", skip_all)]
async fn create_whisper(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let message = message_from(body)?;

    let whisper = state.db.create(message).await?;
    tracing::info!(id = whisper.id, "whisper created");

    Ok((StatusCode::CREATED, Json(whisper)))
}

#[tracing::instrument(name = "http::update_whisper", skip(state, body))]
async fn update_whisper(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let message = message_from(body)?;
    let id = whisper_id(id)?;

    if state.db.get_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    match state.db.update_by_id(id, message).await? {
        Mutation::Applied => Ok(StatusCode::NO_CONTENT),
        Mutation::NotFound => Err(ApiError::NotFound),
    }
}

#[tracing::instrument(name = "http::delete_whisper", skip(state))]
async fn delete_whisper(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = whisper_id(id)?;

    if state.db.get_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    match state.db.delete_by_id(id).await? {
        Mutation::Applied => Ok(StatusCode::NO_CONTENT),
        Mutation::NotFound => Err(ApiError::NotFound),
    }
}

// An id that is not a whole number cannot match any whisper.
fn whisper_id(path: Result<Path<String>, PathRejection>) -> Result<u64, ApiError> {
    let Path(raw) = path.map_err(|_| ApiError::NotFound)?;
    parse_id(&raw).ok_or(ApiError::NotFound)
}

/// Accepts `1` as well as integral float forms such as `1.0` or `1e0`.
fn parse_id(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().or_else(|| {
        let n = raw.parse::<f64>().ok()?;
        let whole = n.is_finite() && n.fract() == 0.0 && n >= 0.0 && n < u64::MAX as f64;
        whole.then_some(n as u64)
    })
}

fn message_from(body: Result<Json<Value>, JsonRejection>) -> Result<String, ApiError> {
    let Json(mut body) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    match body.get_mut("message").map(Value::take) {
        Some(Value::String(message)) if !message.is_empty() => Ok(message),
        Some(_) => Err(ApiError::BadRequest(
            "message must be a non-empty string".into(),
        )),
        None => Err(ApiError::BadRequest("message is required".into())),
    }
}
