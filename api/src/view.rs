use axum::{extract::State, response::Html};
use handlebars::Handlebars;
use serde_json::json;

use crate::{error::ApiError, AppState};

const ABOUT: &str = "about";

/// Server-rendered pages. Templates are compiled into the binary and
/// registered once at startup.
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> anyhow::Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_template_string(ABOUT, include_str!("../templates/about.hbs"))?;

        Ok(Self { registry })
    }
}

#[tracing::instrument(name = "http::about", skip_all)]
pub async fn about(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let whispers = state.db.get_all().await?;

    let page = state
        .views
        .registry
        .render(ABOUT, &json!({ "whispers": whispers }))
        .map_err(anyhow::Error::from)?;

    Ok(Html(page))
}
