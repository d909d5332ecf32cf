// Health API

use axum::{extract::State, Json};
use serde::Serialize;

use crate::infrastructure::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// `model` 或 `keyword`
    pub classifier: &'static str,
    /// `hosted` 或 `template`
    pub reply_generator: &'static str,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let classifier = if state.chat.classifier().has_model() {
        "model"
    } else {
        "keyword"
    };

    Json(HealthResponse {
        status: "ok",
        classifier,
        reply_generator: state.chat.reply_generator().kind(),
    })
}
