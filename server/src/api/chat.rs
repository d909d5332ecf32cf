// Chat API
//
// 对话与历史查询的 HTTP 处理器

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::ApiResult;
use crate::infrastructure::AppState;
use crate::modules::chat::domain::value_objects::DEFAULT_SESSION_ID;
use crate::modules::chat::{
    ClassificationSource, Emotion, EmotionScores, ListMessagesQuery, Message, ReplySource,
    SendMessageCommand, SessionId,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub emotion: Emotion,
    pub scores: EmotionScores,
    pub reply: String,
    pub history: Vec<Message>,
    pub classification_source: ClassificationSource,
    pub reply_source: ReplySource,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: SessionId,
    pub messages: Vec<Message>,
}

/// POST /api/chat
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(request) = payload?;
    let session_id = SessionId::parse(request.session_id.as_deref().unwrap_or(DEFAULT_SESSION_ID))?;

    info!(
        "[api::send_message] session={} chars={}",
        session_id,
        request.text.chars().count()
    );

    let response = state
        .chat
        .send_message(SendMessageCommand::new(session_id, request.text))
        .await?;

    Ok(Json(ChatResponse {
        emotion: response.classification.emotion,
        scores: response.classification.scores,
        reply: response.reply.text,
        history: response.history,
        classification_source: response.classification.source,
        reply_source: response.reply.source,
    }))
}

/// GET /api/history/{session_id}
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> ApiResult<Json<HistoryResponse>> {
    let Query(params) = params?;
    let session_id = SessionId::parse(&session_id)?;
    let limit = params.limit.unwrap_or_else(|| state.chat.history_limit());

    let response = state
        .chat
        .list_messages(ListMessagesQuery::new(session_id, limit))
        .await?;

    Ok(Json(HistoryResponse {
        session_id: response.session_id,
        messages: response.messages,
    }))
}
