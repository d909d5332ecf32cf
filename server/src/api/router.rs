use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::{chat, health};
use crate::infrastructure::AppState;

/// 构建 HTTP 路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat::send_message))
        .route("/api/history/{session_id}", get(chat::get_history))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::ChatModule;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        build_router(AppState::new(Arc::new(ChatModule::new())))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_chat_endpoint() {
        let app = test_app();

        let (status, json) = send(
            &app,
            post_chat(r#"{"text": "I feel really sad and lonely today", "session_id": "s1"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["emotion"], "sad");
        assert_eq!(json["classification_source"], "keyword");
        assert_eq!(json["reply_source"], "template");
        assert_eq!(json["scores"].as_object().unwrap().len(), 7);
        assert!(json["reply"]
            .as_str()
            .unwrap()
            .contains("You said: \"I feel really sad and lonely today\""));

        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["role"], "user");
        assert_eq!(history[0]["emotion"], "sad");
        assert_eq!(history[1]["role"], "assistant");
        assert!(history[1]["emotion"].is_null());
    }

    #[tokio::test]
    async fn test_chat_defaults_session() {
        let app = test_app();

        let (status, _) = send(&app, post_chat(r#"{"text": "hello"}"#)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(&app, get_request("/api/history/default")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["session_id"], "default");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = test_app();

        let (status, json) = send(&app, post_chat("{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], true);
        assert_eq!(json["status"], 400);
        assert_eq!(json["error_code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_missing_text_is_bad_request() {
        let app = test_app();

        let (status, json) = send(&app, post_chat(r#"{"session_id": "s1"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_blank_session_is_bad_request() {
        let app = test_app();

        let (status, json) = send(&app, post_chat(r#"{"text": "hi", "session_id": "   "}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "session_id must not be empty");
    }

    #[tokio::test]
    async fn test_history_limit() {
        let app = test_app();
        for text in ["one", "two", "three"] {
            let body = format!(r#"{{"text": "{}", "session_id": "journal"}}"#, text);
            send(&app, post_chat(&body)).await;
        }

        let (status, json) = send(&app, get_request("/api/history/journal?limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["text"], "three");

        let (status, _) = send(&app, get_request("/api/history/journal?limit=abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();

        let (status, json) = send(&app, get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["classifier"], "keyword");
        assert_eq!(json["reply_generator"], "template");
    }
}
