use async_trait::async_trait;
use std::sync::Arc;

use super::super::{ApplicationError, QueryHandler};
use crate::modules::chat::domain::{Message, SessionId};
use crate::modules::chat::ports::MessageRepository;

/// 单次查询的最大条数
pub const MAX_HISTORY_LIMIT: usize = 100;

/// 列出消息查询
#[derive(Debug, Clone)]
pub struct ListMessagesQuery {
    pub session_id: SessionId,
    pub limit: usize,
}

impl ListMessagesQuery {
    /// `limit` 超过上限时截断
    pub fn new(session_id: SessionId, limit: usize) -> Self {
        Self {
            session_id,
            limit: limit.min(MAX_HISTORY_LIMIT),
        }
    }
}

/// 列出消息响应
#[derive(Debug, Clone)]
pub struct ListMessagesResponse {
    pub session_id: SessionId,
    /// 从旧到新
    pub messages: Vec<Message>,
}

/// 列出消息查询处理器
pub struct ListMessagesHandler {
    message_repository: Arc<dyn MessageRepository>,
}

impl ListMessagesHandler {
    pub fn new(message_repository: Arc<dyn MessageRepository>) -> Self {
        Self { message_repository }
    }
}

#[async_trait]
impl QueryHandler<ListMessagesQuery, ListMessagesResponse> for ListMessagesHandler {
    async fn handle(
        &self,
        query: ListMessagesQuery,
    ) -> Result<ListMessagesResponse, ApplicationError> {
        let messages = self
            .message_repository
            .load_recent(&query.session_id, query.limit)
            .await?;

        Ok(ListMessagesResponse {
            session_id: query.session_id,
            messages,
        })
    }
}
