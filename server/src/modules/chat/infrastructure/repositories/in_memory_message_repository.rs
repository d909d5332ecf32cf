use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::modules::chat::domain::{Message, SessionId};
use crate::modules::chat::ports::{MessageRepository, RepositoryError};

/// 内存消息仓储
///
/// 进程退出即丢失，用于测试和 `memory` 存储配置
pub struct InMemoryMessageRepository {
    /// 消息存储（按会话分组，按追加顺序）
    messages: RwLock<HashMap<SessionId, Vec<Message>>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        let mut messages = self.messages.write().await;
        messages
            .entry(message.session_id().clone())
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn load_recent(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.read().await;

        Ok(messages
            .get(session_id)
            .map(|msgs| {
                let start = msgs.len().saturating_sub(limit);
                msgs[start..].to_vec()
            })
            .unwrap_or_default())
    }

    async fn count_by_session(&self, session_id: &SessionId) -> Result<usize, RepositoryError> {
        let messages = self.messages.read().await;

        Ok(messages.get(session_id).map(|msgs| msgs.len()).unwrap_or(0))
    }
}
