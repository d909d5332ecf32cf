use async_trait::async_trait;
use thiserror::Error;

use super::super::domain::{Message, SessionId};

/// 仓储错误类型
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        RepositoryError::DatabaseError(e.to_string())
    }
}

/// 消息仓储端口
///
/// 按会话追加写入的消息日志
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// 追加消息
    async fn append(&self, message: &Message) -> Result<(), RepositoryError>;

    /// 获取会话最近的 `limit` 条消息，按时间从旧到新排列
    async fn load_recent(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError>;

    /// 获取会话的消息数量
    async fn count_by_session(&self, session_id: &SessionId) -> Result<usize, RepositoryError>;
}
