use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use super::migration::run_migrations;
use crate::modules::chat::domain::{Emotion, Message, MessageRole, SessionId};
use crate::modules::chat::ports::{MessageRepository, RepositoryError};

/// SQLite 消息仓储
///
/// 消息按自增 id 排序，`(session_id, id)` 上有索引
pub struct SqliteMessageRepository {
    pool: SqlitePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 连接数据库（文件不存在时创建）并建表
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        run_migrations(&pool).await?;
        info!("[SqliteMessageRepository] Connected to {}", database_url);

        Ok(Self::new(pool))
    }

    #[cfg(test)]
    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 行的 session_id 已由查询条件限定，直接复用
    fn row_to_message(row: &SqliteRow, session_id: &SessionId) -> Result<Message, RepositoryError> {
        let id: i64 = row.try_get("id")?;
        let role: String = row.try_get("role")?;
        let text: String = row.try_get("text")?;
        let emotion: Option<String> = row.try_get("emotion")?;
        let timestamp: String = row.try_get("timestamp")?;

        let corrupt = |detail: String| {
            RepositoryError::CorruptRecord(format!(
                "message {} in session {}: {}",
                id, session_id, detail
            ))
        };

        let role = MessageRole::from_str(&role).map_err(corrupt)?;
        let emotion = emotion
            .map(|e| Emotion::from_str(&e))
            .transpose()
            .map_err(corrupt)?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| corrupt(format!("timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(Message::restore(
            session_id.clone(),
            role,
            text,
            emotion,
            timestamp,
        ))
    }
}

#[async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO messages (session_id, role, text, emotion, timestamp) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(message.session_id().as_str())
        .bind(message.role().to_openai_role())
        .bind(message.text())
        .bind(message.emotion().map(|e| e.as_str()))
        .bind(message.timestamp().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(
            "[SqliteMessageRepository] Appended {} message to {}",
            message.role().to_openai_role(),
            message.session_id()
        );
        Ok(())
    }

    async fn load_recent(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            r#"
            SELECT id, role, text, emotion, timestamp
            FROM messages
            WHERE session_id = ?
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(session_id.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut messages = rows
            .iter()
            .map(|row| Self::row_to_message(row, session_id))
            .collect::<Result<Vec<_>, _>>()?;
        messages.reverse();
        Ok(messages)
    }

    async fn count_by_session(&self, session_id: &SessionId) -> Result<usize, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE session_id = ?")
            .bind(session_id.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(usize::try_from(count).unwrap_or(0))
    }
}
