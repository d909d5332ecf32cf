use sqlx::SqlitePool;
use tracing::info;

use crate::modules::chat::ports::RepositoryError;

const CREATE_MESSAGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    role TEXT NOT NULL,
    text TEXT NOT NULL,
    emotion TEXT NULL,
    timestamp TEXT NOT NULL
)
"#;

const CREATE_SESSION_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_messages_session ON messages (session_id, id)";

/// 建表（幂等）
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::query(CREATE_MESSAGES_TABLE).execute(pool).await?;
    sqlx::query(CREATE_SESSION_INDEX).execute(pool).await?;

    info!("[Migration] messages schema ready");
    Ok(())
}
