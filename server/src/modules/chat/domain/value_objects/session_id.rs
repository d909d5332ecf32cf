use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 会话 ID 最大长度（字符数）
pub const MAX_SESSION_ID_CHARS: usize = 128;

/// 未指定会话时使用的默认会话
pub const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionIdError {
    #[error("session_id must not be empty")]
    Empty,

    #[error("session_id must be at most {max} characters")]
    TooLong { max: usize },
}

/// 会话唯一标识符
///
/// 值对象：由客户端提供，去除首尾空白后非空且长度受限
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// 从字符串解析
    pub fn parse(s: &str) -> Result<Self, SessionIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SessionIdError::Empty);
        }
        if trimmed.chars().count() > MAX_SESSION_ID_CHARS {
            return Err(SessionIdError::TooLong {
                max: MAX_SESSION_ID_CHARS,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self(DEFAULT_SESSION_ID.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
