use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;

use super::super::value_objects::{Emotion, SessionId};

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// 用户消息
    User,
    /// AI 助手消息
    Assistant,
}

impl MessageRole {
    /// 转换为 OpenAI 格式的角色名
    pub fn to_openai_role(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            _ => Err(format!("Unknown message role: {}", s)),
        }
    }
}

/// 消息实体
///
/// 每轮对话创建，写入存储后不可变，归属于会话
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// 所属会话 ID
    #[serde(skip_serializing)]
    session_id: SessionId,
    /// 消息角色
    role: MessageRole,
    /// 消息内容
    text: String,
    /// 情感（仅用户消息携带检测结果）
    emotion: Option<Emotion>,
    /// 创建时间
    timestamp: DateTime<Utc>,
}

impl Message {
    /// 创建用户消息
    pub fn new_user(session_id: SessionId, text: impl Into<String>, emotion: Emotion) -> Self {
        Self {
            session_id,
            role: MessageRole::User,
            text: text.into(),
            emotion: Some(emotion),
            timestamp: Utc::now(),
        }
    }

    /// 创建助手消息
    pub fn new_assistant(session_id: SessionId, text: impl Into<String>) -> Self {
        Self {
            session_id,
            role: MessageRole::Assistant,
            text: text.into(),
            emotion: None,
            timestamp: Utc::now(),
        }
    }

    /// 从存储恢复
    pub fn restore(
        session_id: SessionId,
        role: MessageRole,
        text: String,
        emotion: Option<Emotion>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            role,
            text,
            emotion,
            timestamp,
        }
    }

    // Getters
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn emotion(&self) -> Option<Emotion> {
        self.emotion
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
