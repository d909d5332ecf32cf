use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::super::domain::ChatMessage;

/// LLM 错误类型
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitError { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty completion")]
    EmptyCompletion,
}

/// 聊天消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LLMChatMessage {
    pub role: String,
    pub content: String,
}

impl From<ChatMessage> for LLMChatMessage {
    fn from(message: ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content,
        }
    }
}

/// 补全请求
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// 消息历史
    pub messages: Vec<LLMChatMessage>,
    /// 模型 ID
    pub model: String,
    /// 最大生成 token 数
    pub max_tokens: Option<u32>,
    /// 温度参数 (0.0 - 2.0)
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<LLMChatMessage>, model: impl Into<String>) -> Self {
        Self {
            messages,
            model: model.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// 补全响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub finish_reason: FinishReason,
    pub usage: TokenUsage,
}

/// 结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
}

/// Token 使用统计
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// LLM 服务端口
///
/// 托管对话补全服务的抽象接口
#[async_trait]
pub trait LLMPort: Send + Sync {
    /// 获取提供商 ID
    fn provider_id(&self) -> &str;

    /// 单次补全请求
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LLMError>;
}

/// LLM 提供商配置
#[derive(Debug, Clone)]
pub struct LLMProviderConfig {
    pub id: String,
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for LLMProviderConfig {
    fn default() -> Self {
        Self {
            id: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}
