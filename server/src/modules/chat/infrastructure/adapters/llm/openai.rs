use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::modules::chat::ports::{
    CompletionRequest, CompletionResponse, FinishReason, LLMError, LLMPort, LLMProviderConfig,
    TokenUsage,
};

/// OpenAI 兼容 API 适配器
///
/// 只使用 `chat/completions` 的非流式接口，任何兼容该协议的服务都可接入
pub struct OpenAIAdapter {
    client: Client,
    config: LLMProviderConfig,
}

impl OpenAIAdapter {
    /// 创建新的 OpenAI 适配器
    pub fn new(config: LLMProviderConfig) -> Result<Self, LLMError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取 API URL
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// 转换为 OpenAI 请求格式
    fn to_openai_request(request: &CompletionRequest) -> OpenAIRequest {
        OpenAIRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| OpenAIMessage {
                    role: m.role.clone(),
                    content: Some(m.content.clone()),
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    /// 把错误状态码映射为 LLMError
    fn map_status(status: StatusCode, body: String) -> LLMError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => LLMError::RateLimitError {
                retry_after_secs: 60,
            },
            StatusCode::UNAUTHORIZED => {
                LLMError::AuthenticationError("Invalid API key".to_string())
            }
            _ => LLMError::ApiError {
                code: status.to_string(),
                message: body,
            },
        }
    }

    /// 解析补全响应
    fn parse_response(response: OpenAIResponse) -> Result<CompletionResponse, LLMError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::InvalidResponse("No choices in response".to_string()))?;

        let content = choice.message.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(LLMError::EmptyCompletion);
        }

        let usage = response
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            finish_reason: match choice.finish_reason.as_deref() {
                Some("length") => FinishReason::Length,
                Some("content_filter") => FinishReason::ContentFilter,
                _ => FinishReason::Stop,
            },
            usage,
        })
    }
}

#[async_trait]
impl LLMPort for OpenAIAdapter {
    fn provider_id(&self) -> &str {
        &self.config.id
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LLMError> {
        let openai_request = Self::to_openai_request(&request);

        debug!(
            "[OpenAIAdapter] Sending completion request: model={}, messages={}",
            openai_request.model,
            openai_request.messages.len()
        );

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("[OpenAIAdapter] API error: {} - {}", status, error_text);
            return Err(Self::map_status(status, error_text));
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| LLMError::InvalidResponse(e.to_string()))?;

        Self::parse_response(openai_response)
    }
}

// OpenAI API 类型定义

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
