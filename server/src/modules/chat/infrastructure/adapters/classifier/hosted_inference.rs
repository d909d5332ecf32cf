use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::modules::chat::ports::{EmotionModel, LabelScore, ModelError};

/// 默认情感分类模型
pub const DEFAULT_EMOTION_MODEL: &str = "j-hartmann/emotion-english-distilroberta-base";

/// 托管推理服务配置
#[derive(Debug, Clone)]
pub struct HostedInferenceConfig {
    /// 推理端点（完整 URL）
    pub endpoint: String,
    /// 可选访问令牌
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl HostedInferenceConfig {
    /// Hugging Face Inference API 上某个模型的端点
    pub fn huggingface(model: &str) -> Self {
        Self {
            endpoint: format!("https://api-inference.huggingface.co/models/{}", model),
            api_token: None,
            timeout_secs: 15,
        }
    }
}

/// 托管文本分类模型适配器
///
/// 请求体 `{"inputs": text}`，响应为每个标签的概率
pub struct HostedInferenceModel {
    client: Client,
    config: HostedInferenceConfig,
}

impl HostedInferenceModel {
    pub fn new(config: HostedInferenceConfig) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 解析推理响应
    ///
    /// 兼容 `[[{label, score}]]` 与 `[{label, score}]` 两种形式
    fn parse_predictions(body: &str) -> Result<Vec<LabelScore>, ModelError> {
        let parsed: InferenceResponse =
            serde_json::from_str(body).map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let predictions = match parsed {
            InferenceResponse::Nested(mut batches) => {
                if batches.is_empty() {
                    Vec::new()
                } else {
                    batches.swap_remove(0)
                }
            }
            InferenceResponse::Flat(predictions) => predictions,
        };

        Ok(predictions
            .into_iter()
            .map(|p| LabelScore::new(p.label, p.score))
            .collect())
    }
}

#[async_trait]
impl EmotionModel for HostedInferenceModel {
    fn model_id(&self) -> &str {
        &self.config.endpoint
    }

    async fn predict(&self, text: &str) -> Result<Vec<LabelScore>, ModelError> {
        debug!("[HostedInference] Classifying {} chars", text.chars().count());

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&InferenceRequest { inputs: text });
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ModelError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ModelError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("[HostedInference] API error: {} - {}", status, body);
            return Err(ModelError::ApiError {
                code: status.to_string(),
                message: body,
            });
        }

        Self::parse_predictions(&body)
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct InferencePrediction {
    label: String,
    score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<InferencePrediction>>),
    Flat(Vec<InferencePrediction>),
}
