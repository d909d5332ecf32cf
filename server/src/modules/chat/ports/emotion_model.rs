use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 情感模型错误类型
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Model API error: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
}

/// 单个标签的概率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// 情感分类模型端口
///
/// 预训练文本分类模型的抽象，返回每个模型标签的概率
#[async_trait]
pub trait EmotionModel: Send + Sync {
    /// 模型标识
    fn model_id(&self) -> &str;

    /// 对文本推理，返回标签概率分布
    async fn predict(&self, text: &str) -> Result<Vec<LabelScore>, ModelError>;
}
