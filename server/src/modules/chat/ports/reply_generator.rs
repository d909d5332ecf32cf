use async_trait::async_trait;
use serde::Serialize;

use super::super::domain::{Emotion, Message};

/// 回复来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// 模板组合
    Template,
    /// 托管模型生成
    Hosted,
    /// 托管模型失败后退回模板
    TemplateFallback,
}

/// 生成的回复
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedReply {
    pub text: String,
    pub source: ReplySource,
}

/// 回复生成端口
///
/// 模板实现与托管模型实现可互换，启动时根据配置选择。
/// 生成过程不向调用方暴露错误。
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// 实现名称（用于健康检查）
    fn kind(&self) -> &'static str;

    async fn generate(&self, text: &str, emotion: Emotion, history: &[Message]) -> GeneratedReply;
}
