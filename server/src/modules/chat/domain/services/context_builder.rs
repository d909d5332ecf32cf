use super::super::entities::Message;
use super::super::value_objects::Emotion;

/// 托管模型使用的系统提示词
pub const EMPATHY_SYSTEM_PROMPT: &str = "You are an empathetic assistant that validates feelings, reflects briefly, and offers a small coping suggestion. Be concise and kind.";

/// 默认携带的历史轮数
pub const DEFAULT_CONTEXT_MESSAGES: usize = 6;

/// 上下文构建器
///
/// 领域服务：构建托管模型请求的上下文（系统提示 + 最近历史 + 当前消息）
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    /// 最大历史消息数
    max_messages: usize,
    /// 系统提示词
    system_prompt: String,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            max_messages: DEFAULT_CONTEXT_MESSAGES,
            system_prompt: EMPATHY_SYSTEM_PROMPT.to_string(),
        }
    }

    /// 创建指定最大消息数的上下文构建器
    pub fn with_max_messages(max_messages: usize) -> Self {
        Self {
            max_messages,
            ..Self::new()
        }
    }

    /// 设置系统提示词
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// 构建上下文消息列表
    ///
    /// 1. 系统提示词
    /// 2. 最近的 N 条对话消息
    /// 3. 附带检测情感的当前用户消息
    pub fn build(&self, history: &[Message], text: &str, emotion: Emotion) -> Vec<ChatMessage> {
        let start = history.len().saturating_sub(self.max_messages);
        let mut context = Vec::with_capacity(history.len() - start + 2);

        context.push(ChatMessage {
            role: "system".to_string(),
            content: self.system_prompt.clone(),
        });

        for msg in &history[start..] {
            context.push(ChatMessage {
                role: msg.role().to_openai_role().to_string(),
                content: msg.text().to_string(),
            });
        }

        context.push(ChatMessage {
            role: "user".to_string(),
            content: format!("{}\n\nDetected emotion: {}", text, emotion),
        });

        context
    }
}

/// LLM 请求消息格式
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}
