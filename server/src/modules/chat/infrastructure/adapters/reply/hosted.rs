use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::modules::chat::domain::{ContextBuilder, Emotion, Message, TemplateComposer};
use crate::modules::chat::ports::{
    CompletionRequest, GeneratedReply, LLMError, LLMPort, ReplyGenerator, ReplySource,
};

/// 托管模型回复参数
#[derive(Debug, Clone)]
pub struct HostedReplyOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for HostedReplyOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 150,
            temperature: 0.7,
        }
    }
}

/// 托管模型回复生成器
///
/// 调用失败时退回模板组合器，结果标记为 `template_fallback`
pub struct HostedReplyGenerator {
    llm: Arc<dyn LLMPort>,
    context_builder: ContextBuilder,
    fallback: Arc<TemplateComposer>,
    options: HostedReplyOptions,
}

impl HostedReplyGenerator {
    pub fn new(
        llm: Arc<dyn LLMPort>,
        context_builder: ContextBuilder,
        fallback: Arc<TemplateComposer>,
        options: HostedReplyOptions,
    ) -> Self {
        Self {
            llm,
            context_builder,
            fallback,
            options,
        }
    }

    async fn request_completion(
        &self,
        text: &str,
        emotion: Emotion,
        history: &[Message],
    ) -> Result<String, LLMError> {
        let messages = self
            .context_builder
            .build(history, text, emotion)
            .into_iter()
            .map(Into::into)
            .collect();

        let request = CompletionRequest::new(messages, self.options.model.clone())
            .with_max_tokens(self.options.max_tokens)
            .with_temperature(self.options.temperature);

        let response = self.llm.complete(request).await?;
        let content = response.content.trim();
        if content.is_empty() {
            return Err(LLMError::EmptyCompletion);
        }

        debug!(
            "[HostedReplyGenerator] {} returned {} tokens",
            self.llm.provider_id(),
            response.usage.completion_tokens
        );
        Ok(content.to_string())
    }
}

#[async_trait]
impl ReplyGenerator for HostedReplyGenerator {
    fn kind(&self) -> &'static str {
        "hosted"
    }

    async fn generate(&self, text: &str, emotion: Emotion, history: &[Message]) -> GeneratedReply {
        match self.request_completion(text, emotion, history).await {
            Ok(content) => GeneratedReply {
                text: content,
                source: ReplySource::Hosted,
            },
            Err(e) => {
                warn!(
                    "[HostedReplyGenerator] {} failed, using templates: {}",
                    self.llm.provider_id(),
                    e
                );
                GeneratedReply {
                    text: self.fallback.compose(text, emotion),
                    source: ReplySource::TemplateFallback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::domain::{ReplyTemplateTable, SessionId};
    use crate::modules::chat::ports::{CompletionResponse, FinishReason, TokenUsage};
    use std::sync::Mutex;

    /// 模拟 LLM 端口
    struct MockLLMPort {
        reply: Result<String, ()>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockLLMPort {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMPort for MockLLMPort {
        fn provider_id(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LLMError> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Ok(content) => Ok(CompletionResponse {
                    content: content.clone(),
                    finish_reason: FinishReason::Stop,
                    usage: TokenUsage::default(),
                }),
                Err(()) => Err(LLMError::AuthenticationError("Invalid API key".to_string())),
            }
        }
    }

    fn composer(seed: u64) -> Arc<TemplateComposer> {
        Arc::new(TemplateComposer::with_seed(
            Arc::new(ReplyTemplateTable::builtin()),
            seed,
        ))
    }

    fn generator(llm: Arc<MockLLMPort>, seed: u64) -> HostedReplyGenerator {
        HostedReplyGenerator::new(
            llm,
            ContextBuilder::new(),
            composer(seed),
            HostedReplyOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_hosted_reply_is_trimmed() {
        let llm = Arc::new(MockLLMPort::replying("  I'm here for you.\n"));
        let reply = generator(llm, 1)
            .generate("rough day", Emotion::Sad, &[])
            .await;

        assert_eq!(reply.text, "I'm here for you.");
        assert_eq!(reply.source, ReplySource::Hosted);
    }

    #[tokio::test]
    async fn test_failure_matches_template_output() {
        let text = "I feel really sad and lonely today";
        let llm = Arc::new(MockLLMPort::failing());
        let reply = generator(llm, 99).generate(text, Emotion::Sad, &[]).await;

        let expected = composer(99).compose(text, Emotion::Sad);
        assert_eq!(reply.text, expected);
        assert_eq!(reply.source, ReplySource::TemplateFallback);
    }

    #[tokio::test]
    async fn test_blank_completion_falls_back() {
        let llm = Arc::new(MockLLMPort::replying("   "));
        let reply = generator(llm, 5)
            .generate("I got the job", Emotion::Happy, &[])
            .await;

        assert_eq!(reply.source, ReplySource::TemplateFallback);
        assert!(!reply.text.is_empty());
    }

    #[tokio::test]
    async fn test_request_carries_context_and_options() {
        let llm = Arc::new(MockLLMPort::replying("ok"));
        let session_id = SessionId::default();
        let history = vec![
            Message::new_user(session_id.clone(), "hi", Emotion::Neutral),
            Message::new_assistant(session_id, "Hello!"),
        ];

        generator(llm.clone(), 1)
            .generate("I'm nervous", Emotion::Anxious, &history)
            .await;

        let requests = llm.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, Some(150));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(
            request.messages[3].content,
            "I'm nervous\n\nDetected emotion: anxious"
        );
    }
}
