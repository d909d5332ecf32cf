use std::sync::Arc;
use tracing::{info, warn};

use crate::modules::chat::domain::{ContextBuilder, Emotion, ReplyTemplateTable};
use crate::modules::chat::infrastructure::DEFAULT_EMOTION_MODEL;
use crate::modules::chat::{
    ChatModule, EmotionClassifier, HistoryOptions, HostedInferenceConfig, HostedInferenceModel,
    HostedReplyGenerator, HostedReplyOptions, InMemoryMessageRepository, LLMProviderConfig,
    MessageRepository, OpenAIAdapter, ReplyGenerator, SqliteMessageRepository, TemplateComposer,
};
use crate::modules::config::AppConfig;
use crate::shared::AppResult;

/// 应用全局状态
///
/// 启动时构建一次，所有请求共享只读引用
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatModule>,
}

impl AppState {
    pub fn new(chat: Arc<ChatModule>) -> Self {
        Self { chat }
    }

    /// 根据配置装配存储、分类器与回复生成器
    pub async fn build(config: &AppConfig) -> AppResult<Self> {
        let message_repository = Self::build_repository(config).await?;
        let classifier = Arc::new(Self::build_classifier(config)?);

        let table = Self::load_templates(config).await?;
        let composer = Arc::new(TemplateComposer::new(Arc::new(table)));
        let reply_generator = Self::build_reply_generator(config, composer)?;

        info!(
            "[AppState] classifier={} reply_generator={}",
            if classifier.has_model() { "model" } else { "keyword" },
            reply_generator.kind()
        );

        let chat = ChatModule::with_components(
            message_repository,
            classifier,
            reply_generator,
            HistoryOptions {
                context_messages: config.chat.context_messages,
                history_limit: config.chat.history_limit,
            },
        );

        Ok(Self::new(Arc::new(chat)))
    }

    async fn build_repository(config: &AppConfig) -> AppResult<Arc<dyn MessageRepository>> {
        if config.storage.is_memory() {
            warn!("[AppState] Using in-memory storage, history is lost on exit");
            return Ok(Arc::new(InMemoryMessageRepository::new()));
        }

        let repository = SqliteMessageRepository::connect(&config.storage.database_url).await?;
        Ok(Arc::new(repository))
    }

    fn build_classifier(config: &AppConfig) -> AppResult<EmotionClassifier> {
        let classifier = &config.classifier;
        let api_token = classifier
            .api_token
            .clone()
            .filter(|token| !token.trim().is_empty());

        // 仅有令牌时使用 Hugging Face 上的默认模型
        let endpoint = match (&classifier.endpoint, &api_token) {
            (Some(endpoint), _) => endpoint.clone(),
            (None, Some(_)) => {
                info!(
                    "[AppState] No classifier endpoint configured, using {} on Hugging Face",
                    DEFAULT_EMOTION_MODEL
                );
                HostedInferenceConfig::huggingface(DEFAULT_EMOTION_MODEL).endpoint
            }
            (None, None) => {
                info!("[AppState] No classifier endpoint configured, using keyword matching");
                return Ok(EmotionClassifier::keyword_only());
            }
        };

        let model = HostedInferenceModel::new(HostedInferenceConfig {
            endpoint,
            api_token,
            timeout_secs: classifier.timeout_secs,
        })?;
        Ok(EmotionClassifier::with_model(Arc::new(model)))
    }

    async fn load_templates(config: &AppConfig) -> AppResult<ReplyTemplateTable> {
        match &config.chat.templates_path {
            Some(path) => {
                let content = tokio::fs::read_to_string(path).await?;
                let table = ReplyTemplateTable::from_json(&content)?;
                info!("[AppState] Loaded reply templates from {}", path.display());

                let missing: Vec<&str> = Emotion::all()
                    .iter()
                    .filter(|emotion| !table.contains(**emotion))
                    .map(|emotion| emotion.as_str())
                    .collect();
                if !missing.is_empty() {
                    warn!(
                        "[AppState] No templates for {}, neutral templates are used",
                        missing.join(", ")
                    );
                }
                Ok(table)
            }
            None => Ok(ReplyTemplateTable::builtin()),
        }
    }

    fn build_reply_generator(
        config: &AppConfig,
        composer: Arc<TemplateComposer>,
    ) -> AppResult<Arc<dyn ReplyGenerator>> {
        let llm = &config.llm;
        let Some(api_key) = llm.api_key.clone().filter(|_| llm.is_enabled()) else {
            return Ok(composer);
        };

        let adapter = OpenAIAdapter::new(LLMProviderConfig {
            base_url: llm.base_url.clone(),
            api_key,
            timeout_secs: llm.timeout_secs,
            ..Default::default()
        })?;

        let mut context_builder = ContextBuilder::with_max_messages(config.chat.context_messages);
        if let Some(prompt) = config
            .chat
            .system_prompt
            .as_deref()
            .map(str::trim)
            .filter(|prompt| !prompt.is_empty())
        {
            context_builder = context_builder.with_system_prompt(prompt);
        }

        Ok(Arc::new(HostedReplyGenerator::new(
            Arc::new(adapter),
            context_builder,
            composer,
            HostedReplyOptions {
                model: llm.model.clone(),
                max_tokens: llm.max_tokens,
                temperature: llm.temperature,
            },
        )))
    }
}
