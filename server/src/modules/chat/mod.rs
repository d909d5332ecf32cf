// Chat Module - 聊天模块
//
// 实现六边形架构（Hexagonal Architecture）：
// - domain: 领域层，包含实体、值对象和领域服务（情感分类、模板组合）
// - ports: 端口层，定义与外部世界的抽象接口
// - infrastructure: 基础设施层，实现端口的具体适配器
// - application: 应用层，实现 CQRS 命令和查询处理器

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型
pub use application::{
    ApplicationError, CommandHandler, ListMessagesHandler, ListMessagesQuery,
    ListMessagesResponse, QueryHandler, SendMessageCommand, SendMessageHandler,
    SendMessageResponse, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT,
};

pub use domain::{
    Classification, ClassificationSource, ContextBuilder, Emotion, EmotionClassifier,
    EmotionScores, Message, MessageRole, ReplyTemplateTable, SessionId, TemplateComposer,
};

pub use infrastructure::{
    HostedInferenceConfig, HostedInferenceModel, HostedReplyGenerator, HostedReplyOptions,
    InMemoryMessageRepository, OpenAIAdapter, SqliteMessageRepository,
};

pub use ports::{
    EmotionModel, GeneratedReply, LLMPort, LLMProviderConfig, MessageRepository, ReplyGenerator,
    ReplySource, RepositoryError,
};

use std::sync::Arc;

/// 会话历史参数
#[derive(Debug, Clone, Copy)]
pub struct HistoryOptions {
    /// 传给回复生成器的历史条数
    pub context_messages: usize,
    /// 响应中返回的历史条数
    pub history_limit: usize,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            context_messages: domain::services::DEFAULT_CONTEXT_MESSAGES,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Chat 模块容器
///
/// 管理模块内的依赖注入，分类器与回复生成器在启动时构建一次
pub struct ChatModule {
    message_repository: Arc<dyn MessageRepository>,
    classifier: Arc<EmotionClassifier>,
    reply_generator: Arc<dyn ReplyGenerator>,
    history: HistoryOptions,
    // Handlers
    send_message_handler: SendMessageHandler,
    list_messages_handler: ListMessagesHandler,
}

impl ChatModule {
    /// 创建新的 ChatModule 实例（内存存储、关键词分类、模板回复，用于开发测试）
    pub fn new() -> Self {
        let message_repository: Arc<dyn MessageRepository> =
            Arc::new(InMemoryMessageRepository::new());
        let composer = TemplateComposer::new(Arc::new(ReplyTemplateTable::builtin()));

        Self::with_components(
            message_repository,
            Arc::new(EmotionClassifier::keyword_only()),
            Arc::new(composer),
            HistoryOptions::default(),
        )
    }

    /// 使用自定义组件创建 ChatModule
    pub fn with_components(
        message_repository: Arc<dyn MessageRepository>,
        classifier: Arc<EmotionClassifier>,
        reply_generator: Arc<dyn ReplyGenerator>,
        history: HistoryOptions,
    ) -> Self {
        let send_message_handler = SendMessageHandler::new(
            message_repository.clone(),
            classifier.clone(),
            reply_generator.clone(),
            history.context_messages,
            history.history_limit,
        );
        let list_messages_handler = ListMessagesHandler::new(message_repository.clone());

        Self {
            message_repository,
            classifier,
            reply_generator,
            history,
            send_message_handler,
            list_messages_handler,
        }
    }

    // Command handlers

    /// 处理一轮对话
    pub async fn send_message(
        &self,
        command: SendMessageCommand,
    ) -> Result<SendMessageResponse, ApplicationError> {
        self.send_message_handler.handle(command).await
    }

    // Query handlers

    /// 列出会话消息
    pub async fn list_messages(
        &self,
        query: ListMessagesQuery,
    ) -> Result<ListMessagesResponse, ApplicationError> {
        self.list_messages_handler.handle(query).await
    }

    // Accessors

    /// 获取情感分类器
    pub fn classifier(&self) -> &Arc<EmotionClassifier> {
        &self.classifier
    }

    /// 获取回复生成器
    pub fn reply_generator(&self) -> &Arc<dyn ReplyGenerator> {
        &self.reply_generator
    }

    /// 获取消息仓储
    pub fn message_repository(&self) -> &Arc<dyn MessageRepository> {
        &self.message_repository
    }

    /// 默认历史条数
    pub fn history_limit(&self) -> usize {
        self.history.history_limit
    }
}

impl Default for ChatModule {
    fn default() -> Self {
        Self::new()
    }
}
