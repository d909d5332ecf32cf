use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use super::super::{ApplicationError, CommandHandler};
use crate::modules::chat::domain::{Classification, EmotionClassifier, Message, SessionId};
use crate::modules::chat::ports::{GeneratedReply, MessageRepository, ReplyGenerator};

/// 默认返回的历史条数
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// 发送消息命令
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    /// 会话 ID
    pub session_id: SessionId,
    /// 用户消息内容（允许为空，空内容分类为 neutral）
    pub text: String,
}

impl SendMessageCommand {
    pub fn new(session_id: SessionId, text: impl Into<String>) -> Self {
        Self {
            session_id,
            text: text.into(),
        }
    }
}

/// 发送消息响应
#[derive(Debug, Clone)]
pub struct SendMessageResponse {
    /// 情感分类结果
    pub classification: Classification,
    /// 生成的回复
    pub reply: GeneratedReply,
    /// 写入本轮后的最近历史（从旧到新）
    pub history: Vec<Message>,
}

/// 发送消息命令处理器
///
/// 分类 -> 读取上下文 -> 生成回复 -> 写入用户与助手消息 -> 返回最近历史
pub struct SendMessageHandler {
    message_repository: Arc<dyn MessageRepository>,
    classifier: Arc<EmotionClassifier>,
    reply_generator: Arc<dyn ReplyGenerator>,
    /// 传给回复生成器的历史条数
    context_messages: usize,
    /// 响应中返回的历史条数
    history_limit: usize,
}

impl SendMessageHandler {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        classifier: Arc<EmotionClassifier>,
        reply_generator: Arc<dyn ReplyGenerator>,
        context_messages: usize,
        history_limit: usize,
    ) -> Self {
        Self {
            message_repository,
            classifier,
            reply_generator,
            context_messages,
            history_limit,
        }
    }
}

#[async_trait]
impl CommandHandler<SendMessageCommand, SendMessageResponse> for SendMessageHandler {
    async fn handle(
        &self,
        command: SendMessageCommand,
    ) -> Result<SendMessageResponse, ApplicationError> {
        let SendMessageCommand { session_id, text } = command;

        let classification = self.classifier.classify(&text).await;
        debug!(
            "[SendMessageHandler] session={} emotion={} source={:?}",
            session_id, classification.emotion, classification.source
        );

        let context = self
            .message_repository
            .load_recent(&session_id, self.context_messages)
            .await?;

        let reply = self
            .reply_generator
            .generate(&text, classification.emotion, &context)
            .await;

        let user_message = Message::new_user(session_id.clone(), text, classification.emotion);
        self.message_repository.append(&user_message).await?;

        let assistant_message = Message::new_assistant(session_id.clone(), reply.text.clone());
        self.message_repository.append(&assistant_message).await?;

        let history = self
            .message_repository
            .load_recent(&session_id, self.history_limit)
            .await?;

        info!(
            "[SendMessageHandler] Turn stored for session {} (reply: {:?})",
            session_id, reply.source
        );

        Ok(SendMessageResponse {
            classification,
            reply,
            history,
        })
    }
}
