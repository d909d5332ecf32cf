// Chat Domain Layer
// 领域层包含业务实体、值对象和领域服务

pub mod entities;
pub mod services;
pub mod value_objects;

// 重导出常用类型
pub use entities::{Message, MessageRole};
pub use services::{
    ChatMessage, Classification, ClassificationSource, ContextBuilder, EmotionClassifier,
    ReplyTemplateTable, TemplateComposer, TemplateEntry, TemplateError,
};
pub use value_objects::{Emotion, EmotionScores, SessionId, SessionIdError};
