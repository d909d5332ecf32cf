// Chat Domain - Services
// 领域服务处理不属于任何实体的业务逻辑

mod context_builder;
mod emotion_classifier;
mod reply_templates;
mod template_composer;

pub use context_builder::*;
pub use emotion_classifier::*;
pub use reply_templates::*;
pub use template_composer::*;
