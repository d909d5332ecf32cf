// Chat Ports Layer
// 端口定义了模块与外部世界的接口

mod emotion_model;
mod llm_port;
mod message_repository;
mod reply_generator;

pub use emotion_model::*;
pub use llm_port::*;
pub use message_repository::*;
pub use reply_generator::*;
