// Modules Layer - 业务模块
//
// 按照六边形架构组织的业务模块：
// - chat: 聊天模块，处理情感分类、回复生成和消息存储
// - config: 配置模块，处理应用设置

pub mod chat;
pub mod config;

pub use chat::ChatModule;
