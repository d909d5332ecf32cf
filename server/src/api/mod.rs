// HTTP API Layer
//
// axum 路由与处理器，只做请求解析与响应组装，业务逻辑在 ChatModule 中

pub mod chat;
pub mod error;
pub mod health;
mod router;

pub use error::{ApiError, ApiResult};
pub use router::build_router;
