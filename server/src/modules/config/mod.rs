// Config Module
//
// 配置管理模块
//
// 层次结构:
// - domain: 领域层，包含配置结构、合并与校验
// - ports: 端口层，定义配置错误
// - infrastructure: 基础设施层，从文件与环境变量加载配置

pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型
pub use domain::{
    AppConfig, ChatConfig, ClassifierConfig, LLMConfig, PartialAppConfig, ServerConfig,
    StorageConfig,
};
pub use infrastructure::{ConfigLoader, CONFIG_PATH_ENV};
pub use ports::ConfigError;
