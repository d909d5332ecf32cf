// Config Domain Entities
//
// 配置领域实体定义

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 默认日志过滤器（`RUST_LOG` 优先）
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            log_filter: "info,yorisoi_lib=debug".to_string(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `sqlite://...` 或 `memory`
    pub database_url: String,
}

impl StorageConfig {
    pub const MEMORY: &'static str = "memory";

    pub fn is_memory(&self) -> bool {
        self.database_url.eq_ignore_ascii_case(Self::MEMORY)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://yorisoi.db".to_string(),
        }
    }
}

/// 情感分类模型配置
///
/// 未配置 endpoint 但有令牌时使用 Hugging Face 默认模型，两者都没有时只使用关键词匹配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub endpoint: Option<String>,
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_token: None,
            timeout_secs: 15,
        }
    }
}

/// 托管对话模型配置
///
/// 有 api_key 时启用托管回复
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl LLMConfig {
    /// 是否配置了可用的凭证
    pub fn is_enabled(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 150,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

/// 对话配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// 响应中返回的历史条数
    pub history_limit: usize,
    /// 传给回复生成器的历史条数
    pub context_messages: usize,
    /// 自定义模板表（JSON），为空时使用内置模板
    pub templates_path: Option<PathBuf>,
    /// 托管回复的系统提示词，为空时使用内置提示词
    pub system_prompt: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: 10,
            context_messages: 6,
            templates_path: None,
            system_prompt: None,
        }
    }
}

/// 应用配置聚合根
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub classifier: ClassifierConfig,
    pub llm: LLMConfig,
    pub chat: ChatConfig,
}

impl AppConfig {
    /// 创建新的默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并部分配置（环境变量、命令行参数）
    pub fn merge(&mut self, partial: PartialAppConfig) {
        if let Some(host) = partial.host {
            self.server.host = host;
        }
        if let Some(port) = partial.port {
            self.server.port = port;
        }
        if let Some(log_filter) = partial.log_filter {
            self.server.log_filter = log_filter;
        }
        if let Some(database_url) = partial.database_url {
            self.storage.database_url = database_url;
        }
        if let Some(endpoint) = partial.classifier_endpoint {
            self.classifier.endpoint = Some(endpoint);
        }
        if let Some(token) = partial.classifier_token {
            self.classifier.api_token = Some(token);
        }
        if let Some(api_key) = partial.llm_api_key {
            self.llm.api_key = Some(api_key);
        }
        if let Some(base_url) = partial.llm_base_url {
            self.llm.base_url = base_url;
        }
        if let Some(model) = partial.llm_model {
            self.llm.model = model;
        }
    }

    /// 验证配置是否有效
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }
        if self.storage.database_url.trim().is_empty() {
            errors.push("storage.database_url must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            errors.push("llm.temperature must be between 0 and 2".to_string());
        }
        if self.llm.max_tokens == 0 {
            errors.push("llm.max_tokens must be greater than 0".to_string());
        }
        if self.chat.history_limit == 0 {
            errors.push("chat.history_limit must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// 部分配置更新（用于合并）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialAppConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_filter: Option<String>,
    pub database_url: Option<String>,
    pub classifier_endpoint: Option<String>,
    pub classifier_token: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.chat.history_limit, 10);
        assert_eq!(config.chat.context_messages, 6);
        assert_eq!(config.llm.max_tokens, 150);
        assert!(!config.llm.is_enabled());
        assert!(config.classifier.endpoint.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_app_config_merge() {
        let mut config = AppConfig::default();
        config.merge(PartialAppConfig {
            port: Some(8080),
            llm_api_key: Some("sk-test".to_string()),
            ..Default::default()
        });

        assert_eq!(config.server.port, 8080);
        assert!(config.llm.is_enabled());
        // 其他字段保持不变
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_partial_chat_section() {
        let config: AppConfig =
            serde_json::from_str(r#"{"chat": {"system_prompt": "Be gentle."}}"#).unwrap();

        assert_eq!(config.chat.system_prompt.as_deref(), Some("Be gentle."));
        assert_eq!(config.chat.history_limit, 10);
        assert!(config.chat.templates_path.is_none());
    }

    #[test]
    fn test_blank_api_key_is_disabled() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("   ".to_string());
        assert!(!config.llm.is_enabled());
    }

    #[test]
    fn test_app_config_validate() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        config.llm.temperature = 2.5;
        config.llm.max_tokens = 0;
        config.chat.history_limit = 0;

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_memory_storage() {
        let mut config = AppConfig::default();
        assert!(!config.storage.is_memory());
        config.storage.database_url = "memory".to_string();
        assert!(config.storage.is_memory());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"server": {"port": 9000}, "chat": {"history_limit": 20}}"#)
                .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.chat.history_limit, 20);
        assert_eq!(config.chat.context_messages, 6);
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("sk-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }
}
