// Config Loader
//
// 默认值 -> JSON 配置文件 -> 环境变量 -> 命令行参数

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::modules::config::domain::{AppConfig, PartialAppConfig};
use crate::modules::config::ports::ConfigError;

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "YORISOI_CONFIG";

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// 配置加载器
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env: EnvLookup,
}

impl ConfigLoader {
    /// 读取进程环境变量
    pub fn new() -> Self {
        Self::with_env(|name| std::env::var(name).ok())
    }

    /// 使用自定义环境变量来源（测试用）
    pub fn with_env<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            config_path: None,
            env: Box::new(env),
        }
    }

    /// 显式指定配置文件（优先于 `YORISOI_CONFIG`）
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    fn var(&self, name: &str) -> Option<String> {
        (self.env)(name).filter(|v| !v.trim().is_empty())
    }

    /// 加载、合并并校验配置
    pub async fn load(&self, overrides: PartialAppConfig) -> Result<AppConfig, ConfigError> {
        let path = self
            .config_path
            .clone()
            .or_else(|| self.var(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::read_file(&path).await?,
            None => AppConfig::default(),
        };

        config.merge(self.env_overrides()?);
        config.merge(overrides);

        config
            .validate()
            .map_err(|errors| ConfigError::ValidationError { errors })?;

        debug!(
            "[ConfigLoader] storage={} classifier_endpoint={:?} hosted_llm={}",
            config.storage.database_url,
            config.classifier.endpoint,
            config.llm.is_enabled()
        );
        Ok(config)
    }

    async fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("[ConfigLoader] Loaded config file {}", path.display());
        Ok(config)
    }

    /// 环境变量覆盖项
    fn env_overrides(&self) -> Result<PartialAppConfig, ConfigError> {
        let port = self
            .var("YORISOI_PORT")
            .map(|raw| {
                raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidEnv {
                    name: "YORISOI_PORT".to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?;

        Ok(PartialAppConfig {
            host: self.var("YORISOI_HOST"),
            port,
            log_filter: self.var("YORISOI_LOG"),
            database_url: self.var("YORISOI_DATABASE_URL"),
            classifier_endpoint: self.var("YORISOI_CLASSIFIER_URL"),
            classifier_token: self.var("HF_API_TOKEN"),
            llm_api_key: self.var("OPENAI_API_KEY"),
            llm_base_url: self.var("OPENAI_BASE_URL"),
            llm_model: self.var("YORISOI_LLM_MODEL"),
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn loader(vars: &[(&str, &str)]) -> ConfigLoader {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigLoader::with_env(move |name| vars.get(name).cloned())
    }

    #[tokio::test]
    async fn test_defaults_without_sources() {
        let config = loader(&[]).load(PartialAppConfig::default()).await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_env_overrides_defaults() {
        let config = loader(&[
            ("YORISOI_PORT", "8088"),
            ("YORISOI_DATABASE_URL", "memory"),
            ("OPENAI_API_KEY", "sk-test"),
            ("YORISOI_CLASSIFIER_URL", "http://localhost:9000/classify"),
            ("HF_API_TOKEN", "hf_test"),
        ])
        .load(PartialAppConfig::default())
        .await
        .unwrap();

        assert_eq!(config.server.port, 8088);
        assert!(config.storage.is_memory());
        assert!(config.llm.is_enabled());
        assert_eq!(
            config.classifier.endpoint.as_deref(),
            Some("http://localhost:9000/classify")
        );
        assert_eq!(config.classifier.api_token.as_deref(), Some("hf_test"));
    }

    #[tokio::test]
    async fn test_blank_env_is_ignored() {
        let config = loader(&[("OPENAI_API_KEY", "  ")])
            .load(PartialAppConfig::default())
            .await
            .unwrap();
        assert!(!config.llm.is_enabled());
    }

    #[tokio::test]
    async fn test_invalid_port_env() {
        let result = loader(&[("YORISOI_PORT", "eighty")])
            .load(PartialAppConfig::default())
            .await;
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }

    #[tokio::test]
    async fn test_file_then_env_then_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server": {{"host": "0.0.0.0", "port": 7000}}, "llm": {{"model": "gpt-4o"}}}}"#
        )
        .unwrap();

        let config = loader(&[
            (CONFIG_PATH_ENV, file.path().to_str().unwrap()),
            ("YORISOI_PORT", "7100"),
        ])
        .load(PartialAppConfig {
            port: Some(7200),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 7200);
        assert_eq!(config.llm.model, "gpt-4o");
    }

    #[tokio::test]
    async fn test_explicit_path_wins_over_env_path() {
        let mut explicit = tempfile::NamedTempFile::new().unwrap();
        write!(explicit, r#"{{"chat": {{"history_limit": 25}}}}"#).unwrap();

        let config = loader(&[(CONFIG_PATH_ENV, "/nonexistent/yorisoi.json")])
            .with_config_path(Some(explicit.path().to_path_buf()))
            .load(PartialAppConfig::default())
            .await
            .unwrap();

        assert_eq!(config.chat.history_limit, 25);
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let result = loader(&[])
            .with_config_path(Some(PathBuf::from("/nonexistent/yorisoi.json")))
            .load(PartialAppConfig::default())
            .await;
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[tokio::test]
    async fn test_invalid_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = loader(&[])
            .with_config_path(Some(file.path().to_path_buf()))
            .load(PartialAppConfig::default())
            .await;
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_validation_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"llm": {{"temperature": 3.0}}}}"#).unwrap();

        let result = loader(&[])
            .with_config_path(Some(file.path().to_path_buf()))
            .load(PartialAppConfig::default())
            .await;
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
