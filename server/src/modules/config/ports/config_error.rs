use std::path::PathBuf;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid environment variable {name}: {message}")]
    InvalidEnv { name: String, message: String },

    #[error("Validation error: {errors:?}")]
    ValidationError { errors: Vec<String> },
}
