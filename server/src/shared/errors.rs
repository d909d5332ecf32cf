use thiserror::Error;

use crate::modules::chat::domain::TemplateError;
use crate::modules::chat::ports::{LLMError, ModelError};
use crate::modules::chat::RepositoryError;
use crate::modules::config::ConfigError;

/// 应用启动与运行期错误
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Reply template error: {0}")]
    Template(#[from] TemplateError),

    #[error("LLM client error: {0}")]
    LLM(#[from] LLMError),

    #[error("Classifier client error: {0}")]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
