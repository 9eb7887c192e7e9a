/// Session error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] tv_storage::StorageError),

    #[error(transparent)]
    Core(#[from] tv_core::TvError),
}

impl From<::config::ConfigError> for SessionError {
    fn from(err: ::config::ConfigError) -> Self {
        SessionError::Config(err.to_string())
    }
}
