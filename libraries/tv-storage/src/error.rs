/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Serialization error on write
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Write rejected by a gateway set to fail
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for tv_core::TvError {
    fn from(err: StorageError) -> Self {
        tv_core::TvError::storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_core_error() {
        let err: tv_core::TvError = StorageError::WriteFailed("offline".into()).into();
        assert_eq!(err.to_string(), "Storage error: Write failed: offline");
    }
}
