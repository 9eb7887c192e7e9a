/// Core error types for YouTube TV
use thiserror::Error;

/// Result type alias using `TvError`
pub type Result<T> = std::result::Result<T, TvError>;

/// Core error type for YouTube TV
///
/// The playback engine itself never raises these for missing data; they
/// only cross the persistence seam.
#[derive(Error, Debug)]
pub enum TvError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl TvError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
