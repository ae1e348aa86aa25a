/// Core error types for Riff Player
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Riff Player
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Track identifier was empty or whitespace
    #[error("Invalid track id: {0:?}")]
    InvalidTrackId(String),

    /// Queue index outside the current queue
    #[error("Queue index out of bounds: {index} (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}
