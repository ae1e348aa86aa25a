//! Error types for the playback controller
//!
//! None of these cross the controller's action boundary: actions degrade to
//! `Idle` or a no-op and report through logs and `PlayerEvent::Error`.

use thiserror::Error;

/// Track failed to load or decode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to load {url}: {reason}")]
pub struct ResourceError {
    /// URL that was being loaded
    pub url: String,

    /// Backend-provided reason
    pub reason: String,
}

impl ResourceError {
    /// Create a resource error
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Navigation requested with zero tracks queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Queue is empty")]
pub struct EmptyQueueError;

/// OS media-session integration is not available
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Media session unsupported: {0}")]
pub struct UnsupportedMediaSessionError(pub String);

/// Playback errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Track failed to load
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Queue is empty
    #[error(transparent)]
    EmptyQueue(#[from] EmptyQueueError),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlayerError>;
