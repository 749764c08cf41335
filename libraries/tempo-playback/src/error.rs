//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The media framework rejected a pipeline operation
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Settings could not be loaded or are out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// Queue operation with an invalid position
    #[error("Queue error: {0}")]
    Queue(String),

    /// Playlist parsing for a radio stream failed
    #[error("Radio resolution error: {0}")]
    Radio(String),

    /// Library or scrobbler collaborator failure
    #[error(transparent)]
    Core(#[from] tempo_core::CoreError),
}

impl From<config::ConfigError> for PlaybackError {
    fn from(err: config::ConfigError) -> Self {
        PlaybackError::Config(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
