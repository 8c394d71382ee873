//! Error types for the rendering layer

use thiserror::Error;

/// Errors raised while resolving sources or driving the sink
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Track has neither an offline copy nor a network variant
    #[error("No playable source for track {0}")]
    NoPlayableSource(String),

    /// Offline cache lookup failed
    #[error("Offline cache error: {0}")]
    Offline(#[from] tuneoffline::Error),

    /// The sink rejected an operation
    #[error("Sink error: {0}")]
    Sink(String),
}

/// Result type for tuneplayer operations
pub type Result<T> = std::result::Result<T, PlayerError>;
