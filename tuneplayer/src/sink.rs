//! Audio sink abstraction
//!
//! The media output is a single owned resource. Implementations wrap the
//! platform's audio element (an HTTP renderer, a local decoder, a test
//! double); the [`SinkBinding`](crate::binding::SinkBinding) is the only
//! caller that mutates it.

use crate::error::Result;
use crate::resolve::PlaybackSource;

/// Single audio output of the player
#[async_trait::async_trait]
pub trait AudioSink: Send + Sync {
    /// Loads a new source, replacing whatever was loaded before
    ///
    /// Loading resets the sink position to zero. It must not start
    /// playback by itself.
    async fn load(&self, source: PlaybackSource) -> Result<()>;

    /// Starts or resumes playback of the loaded source
    async fn play(&self) -> Result<()>;

    /// Pauses playback, keeping the position
    async fn pause(&self) -> Result<()>;

    /// Applies a volume in the 0-100 range
    async fn set_volume(&self, volume: u8) -> Result<()>;

    /// Moves the playback position to a percentage of the duration (0-100)
    async fn seek_percent(&self, percent: f32) -> Result<()>;

    /// Current playback position in seconds
    async fn position_secs(&self) -> f64;

    /// Duration of the loaded source in seconds, if known
    async fn duration_secs(&self) -> Option<f64>;
}
