//! Playback source resolution
//!
//! Decides, once per track change, where the audio bytes come from: the
//! offline cache when the track id is stored there, otherwise the best
//! network variant. Resolution is never re-run per frame.

use crate::error::{PlayerError, Result};
use std::path::PathBuf;
use tracing::debug;
use tunemodel::Track;
use tuneoffline::OfflineCache;

/// Where the audio for a track comes from
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackSource {
    /// Local file stored by the offline cache
    Offline(PathBuf),
    /// Network URL of the best download variant
    Stream(String),
}

impl PlaybackSource {
    /// True when the source is served from the offline cache
    pub fn is_offline(&self) -> bool {
        matches!(self, PlaybackSource::Offline(_))
    }
}

/// Resolves the playback source for a track
///
/// Offline wins over network: a stored copy is used even when the device is
/// online. Returns [`PlayerError::NoPlayableSource`] when the track has
/// neither an offline copy nor any download variant.
pub async fn resolve(track: &Track, cache: &OfflineCache) -> Result<PlaybackSource> {
    if let Some(entry) = cache.fetch(&track.id).await? {
        debug!(id = %track.id, "Resolved track to offline copy");
        return Ok(PlaybackSource::Offline(entry.path));
    }

    match track.best_download_url() {
        Some(url) => {
            debug!(id = %track.id, "Resolved track to network stream");
            Ok(PlaybackSource::Stream(url.to_string()))
        }
        None => Err(PlayerError::NoPlayableSource(track.id.clone())),
    }
}
