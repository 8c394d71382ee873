//! Binding between the player store and the audio sink
//!
//! The binding is the single writer towards the sink. It consumes
//! [`PlayerEvent`]s from the store and applies them to the output; in the
//! other direction, [`SinkBinding::tick`] polls the sink position and feeds
//! it back to the store as progress.
//!
//! Browsers refuse autoplay until a user gesture: transport is therefore
//! gated by an `engaged` flag, armed by the first explicit user intent.

use crate::error::Result;
use crate::resolve::{self, PlaybackSource};
use crate::sink::AudioSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use tunemodel::Track;
use tuneoffline::OfflineCache;
use tunequeue::{PlayerEvent, PlayerStore};

/// Sink position beyond which "previous" restarts the current track
const PREVIOUS_RESTART_THRESHOLD_SECS: f64 = 3.0;

/// Applies player state to the audio sink, and sink progress to the state
pub struct SinkBinding {
    store: Arc<PlayerStore>,
    cache: Arc<OfflineCache>,
    sink: Arc<dyn AudioSink>,
    /// Armed by the first explicit user transport intent
    engaged: AtomicBool,
}

impl SinkBinding {
    /// Creates a binding over a store, an offline cache and a sink
    pub fn new(store: Arc<PlayerStore>, cache: Arc<OfflineCache>, sink: Arc<dyn AudioSink>) -> Self {
        Self {
            store,
            cache,
            sink,
            engaged: AtomicBool::new(false),
        }
    }

    /// True once a user gesture has armed the transport
    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::Acquire)
    }

    /// Marks the user-gesture gate as passed
    pub fn engage(&self) {
        self.engaged.store(true, Ordering::Release);
    }

    // ============ User intents ============

    /// User pressed play on a queue
    pub async fn play_intent(&self, tracks: Vec<Track>, index: usize) {
        self.engage();
        self.store.play_queue(tracks, index).await;
    }

    /// User pressed play/pause
    pub async fn toggle_intent(&self) {
        self.engage();
        self.store.toggle_play_pause().await;
    }

    /// User asked for the previous track
    ///
    /// Past the restart threshold this rewinds the current track without
    /// moving the queue pointer; before it, the queue steps back (with
    /// wraparound).
    pub async fn previous_intent(&self) -> Result<()> {
        self.engage();
        if self.sink.position_secs().await > PREVIOUS_RESTART_THRESHOLD_SECS {
            debug!("Previous intent restarts current track");
            self.sink.seek_percent(0.0).await?;
            self.store.report_progress(0.0).await;
        } else {
            self.store.previous().await;
        }
        Ok(())
    }

    /// User asked for the next track
    pub async fn next_intent(&self) {
        self.engage();
        self.store.next().await;
    }

    /// User dragged the progress bar
    ///
    /// Moves the sink and immediately reconciles the store's progress so
    /// the two never drift.
    pub async fn seek(&self, percent: f32) -> Result<()> {
        let percent = percent.clamp(0.0, 100.0);
        self.sink.seek_percent(percent).await?;
        self.store.report_progress(percent).await;
        Ok(())
    }

    // ============ Event application ============

    /// Applies one store event to the sink
    pub async fn handle_event(&self, event: PlayerEvent) -> Result<()> {
        match event {
            PlayerEvent::TrackChanged { track: Some(track) } => {
                let source = match resolve::resolve(&track, &self.cache).await {
                    Ok(source) => source,
                    Err(e) => {
                        warn!(id = %track.id, error = %e, "Track has no playable source");
                        return Err(e);
                    }
                };
                self.load_and_maybe_play(source).await?;
            }
            PlayerEvent::TrackChanged { track: None } => {
                self.sink.pause().await?;
            }
            PlayerEvent::TransportChanged { is_playing } => {
                if !self.is_engaged() {
                    debug!("Transport change before user gesture, sink untouched");
                } else if is_playing {
                    self.sink.play().await?;
                } else {
                    self.sink.pause().await?;
                }
            }
            PlayerEvent::VolumeChanged { volume } => {
                self.sink.set_volume(volume).await?;
            }
            PlayerEvent::ProgressChanged { progress } => {
                self.sink.seek_percent(progress).await?;
            }
            PlayerEvent::QueueChanged => {
                // Queue edits with an unchanged current track need no sink work
            }
        }
        Ok(())
    }

    async fn load_and_maybe_play(&self, source: PlaybackSource) -> Result<()> {
        self.sink.load(source).await?;
        if self.store.is_playing().await && self.is_engaged() {
            self.sink.play().await?;
        }
        Ok(())
    }

    /// Consumes store events until the store is dropped
    ///
    /// Meant to be spawned as a task. Lagged events are skipped with a
    /// warn; application errors are logged, never fatal.
    pub async fn run(self: Arc<Self>) {
        let mut rx = self.store.subscribe();
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(e) = self.handle_event(event).await {
                        warn!(error = %e, "Failed to apply player event to sink");
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "Sink binding lagged behind player events");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Polls the sink position and feeds it back as progress
    ///
    /// Call at render cadence. Does nothing while paused or when the
    /// duration is unknown.
    pub async fn tick(&self) {
        if !self.store.is_playing().await {
            return;
        }
        let Some(duration) = self.sink.duration_secs().await else {
            return;
        };
        if duration <= 0.0 {
            return;
        }
        let position = self.sink.position_secs().await;
        let progress = ((position / duration) * 100.0).clamp(0.0, 100.0) as f32;
        self.store.report_progress(progress).await;
    }
}
