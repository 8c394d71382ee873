//! Sink binding behaviour against a recording fake sink

use std::io::Cursor;
use std::sync::Arc;
use tokio::sync::Mutex;
use tunemodel::{DownloadVariant, Track};
use tuneoffline::OfflineCache;
use tuneplayer::{AudioSink, PlaybackSource, Result, SinkBinding};
use tunequeue::PlayerStore;

/// Fake sink recording every call, with a scriptable position
struct FakeSink {
    calls: Mutex<Vec<String>>,
    position: Mutex<f64>,
    duration: Mutex<Option<f64>>,
}

impl FakeSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            position: Mutex::new(0.0),
            duration: Mutex::new(None),
        })
    }

    async fn set_position(&self, secs: f64) {
        *self.position.lock().await = secs;
    }

    async fn set_duration(&self, secs: f64) {
        *self.duration.lock().await = Some(secs);
    }

    async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl AudioSink for FakeSink {
    async fn load(&self, source: PlaybackSource) -> Result<()> {
        let label = match source {
            PlaybackSource::Offline(path) => format!("load offline {}", path.display()),
            PlaybackSource::Stream(url) => format!("load stream {url}"),
        };
        self.calls.lock().await.push(label);
        *self.position.lock().await = 0.0;
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        self.calls.lock().await.push("play".to_string());
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.calls.lock().await.push("pause".to_string());
        Ok(())
    }

    async fn set_volume(&self, volume: u8) -> Result<()> {
        self.calls.lock().await.push(format!("volume {volume}"));
        Ok(())
    }

    async fn seek_percent(&self, percent: f32) -> Result<()> {
        self.calls.lock().await.push(format!("seek {percent}"));
        Ok(())
    }

    async fn position_secs(&self) -> f64 {
        *self.position.lock().await
    }

    async fn duration_secs(&self) -> Option<f64> {
        *self.duration.lock().await
    }
}

fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Track {id}"),
        artists: vec!["Artist".to_string()],
        album: None,
        duration: Some(200),
        image: Vec::new(),
        download_url: vec![DownloadVariant {
            quality: "320kbps".to_string(),
            url: format!("https://cdn.example/{id}.mp3"),
        }],
        liked_at: None,
    }
}

struct Fixture {
    store: Arc<PlayerStore>,
    sink: Arc<FakeSink>,
    binding: SinkBinding,
    _dir: tempfile::TempDir,
    cache: Arc<OfflineCache>,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(OfflineCache::new(dir.path()).unwrap());
    let store = Arc::new(PlayerStore::new());
    let sink = FakeSink::new();
    let binding = SinkBinding::new(
        Arc::clone(&store),
        Arc::clone(&cache),
        sink.clone() as Arc<dyn AudioSink>,
    );
    Fixture {
        store,
        sink,
        binding,
        _dir: dir,
        cache,
    }
}

/// Drains pending store events through the binding
async fn apply_pending(
    binding: &SinkBinding,
    rx: &mut tokio::sync::broadcast::Receiver<tunequeue::PlayerEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        let _ = binding.handle_event(event).await;
    }
}

#[tokio::test]
async fn play_intent_loads_then_plays() {
    let f = fixture();
    let mut rx = f.store.subscribe();

    f.binding.play_intent(vec![track("a")], 0).await;
    apply_pending(&f.binding, &mut rx).await;

    let calls = f.sink.calls().await;
    assert_eq!(
        calls,
        vec![
            "load stream https://cdn.example/a.mp3".to_string(),
            "play".to_string(),
            "play".to_string(), // TrackChanged then TransportChanged
        ]
    );
}

#[tokio::test]
async fn transport_is_gated_until_user_gesture() {
    let f = fixture();
    let mut rx = f.store.subscribe();

    // Programmatic transport change, no user intent yet
    f.store.play_queue(vec![track("a")], 0).await;
    apply_pending(&f.binding, &mut rx).await;

    let calls = f.sink.calls().await;
    // Source is loaded, but no play: the gate is still closed
    assert_eq!(calls, vec!["load stream https://cdn.example/a.mp3"]);
    assert!(!f.binding.is_engaged());
}

#[tokio::test]
async fn offline_copy_is_loaded_when_present() {
    let f = fixture();
    let t = track("off1");
    f.cache
        .store_from_reader(&t, Cursor::new(b"bytes".to_vec()), "320kbps")
        .await
        .unwrap();

    let mut rx = f.store.subscribe();
    f.binding.play_intent(vec![t], 0).await;
    apply_pending(&f.binding, &mut rx).await;

    let calls = f.sink.calls().await;
    assert!(calls[0].starts_with("load offline "));
    assert!(calls[0].ends_with("off1.mp3"));
}

#[tokio::test]
async fn previous_intent_restarts_after_three_seconds() {
    let f = fixture();
    let mut rx = f.store.subscribe();
    f.binding.play_intent(vec![track("a"), track("b")], 1).await;
    apply_pending(&f.binding, &mut rx).await;

    f.sink.set_position(4.2).await;
    f.binding.previous_intent().await.unwrap();
    apply_pending(&f.binding, &mut rx).await;

    // Pointer did not move, sink rewound
    let state = f.store.state().await;
    assert_eq!(state.index(), Some(1));
    assert_eq!(state.progress(), 0.0);
    assert!(f.sink.calls().await.contains(&"seek 0".to_string()));
}

#[tokio::test]
async fn previous_intent_steps_back_early_in_track() {
    let f = fixture();
    let mut rx = f.store.subscribe();
    f.binding.play_intent(vec![track("a"), track("b")], 1).await;
    apply_pending(&f.binding, &mut rx).await;

    f.sink.set_position(1.0).await;
    f.binding.previous_intent().await.unwrap();
    apply_pending(&f.binding, &mut rx).await;

    let state = f.store.state().await;
    assert_eq!(state.index(), Some(0));
    // New track was loaded into the sink
    assert!(f
        .sink
        .calls()
        .await
        .contains(&"load stream https://cdn.example/a.mp3".to_string()));
}

#[tokio::test]
async fn seek_moves_sink_and_reconciles_store() {
    let f = fixture();
    let mut rx = f.store.subscribe();
    f.binding.play_intent(vec![track("a")], 0).await;
    apply_pending(&f.binding, &mut rx).await;

    f.binding.seek(250.0).await.unwrap();

    assert_eq!(f.store.state().await.progress(), 100.0);
    assert!(f.sink.calls().await.contains(&"seek 100".to_string()));
}

#[tokio::test]
async fn volume_event_reaches_sink() {
    let f = fixture();
    let mut rx = f.store.subscribe();

    f.store.set_volume(80).await;
    apply_pending(&f.binding, &mut rx).await;

    assert_eq!(f.sink.calls().await, vec!["volume 80"]);
}

#[tokio::test]
async fn tick_feeds_progress_back_to_store() {
    let f = fixture();
    let mut rx = f.store.subscribe();
    f.binding.play_intent(vec![track("a")], 0).await;
    apply_pending(&f.binding, &mut rx).await;

    f.sink.set_duration(200.0).await;
    f.sink.set_position(50.0).await;
    f.binding.tick().await;

    assert_eq!(f.store.state().await.progress(), 25.0);
}

#[tokio::test]
async fn tick_is_inert_while_paused() {
    let f = fixture();
    f.sink.set_duration(200.0).await;
    f.sink.set_position(50.0).await;

    f.binding.tick().await;

    assert_eq!(f.store.state().await.progress(), 0.0);
}
