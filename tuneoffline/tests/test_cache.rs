use std::io::Cursor;
use tempfile::TempDir;
use tunemodel::{DownloadVariant, Track};
use tuneoffline::{Error, OfflineCache};

fn track(id: &str, qualities: &[&str]) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Track {id}"),
        artists: vec!["Artist".to_string()],
        album: None,
        duration: Some(180),
        image: Vec::new(),
        download_url: qualities
            .iter()
            .map(|q| DownloadVariant {
                quality: q.to_string(),
                url: format!("https://cdn.example/{id}/{q}.mp3"),
            })
            .collect(),
        liked_at: None,
    }
}

fn create_test_cache() -> (TempDir, OfflineCache) {
    let temp_dir = tempfile::tempdir().unwrap();
    let cache = OfflineCache::new(temp_dir.path()).unwrap();
    (temp_dir, cache)
}

async fn store_bytes(cache: &OfflineCache, track: &Track, data: &[u8]) {
    cache
        .store_from_reader(track, Cursor::new(data.to_vec()), "320kbps")
        .await
        .unwrap();
}

#[tokio::test]
async fn store_then_fetch_returns_entry() {
    let (_temp_dir, cache) = create_test_cache();
    let t = track("s1", &["320kbps"]);

    store_bytes(&cache, &t, b"audio bytes").await;

    let entry = cache.fetch("s1").await.unwrap().unwrap();
    assert_eq!(entry.track.id, "s1");
    assert_eq!(entry.quality, "320kbps");
    assert_eq!(entry.byte_size, 11);
    assert!(entry.path.exists());
    assert_eq!(std::fs::read(&entry.path).unwrap(), b"audio bytes");
}

#[tokio::test]
async fn fetch_unknown_id_is_none() {
    let (_temp_dir, cache) = create_test_cache();
    assert!(cache.fetch("nope").await.unwrap().is_none());
    assert!(!cache.has("nope").await.unwrap());
}

#[tokio::test]
async fn store_rejects_track_without_id() {
    let (_temp_dir, cache) = create_test_cache();
    let mut t = track("x", &["320kbps"]);
    t.id = "  ".to_string();

    let result = cache.store(&t).await;
    assert!(matches!(result, Err(Error::Model(_))));
}

#[tokio::test]
async fn store_rejects_track_without_variants() {
    let (_temp_dir, cache) = create_test_cache();
    let t = track("novariant", &[]);

    let result = cache.store(&t).await;
    assert!(matches!(result, Err(Error::Model(_))));
    assert!(!cache.has("novariant").await.unwrap());
}

#[tokio::test]
async fn store_downloads_preferred_variant() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/s2/320kbps.mp3")
        .with_status(200)
        .with_body(b"high quality")
        .create_async()
        .await;

    let (_temp_dir, cache) = create_test_cache();
    let mut t = track("s2", &[]);
    t.download_url = vec![
        DownloadVariant {
            quality: "96kbps".to_string(),
            url: format!("{}/s2/96kbps.mp3", server.url()),
        },
        DownloadVariant {
            quality: "320kbps".to_string(),
            url: format!("{}/s2/320kbps.mp3", server.url()),
        },
        DownloadVariant {
            quality: "160kbps".to_string(),
            url: format!("{}/s2/160kbps.mp3", server.url()),
        },
    ];

    cache.store(&t).await.unwrap();

    mock.assert_async().await;
    let entry = cache.fetch("s2").await.unwrap().unwrap();
    assert_eq!(entry.quality, "320kbps");
    assert_eq!(std::fs::read(&entry.path).unwrap(), b"high quality");
}

#[tokio::test]
async fn failed_download_leaves_no_trace() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/bad/320kbps.mp3")
        .with_status(500)
        .create_async()
        .await;

    let (_temp_dir, cache) = create_test_cache();
    let mut t = track("bad", &[]);
    t.download_url = vec![DownloadVariant {
        quality: "320kbps".to_string(),
        url: format!("{}/bad/320kbps.mp3", server.url()),
    }];

    let result = cache.store(&t).await;
    mock.assert_async().await;

    assert!(matches!(result, Err(Error::Download { .. })));
    assert!(!cache.has("bad").await.unwrap());
    assert!(!cache.file_path("bad").exists());
    assert_eq!(cache.count().await.unwrap(), 0);
}

#[tokio::test]
async fn restore_overwrites_previous_entry() {
    let (_temp_dir, cache) = create_test_cache();
    let t = track("s3", &["320kbps"]);

    store_bytes(&cache, &t, b"first").await;
    store_bytes(&cache, &t, b"second version").await;

    assert_eq!(cache.count().await.unwrap(), 1);
    let entry = cache.fetch("s3").await.unwrap().unwrap();
    assert_eq!(entry.byte_size, 14);
    assert_eq!(std::fs::read(&entry.path).unwrap(), b"second version");
}

#[tokio::test]
async fn fetch_all_returns_most_recent_first() {
    let (_temp_dir, cache) = create_test_cache();

    store_bytes(&cache, &track("a", &["320kbps"]), b"aaa").await;
    // stored_at a une résolution sub-seconde, mais on espace quand même
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    store_bytes(&cache, &track("b", &["320kbps"]), b"bbbb").await;

    let all = cache.fetch_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].track.id, "b");
    assert_eq!(all[1].track.id, "a");
}

#[tokio::test]
async fn fetch_all_prefers_liked_at_over_stored_at() {
    let (_temp_dir, cache) = create_test_cache();

    // "old_like" est stocké en dernier mais liké avant "new_like"
    let new_like = track("new_like", &["320kbps"])
        .with_liked_at("2025-06-02T00:00:00Z".parse().unwrap());
    let old_like = track("old_like", &["320kbps"])
        .with_liked_at("2025-06-01T00:00:00Z".parse().unwrap());

    store_bytes(&cache, &new_like, b"new").await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    store_bytes(&cache, &old_like, b"old").await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    // Jamais likée : retombe sur sa date de stockage, la plus récente
    store_bytes(&cache, &track("unliked", &["320kbps"]), b"u").await;

    let all = cache.fetch_all().await.unwrap();
    let ids: Vec<&str> = all.iter().map(|e| e.track.id.as_str()).collect();
    assert_eq!(ids, vec!["unliked", "new_like", "old_like"]);
}

#[tokio::test]
async fn remove_is_idempotent() {
    let (_temp_dir, cache) = create_test_cache();
    let t = track("s4", &["320kbps"]);
    store_bytes(&cache, &t, b"data").await;

    assert!(cache.remove("s4").await.unwrap());
    assert!(!cache.has("s4").await.unwrap());
    assert!(!cache.file_path("s4").exists());

    // Deuxième suppression : succès silencieux
    assert!(!cache.remove("s4").await.unwrap());
}

#[tokio::test]
async fn remove_forgets_in_flight_download() {
    let (_temp_dir, cache) = create_test_cache();
    let cache = std::sync::Arc::new(cache);
    let t = track("racy", &["320kbps"]);

    // Premier store suspendu : le duplex ne livre aucun octet
    let (_writer, reader) = tokio::io::duplex(64);
    let pending = {
        let cache = std::sync::Arc::clone(&cache);
        let t = t.clone();
        tokio::spawn(async move { cache.store_from_reader(&t, reader, "320kbps").await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    assert!(!cache.remove("racy").await.unwrap());

    // Le téléchargement oublié n'est plus rejoint : ce store repart de zéro
    tokio::time::timeout(
        std::time::Duration::from_secs(1),
        store_bytes(&cache, &t, b"fresh bytes"),
    )
    .await
    .expect("second store should not join the forgotten download");

    assert!(cache.has("racy").await.unwrap());
    pending.abort();
}

#[tokio::test]
async fn clear_empties_files_and_metadata() {
    let (temp_dir, cache) = create_test_cache();
    store_bytes(&cache, &track("a", &["320kbps"]), b"aaa").await;
    store_bytes(&cache, &track("b", &["320kbps"]), b"bbb").await;

    cache.clear().await.unwrap();

    assert_eq!(cache.count().await.unwrap(), 0);
    assert_eq!(cache.size_in_mb().await.unwrap(), 0.0);
    assert!(cache.fetch_all().await.unwrap().is_empty());
    assert!(!temp_dir.path().join("a.mp3").exists());
    assert!(!temp_dir.path().join("b.mp3").exists());
}

#[tokio::test]
async fn size_in_mb_is_rounded_to_two_decimals() {
    let (_temp_dir, cache) = create_test_cache();
    assert_eq!(cache.size_in_mb().await.unwrap(), 0.0);

    // 1.5 MiB exactement
    let data = vec![0u8; 1_572_864];
    store_bytes(&cache, &track("big", &["320kbps"]), &data).await;

    assert_eq!(cache.size_in_mb().await.unwrap(), 1.5);
    assert_eq!(cache.count().await.unwrap(), 1);
}

#[tokio::test]
async fn orphaned_metadata_is_dropped_on_fetch() {
    let (_temp_dir, cache) = create_test_cache();
    let t = track("gone", &["320kbps"]);
    store_bytes(&cache, &t, b"data").await;

    // Simuler la disparition du fichier audio
    std::fs::remove_file(cache.file_path("gone")).unwrap();

    assert!(cache.fetch("gone").await.unwrap().is_none());
    assert!(!cache.has("gone").await.unwrap());
    // L'entrée orpheline a été nettoyée
    assert_eq!(cache.count().await.unwrap(), 0);
}
