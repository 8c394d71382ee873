use tuneliked::LikedClient;
use tunemodel::{DownloadVariant, Track};

fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Track {id}"),
        artists: vec!["Artist".to_string()],
        album: None,
        duration: Some(180),
        image: Vec::new(),
        download_url: vec![DownloadVariant {
            quality: "320kbps".to_string(),
            url: format!("https://cdn.example/{id}.mp3"),
        }],
        liked_at: None,
    }
}

#[tokio::test]
async fn list_parses_items() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/liked-songs")
        .with_status(200)
        .with_body(
            r#"{"items": [
                {"id": "s2", "name": "Two", "likedAt": "2025-06-02T00:00:00Z"},
                {"id": "s1", "name": "One", "likedAt": "2025-06-01T00:00:00Z"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = LikedClient::new(format!("{}/liked-songs", server.url())).unwrap();
    let items = client.list().await.unwrap();

    mock.assert_async().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "s2");
    assert!(items[0].liked_at.is_some());
}

#[tokio::test]
async fn ids_view_fills_cache_for_is_liked() {
    let mut server = mockito::Server::new_async().await;
    // Un seul fetch d'ids attendu, malgré trois questions
    let mock = server
        .mock("GET", "/liked-songs")
        .match_query(mockito::Matcher::UrlEncoded("view".into(), "ids".into()))
        .with_status(200)
        .with_body(r#"{"ids": ["s1", "s3"]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = LikedClient::new(format!("{}/liked-songs", server.url())).unwrap();

    assert!(client.is_liked("s1").await.unwrap());
    assert!(!client.is_liked("s2").await.unwrap());
    assert!(client.is_liked("s3").await.unwrap());

    mock.assert_async().await;
}

#[tokio::test]
async fn count_view_parses_count() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/liked-songs")
        .match_query(mockito::Matcher::UrlEncoded("view".into(), "count".into()))
        .with_status(200)
        .with_body(r#"{"count": 17}"#)
        .create_async()
        .await;

    let client = LikedClient::new(format!("{}/liked-songs", server.url())).unwrap();
    assert_eq!(client.count().await.unwrap(), 17);
}

#[tokio::test]
async fn like_stamps_liked_at_and_updates_cache() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/liked-songs")
        .match_query(mockito::Matcher::UrlEncoded("view".into(), "ids".into()))
        .with_status(200)
        .with_body(r#"{"ids": []}"#)
        .create_async()
        .await;
    let post = server
        .mock("POST", "/liked-songs")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"song": {"id": "s5"}}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;

    let client = LikedClient::new(format!("{}/liked-songs", server.url())).unwrap();
    assert!(!client.is_liked("s5").await.unwrap());

    let stamped = client.like(&track("s5")).await.unwrap();

    post.assert_async().await;
    assert!(stamped.liked_at.is_some());
    // Le cache est mis à jour en place, sans nouveau fetch d'ids
    assert!(client.is_liked("s5").await.unwrap());
}

#[tokio::test]
async fn unlike_removes_from_cache() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/liked-songs")
        .match_query(mockito::Matcher::UrlEncoded("view".into(), "ids".into()))
        .with_status(200)
        .with_body(r#"{"ids": ["s6"]}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/liked-songs")
        .match_query(mockito::Matcher::UrlEncoded("songId".into(), "s6".into()))
        .with_status(200)
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;

    let client = LikedClient::new(format!("{}/liked-songs", server.url())).unwrap();
    assert!(client.is_liked("s6").await.unwrap());

    client.unlike("s6").await.unwrap();

    delete.assert_async().await;
    assert!(!client.is_liked("s6").await.unwrap());
}

#[tokio::test]
async fn http_401_maps_to_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/liked-songs")
        .with_status(401)
        .with_body(r#"{"error": "Unauthorized"}"#)
        .create_async()
        .await;

    let client = LikedClient::new(format!("{}/liked-songs", server.url())).unwrap();
    let err = client.list().await.unwrap_err();
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn like_rejects_track_without_id() {
    let client = LikedClient::new("http://localhost:1/liked-songs").unwrap();
    let mut t = track("x");
    t.id = " ".to_string();

    assert!(client.like(&t).await.is_err());
}
