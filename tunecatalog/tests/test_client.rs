use tunecatalog::{CatalogClient, CatalogError};

fn client(server: &mockito::Server) -> CatalogClient {
    CatalogClient::new(server.url()).unwrap()
}

#[tokio::test]
async fn search_songs_parses_envelope() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search/songs")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("query".into(), "love".into()),
            mockito::Matcher::UrlEncoded("limit".into(), "10".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "success": true,
                "data": {
                    "total": 2,
                    "start": 0,
                    "results": [
                        {"id": "s1", "name": "Love Song"},
                        {"id": 42, "name": "Another"}
                    ]
                }
            }"#,
        )
        .create_async()
        .await;

    let page = client(&server).search_songs("love", 10).await;

    mock.assert_async().await;
    assert_eq!(page.total, 2);
    assert_eq!(page.results[0].id, "s1");
    assert_eq!(page.results[1].id, "42");
}

#[tokio::test]
async fn search_failure_yields_empty_page() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search/songs")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let page = client(&server).search_songs("anything", 10).await;

    mock.assert_async().await;
    assert!(page.is_empty());
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn search_is_served_from_cache_on_second_call() {
    let mut server = mockito::Server::new_async().await;
    // Une seule requête attendue pour deux appels identiques
    let mock = server
        .mock("GET", "/search/albums")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"success": true, "data": {"total": 1, "start": 0,
                "results": [{"id": "al1", "name": "Album"}]}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let client = client(&server);
    let first = client.search_albums("a", 5).await;
    let second = client.search_albums("a", 5).await;

    mock.assert_async().await;
    assert_eq!(first.results[0].id, second.results[0].id);
}

#[tokio::test]
async fn song_takes_first_entry_of_data_list() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/songs/s9")
        .with_status(200)
        .with_body(
            r#"{"success": true, "data": [
                {"id": "s9", "name": "Nine",
                 "downloadUrl": [
                    {"quality": "96kbps", "url": "https://cdn.example/lo.mp3"},
                    {"quality": "320kbps", "url": "https://cdn.example/hi.mp3"}
                 ]}
            ]}"#,
        )
        .create_async()
        .await;

    let track = client(&server).song("s9").await.unwrap();

    mock.assert_async().await;
    assert_eq!(track.id, "s9");
    assert_eq!(
        track.best_download_url(),
        Some("https://cdn.example/hi.mp3")
    );
}

#[tokio::test]
async fn song_without_data_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/songs/gone")
        .with_status(200)
        .with_body(r#"{"success": false, "message": "song not found"}"#)
        .create_async()
        .await;

    let result = client(&server).song("gone").await;
    assert!(matches!(result, Err(CatalogError::NotFound(_))));
}

#[tokio::test]
async fn http_404_maps_to_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/artists/nobody")
        .match_query(mockito::Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let result = client(&server).artist("nobody").await;
    assert!(result.unwrap_err().is_not_found());
}

#[tokio::test]
async fn album_is_fetched_by_query_parameter() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/albums")
        .match_query(mockito::Matcher::UrlEncoded("id".into(), "al7".into()))
        .with_status(200)
        .with_body(
            r#"{"success": true, "data": {"id": "al7", "name": "Seven",
                "songs": [{"id": "s1", "name": "One"}]}}"#,
        )
        .create_async()
        .await;

    let album = client(&server).album("al7").await.unwrap();

    mock.assert_async().await;
    assert_eq!(album.name, "Seven");
    assert_eq!(album.songs.len(), 1);
}

#[tokio::test]
async fn playlist_passes_limit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/playlists")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("id".into(), "pl1".into()),
            mockito::Matcher::UrlEncoded("limit".into(), "50".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"success": true, "data": {"id": "pl1", "name": "Mix",
                "songCount": 2, "songs": [
                    {"id": "s1", "name": "One"},
                    {"id": "s2", "name": "Two"}
                ]}}"#,
        )
        .create_async()
        .await;

    let playlist = client(&server).playlist("pl1", 50).await.unwrap();

    mock.assert_async().await;
    assert_eq!(playlist.song_count, Some(2));
    assert_eq!(playlist.songs.len(), 2);
}
