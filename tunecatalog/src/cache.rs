//! Cache en mémoire des réponses du catalogue
//!
//! Un cache TTL par type de réponse, pour servir les écrans sans requête
//! réseau et amortir les coupures. Le TTL par défaut est de 10 minutes.

use moka::future::Cache as MokaCache;
use std::sync::Arc;
use std::time::Duration;
use tunemodel::{Album, Artist, Playlist, SearchPage, Track};

/// TTL par défaut des réponses du catalogue (10 minutes)
pub const DEFAULT_TTL_SECS: u64 = 600;

/// Cache principal des données du catalogue
///
/// Les clés de recherche composent le type, la requête et la limite
/// (ex: `"songs:love:10"`) ; les fetchs par id utilisent l'identifiant nu.
#[derive(Clone)]
pub struct CatalogCache {
    /// Pages de recherche de pistes
    song_searches: Arc<MokaCache<String, SearchPage<Track>>>,
    /// Pages de recherche d'albums
    album_searches: Arc<MokaCache<String, SearchPage<Album>>>,
    /// Pages de recherche d'artistes
    artist_searches: Arc<MokaCache<String, SearchPage<Artist>>>,
    /// Pages de recherche de playlists
    playlist_searches: Arc<MokaCache<String, SearchPage<Playlist>>>,
    /// Pistes par identifiant
    songs: Arc<MokaCache<String, Track>>,
    /// Albums par identifiant
    albums: Arc<MokaCache<String, Album>>,
    /// Artistes par identifiant
    artists: Arc<MokaCache<String, Artist>>,
    /// Playlists par identifiant
    playlists: Arc<MokaCache<String, Playlist>>,
}

impl CatalogCache {
    /// Crée un cache avec le TTL par défaut
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_TTL_SECS))
    }

    /// Crée un cache avec un TTL spécifique
    pub fn with_ttl(ttl: Duration) -> Self {
        fn build<T>(capacity: u64, ttl: Duration) -> Arc<MokaCache<String, T>>
        where
            T: Clone + Send + Sync + 'static,
        {
            Arc::new(
                MokaCache::builder()
                    .max_capacity(capacity)
                    .time_to_live(ttl)
                    .build(),
            )
        }

        Self {
            song_searches: build(500, ttl),
            album_searches: build(250, ttl),
            artist_searches: build(250, ttl),
            playlist_searches: build(250, ttl),
            songs: build(2000, ttl),
            albums: build(500, ttl),
            artists: build(500, ttl),
            playlists: build(250, ttl),
        }
    }

    // ============ Recherches ============

    pub async fn get_song_search(&self, key: &str) -> Option<SearchPage<Track>> {
        self.song_searches.get(key).await
    }

    pub async fn put_song_search(&self, key: String, page: SearchPage<Track>) {
        self.song_searches.insert(key, page).await;
    }

    pub async fn get_album_search(&self, key: &str) -> Option<SearchPage<Album>> {
        self.album_searches.get(key).await
    }

    pub async fn put_album_search(&self, key: String, page: SearchPage<Album>) {
        self.album_searches.insert(key, page).await;
    }

    pub async fn get_artist_search(&self, key: &str) -> Option<SearchPage<Artist>> {
        self.artist_searches.get(key).await
    }

    pub async fn put_artist_search(&self, key: String, page: SearchPage<Artist>) {
        self.artist_searches.insert(key, page).await;
    }

    pub async fn get_playlist_search(&self, key: &str) -> Option<SearchPage<Playlist>> {
        self.playlist_searches.get(key).await
    }

    pub async fn put_playlist_search(&self, key: String, page: SearchPage<Playlist>) {
        self.playlist_searches.insert(key, page).await;
    }

    // ============ Fetch par identifiant ============

    pub async fn get_song(&self, id: &str) -> Option<Track> {
        self.songs.get(id).await
    }

    pub async fn put_song(&self, id: String, track: Track) {
        self.songs.insert(id, track).await;
    }

    pub async fn get_album(&self, id: &str) -> Option<Album> {
        self.albums.get(id).await
    }

    pub async fn put_album(&self, id: String, album: Album) {
        self.albums.insert(id, album).await;
    }

    pub async fn get_artist(&self, id: &str) -> Option<Artist> {
        self.artists.get(id).await
    }

    pub async fn put_artist(&self, id: String, artist: Artist) {
        self.artists.insert(id, artist).await;
    }

    pub async fn get_playlist(&self, id: &str) -> Option<Playlist> {
        self.playlists.get(id).await
    }

    pub async fn put_playlist(&self, id: String, playlist: Playlist) {
        self.playlists.insert(id, playlist).await;
    }

    /// Vide l'ensemble des caches
    pub fn invalidate_all(&self) {
        self.song_searches.invalidate_all();
        self.album_searches.invalidate_all();
        self.artist_searches.invalidate_all();
        self.playlist_searches.invalidate_all();
        self.songs.invalidate_all();
        self.albums.invalidate_all();
        self.artists.invalidate_all();
        self.playlists.invalidate_all();
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}
