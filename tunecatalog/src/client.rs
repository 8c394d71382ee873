//! Client principal du catalogue
//!
//! Toutes les réponses analysées passent par le [`CatalogCache`] : une
//! recherche ou un fetch récent est servi depuis la mémoire sans toucher le
//! réseau.

use crate::cache::CatalogCache;
use crate::error::{CatalogError, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use tunemodel::{Album, ApiEnvelope, Artist, Playlist, SearchPage, Track};

/// URL de base par défaut de l'API du catalogue
pub const DEFAULT_BASE_URL: &str = "https://saavn.dev/api";

/// Délai maximum d'une requête au catalogue
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client du catalogue musical
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    cache: CatalogCache,
}

impl CatalogClient {
    /// Crée un client avec le TTL de cache par défaut (10 minutes)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_cache_ttl(base_url, Duration::from_secs(crate::cache::DEFAULT_TTL_SECS))
    }

    /// Crée un client avec un TTL de cache spécifique
    pub fn with_cache_ttl(base_url: impl Into<String>, ttl: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: CatalogCache::with_ttl(ttl),
        })
    }

    /// URL de base configurée
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Vide le cache des réponses
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    /// Effectue une requête GET et déballe l'enveloppe `{success, data}`
    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {} with {} params", url, params.len());

        let response = self.client.get(&url).query(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Catalog API error ({}): {}", status.as_u16(), message);
            return Err(CatalogError::from_status_code(status.as_u16(), message));
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        match envelope.data {
            Some(data) if envelope.success => Ok(data),
            _ => {
                let message = envelope
                    .message
                    .unwrap_or_else(|| "no data in response".to_string());
                Err(CatalogError::NotFound(message))
            }
        }
    }

    /// Effectue une recherche, sans politique de cache
    async fn fetch_search<T: DeserializeOwned>(
        &self,
        kind: &str,
        query: &str,
        limit: u32,
    ) -> Result<SearchPage<T>> {
        let limit_s = limit.to_string();
        self.get_data(
            &format!("search/{kind}"),
            &[("query", query), ("limit", limit_s.as_str())],
        )
        .await
    }

    // ============ Recherches ============

    /// Recherche des pistes
    pub async fn search_songs(&self, query: &str, limit: u32) -> SearchPage<Track> {
        let key = format!("songs:{query}:{limit}");
        if let Some(page) = self.cache.get_song_search(&key).await {
            return page;
        }
        match self.fetch_search("songs", query, limit).await {
            Ok(page) => {
                self.cache.put_song_search(key, page.clone()).await;
                page
            }
            Err(e) => {
                warn!("Song search failed for '{}': {}", query, e);
                SearchPage::default()
            }
        }
    }

    /// Recherche des albums
    pub async fn search_albums(&self, query: &str, limit: u32) -> SearchPage<Album> {
        let key = format!("albums:{query}:{limit}");
        if let Some(page) = self.cache.get_album_search(&key).await {
            return page;
        }
        match self.fetch_search("albums", query, limit).await {
            Ok(page) => {
                self.cache.put_album_search(key, page.clone()).await;
                page
            }
            Err(e) => {
                warn!("Album search failed for '{}': {}", query, e);
                SearchPage::default()
            }
        }
    }

    /// Recherche des artistes
    pub async fn search_artists(&self, query: &str, limit: u32) -> SearchPage<Artist> {
        let key = format!("artists:{query}:{limit}");
        if let Some(page) = self.cache.get_artist_search(&key).await {
            return page;
        }
        match self.fetch_search("artists", query, limit).await {
            Ok(page) => {
                self.cache.put_artist_search(key, page.clone()).await;
                page
            }
            Err(e) => {
                warn!("Artist search failed for '{}': {}", query, e);
                SearchPage::default()
            }
        }
    }

    /// Recherche des playlists
    pub async fn search_playlists(&self, query: &str, limit: u32) -> SearchPage<Playlist> {
        let key = format!("playlists:{query}:{limit}");
        if let Some(page) = self.cache.get_playlist_search(&key).await {
            return page;
        }
        match self.fetch_search("playlists", query, limit).await {
            Ok(page) => {
                self.cache.put_playlist_search(key, page.clone()).await;
                page
            }
            Err(e) => {
                warn!("Playlist search failed for '{}': {}", query, e);
                SearchPage::default()
            }
        }
    }

    // ============ Fetch par identifiant ============

    /// Récupère une piste par son identifiant
    ///
    /// L'endpoint renvoie une liste dans `data` ; la première entrée est la
    /// piste demandée.
    pub async fn song(&self, id: &str) -> Result<Track> {
        if let Some(track) = self.cache.get_song(id).await {
            return Ok(track);
        }

        let tracks: Vec<Track> = self.get_data(&format!("songs/{id}"), &[]).await?;
        let track = tracks
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(format!("song {id}")))?;

        self.cache.put_song(id.to_string(), track.clone()).await;
        Ok(track)
    }

    /// Récupère un album par son identifiant
    pub async fn album(&self, id: &str) -> Result<Album> {
        if let Some(album) = self.cache.get_album(id).await {
            return Ok(album);
        }

        let album: Album = self.get_data("albums", &[("id", id)]).await?;
        self.cache.put_album(id.to_string(), album.clone()).await;
        Ok(album)
    }

    /// Récupère un artiste par son identifiant
    pub async fn artist(&self, id: &str) -> Result<Artist> {
        if let Some(artist) = self.cache.get_artist(id).await {
            return Ok(artist);
        }

        let artist: Artist = self
            .get_data(&format!("artists/{id}"), &[("sortBy", "popularity")])
            .await?;
        self.cache.put_artist(id.to_string(), artist.clone()).await;
        Ok(artist)
    }

    /// Récupère une playlist par son identifiant
    pub async fn playlist(&self, id: &str, limit: u32) -> Result<Playlist> {
        if let Some(playlist) = self.cache.get_playlist(id).await {
            return Ok(playlist);
        }

        let limit_s = limit.to_string();
        let playlist: Playlist = self
            .get_data("playlists", &[("id", id), ("limit", limit_s.as_str())])
            .await?;
        self.cache
            .put_playlist(id.to_string(), playlist.clone())
            .await;
        Ok(playlist)
    }
}
