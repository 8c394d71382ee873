//! Routes HTTP de l'application
//!
//! Trois surfaces : le proxy de téléchargement (Content-Disposition pour
//! forcer la sauvegarde côté navigateur), la consultation du cache
//! hors-ligne, et une route d'info.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use tunecatalog::{CatalogClient, CatalogError};
use tuneliked::{LikedClient, LikedError};
use tunemodel::Track;
use tuneoffline::OfflineCache;
use tunequeue::PlayerStore;

/// État partagé des handlers
#[derive(Clone)]
pub struct AppState {
    pub offline: Arc<OfflineCache>,
    pub store: Arc<PlayerStore>,
    pub catalog: Arc<CatalogClient>,
    pub liked: Option<Arc<LikedClient>>,
    pub http: reqwest::Client,
}

/// Paramètres du proxy de téléchargement
#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    /// URL source à relayer
    pub url: Option<String>,
    /// Nom de fichier proposé au navigateur
    pub name: Option<String>,
}

/// Vue d'une entrée hors-ligne (métadonnées seules, jamais le chemin local)
#[derive(Debug, Serialize)]
struct OfflineTrackView {
    track: tunemodel::Track,
    quality: String,
    byte_size: u64,
    stored_at: String,
}

/// Statistiques du cache hors-ligne
#[derive(Debug, Serialize)]
struct OfflineStats {
    count: usize,
    size_mb: f64,
}

/// Paramètres de recherche du catalogue
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Requête de recherche
    pub q: String,
    /// Type de recherche (songs, albums, artists, playlists)
    #[serde(rename = "type")]
    pub search_type: Option<String>,
    /// Nombre maximum de résultats
    pub limit: Option<u32>,
}

/// Paramètre de limite pour les playlists
#[derive(Debug, Deserialize)]
pub struct PlaylistParams {
    pub limit: Option<u32>,
}

/// Corps de la requête de like
#[derive(Debug, Deserialize)]
pub struct LikeBody {
    pub song: Track,
}

/// Paramètre d'unlike
#[derive(Debug, Deserialize)]
pub struct UnlikeParams {
    #[serde(rename = "songId")]
    pub song_id: String,
}

/// Crée le router Axum de l'application
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/info", get(info))
        // Proxy de téléchargement
        .route("/api/download", get(download_proxy))
        // Cache hors-ligne
        .route("/api/offline", get(list_offline))
        .route("/api/offline/stats", get(offline_stats))
        // État du lecteur
        .route("/api/player", get(player_state))
        // Catalogue
        .route("/api/catalog/search", get(catalog_search))
        .route("/api/catalog/songs/{id}", get(catalog_song))
        .route("/api/catalog/albums/{id}", get(catalog_album))
        .route("/api/catalog/artists/{id}", get(catalog_artist))
        .route("/api/catalog/playlists/{id}", get(catalog_playlist))
        // Favoris (relais vers l'API externe)
        .route(
            "/api/liked",
            get(liked_list).post(liked_like).delete(liked_unlike),
        )
        .route("/api/liked/ids", get(liked_ids))
        .route("/api/liked/count", get(liked_count))
        .with_state(state)
}

/// Remplace tout caractère hors `[a-z0-9-_. ]` (insensible à la casse)
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

// ============ Handlers ============

async fn info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "TuneFlow",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Relaye une source audio en flux, avec un nom de fichier propre
async fn download_proxy(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let Some(url) = params.url else {
        return (StatusCode::BAD_REQUEST, "Missing url query param").into_response();
    };

    let name = sanitize_filename(params.name.as_deref().unwrap_or("song"));

    let upstream = match state.http.get(&url).send().await {
        Ok(r) if r.status().is_success() => r,
        Ok(r) => {
            warn!(url = %url, status = %r.status(), "Download proxy upstream error");
            return (StatusCode::BAD_GATEWAY, "Failed to fetch source").into_response();
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Download proxy fetch failed");
            return (StatusCode::BAD_GATEWAY, "Failed to fetch source").into_response();
        }
    };

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("audio/mpeg")
        .to_string();
    let content_length = upstream.content_length();

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{name}.mp3\""),
        );
    if let Some(len) = content_length {
        builder = builder.header(header::CONTENT_LENGTH, len);
    }

    match builder.body(Body::from_stream(upstream.bytes_stream())) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Failed to build proxy response");
            (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected error").into_response()
        }
    }
}

/// Liste les pistes hors-ligne (métadonnées seules)
async fn list_offline(State(state): State<AppState>) -> Response {
    match state.offline.fetch_all().await {
        Ok(entries) => {
            let views: Vec<OfflineTrackView> = entries
                .into_iter()
                .map(|e| OfflineTrackView {
                    track: e.track,
                    quality: e.quality,
                    byte_size: e.byte_size,
                    stored_at: e.stored_at,
                })
                .collect();
            Json(views).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to list offline tracks");
            (StatusCode::INTERNAL_SERVER_ERROR, "Offline cache error").into_response()
        }
    }
}

/// Compteur et taille du cache hors-ligne
async fn offline_stats(State(state): State<AppState>) -> Response {
    let count = state.offline.count().await;
    let size_mb = state.offline.size_in_mb().await;
    match (count, size_mb) {
        (Ok(count), Ok(size_mb)) => Json(OfflineStats { count, size_mb }).into_response(),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Failed to compute offline stats");
            (StatusCode::INTERNAL_SERVER_ERROR, "Offline cache error").into_response()
        }
    }
}

/// État courant du lecteur (file, pointeur, transport, volume, progression)
async fn player_state(State(state): State<AppState>) -> Response {
    Json(state.store.state().await).into_response()
}

// ============ Catalogue ============

fn catalog_error_response(e: CatalogError) -> Response {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, e.to_string()).into_response()
}

/// Recherche dans le catalogue, tous types confondus
///
/// La politique permissive du client s'applique : une erreur réseau donne
/// une page vide, jamais un statut d'erreur.
async fn catalog_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let limit = params.limit.unwrap_or(10);
    let kind = params.search_type.as_deref().unwrap_or("songs");

    match kind {
        "songs" => Json(state.catalog.search_songs(&params.q, limit).await).into_response(),
        "albums" => Json(state.catalog.search_albums(&params.q, limit).await).into_response(),
        "artists" => Json(state.catalog.search_artists(&params.q, limit).await).into_response(),
        "playlists" => Json(state.catalog.search_playlists(&params.q, limit).await).into_response(),
        other => (
            StatusCode::BAD_REQUEST,
            format!("Unknown search type: {other}"),
        )
            .into_response(),
    }
}

async fn catalog_song(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.catalog.song(&id).await {
        Ok(track) => Json(track).into_response(),
        Err(e) => catalog_error_response(e),
    }
}

async fn catalog_album(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.catalog.album(&id).await {
        Ok(album) => Json(album).into_response(),
        Err(e) => catalog_error_response(e),
    }
}

async fn catalog_artist(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.catalog.artist(&id).await {
        Ok(artist) => Json(artist).into_response(),
        Err(e) => catalog_error_response(e),
    }
}

async fn catalog_playlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PlaylistParams>,
) -> Response {
    match state
        .catalog
        .playlist(&id, params.limit.unwrap_or(10))
        .await
    {
        Ok(playlist) => Json(playlist).into_response(),
        Err(e) => catalog_error_response(e),
    }
}

// ============ Favoris ============

fn liked_error_response(e: LikedError) -> Response {
    let status = if e.is_auth_error() {
        StatusCode::UNAUTHORIZED
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, e.to_string()).into_response()
}

fn liked_client(state: &AppState) -> Result<&Arc<LikedClient>, Response> {
    state.liked.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Liked-songs API not configured",
        )
            .into_response()
    })
}

async fn liked_list(State(state): State<AppState>) -> Response {
    let client = match liked_client(&state) {
        Ok(c) => c,
        Err(r) => return r,
    };
    match client.list().await {
        Ok(items) => Json(serde_json::json!({ "items": items })).into_response(),
        Err(e) => liked_error_response(e),
    }
}

async fn liked_ids(State(state): State<AppState>) -> Response {
    let client = match liked_client(&state) {
        Ok(c) => c,
        Err(r) => return r,
    };
    match client.ids().await {
        Ok(ids) => Json(serde_json::json!({ "ids": ids })).into_response(),
        Err(e) => liked_error_response(e),
    }
}

async fn liked_count(State(state): State<AppState>) -> Response {
    let client = match liked_client(&state) {
        Ok(c) => c,
        Err(r) => return r,
    };
    match client.count().await {
        Ok(count) => Json(serde_json::json!({ "count": count })).into_response(),
        Err(e) => liked_error_response(e),
    }
}

async fn liked_like(State(state): State<AppState>, Json(body): Json<LikeBody>) -> Response {
    let client = match liked_client(&state) {
        Ok(c) => c,
        Err(r) => return r,
    };
    match client.like(&body.song).await {
        Ok(stamped) => Json(serde_json::json!({ "ok": true, "song": stamped })).into_response(),
        Err(e) => liked_error_response(e),
    }
}

async fn liked_unlike(
    State(state): State<AppState>,
    Query(params): Query<UnlikeParams>,
) -> Response {
    let client = match liked_client(&state) {
        Ok(c) => c,
        Err(r) => return r,
    };
    match client.unlike(&params.song_id).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(e) => liked_error_response(e),
    }
}
