//! Client HTTP de l'API des favoris
//!
//! L'ensemble des identifiants likés est gardé en mémoire (read-through) :
//! rempli au premier besoin, mis à jour en place à chaque mutation réussie,
//! et rafraîchi en bloc à chaque appel à [`LikedClient::ids`].

use crate::error::{LikedError, Result};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use tunemodel::{ModelError, Track};

/// Délai maximum d'une requête à l'API des favoris
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    #[serde(default)]
    items: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct IdsResponse {
    #[serde(default)]
    ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    #[serde(default)]
    count: u64,
}

/// Client de l'API des favoris
pub struct LikedClient {
    client: reqwest::Client,
    base_url: String,
    /// Ensemble des ids likés, `None` tant qu'il n'a pas été chargé
    liked_ids: RwLock<Option<HashSet<String>>>,
}

impl LikedClient {
    /// Crée un client pour l'URL de base donnée
    ///
    /// L'URL pointe sur la ressource liked-songs elle-même
    /// (ex: `https://host/api/liked-songs`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            liked_ids: RwLock::new(None),
        })
    }

    /// URL de base configurée
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LikedError::from_status_code(status.as_u16(), message));
        }
        Ok(response)
    }

    /// Liste complète des pistes likées, les plus récentes en premier
    pub async fn list(&self) -> Result<Vec<Track>> {
        let response = self.client.get(&self.base_url).send().await?;
        let response = Self::check_status(response).await?;
        let body: ItemsResponse = response.json().await?;

        // Profiter de la réponse pour resynchroniser le cache d'ids
        let ids: HashSet<String> = body.items.iter().map(|t| t.id.clone()).collect();
        *self.liked_ids.write().await = Some(ids);

        Ok(body.items)
    }

    /// Identifiants des pistes likées
    ///
    /// Rafraîchit le cache en bloc.
    pub async fn ids(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("view", "ids")])
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body: IdsResponse = response.json().await?;

        *self.liked_ids.write().await = Some(body.ids.iter().cloned().collect());

        Ok(body.ids)
    }

    /// Nombre de pistes likées
    pub async fn count(&self) -> Result<u64> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("view", "count")])
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body: CountResponse = response.json().await?;
        Ok(body.count)
    }

    /// Teste si une piste est likée, via le cache d'ids
    ///
    /// Charge l'ensemble au premier appel ; les suivants ne font aucun
    /// aller-retour réseau tant qu'une mutation ne l'invalide pas.
    pub async fn is_liked(&self, song_id: &str) -> Result<bool> {
        {
            let cache = self.liked_ids.read().await;
            if let Some(ref ids) = *cache {
                return Ok(ids.contains(song_id));
            }
        }

        debug!("Liked-ids cache empty, fetching");
        self.ids().await?;

        let cache = self.liked_ids.read().await;
        Ok(cache
            .as_ref()
            .map(|ids| ids.contains(song_id))
            .unwrap_or(false))
    }

    /// Ajoute une piste aux favoris
    ///
    /// Le timestamp `liked_at` est attaché côté client avant l'envoi.
    /// Retourne la piste horodatée telle qu'envoyée.
    pub async fn like(&self, track: &Track) -> Result<Track> {
        if track.id.trim().is_empty() {
            return Err(ModelError::MissingTrackId.into());
        }

        let stamped = track.clone().with_liked_at(Utc::now());
        let response = self
            .client
            .post(&self.base_url)
            .json(&serde_json::json!({ "song": stamped }))
            .send()
            .await?;
        Self::check_status(response).await?;

        if let Some(ref mut ids) = *self.liked_ids.write().await {
            ids.insert(stamped.id.clone());
        }

        Ok(stamped)
    }

    /// Retire une piste des favoris
    pub async fn unlike(&self, song_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(&self.base_url)
            .query(&[("songId", song_id)])
            .send()
            .await?;
        Self::check_status(response).await?;

        if let Some(ref mut ids) = *self.liked_ids.write().await {
            ids.remove(song_id);
        }

        Ok(())
    }
}
