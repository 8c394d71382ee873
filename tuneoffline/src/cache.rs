//! Cache hors-ligne : fichiers audio + métadonnées
//!
//! L'identifiant de piste est la clé unique : un fichier `{dir}/{id}.mp3`
//! et une ligne `offline_tracks` par piste. L'entrée n'est enregistrée en
//! base qu'une fois le téléchargement complet, donc [`OfflineCache::fetch`]
//! ne renvoie jamais un fichier partiel.

use crate::db::OfflineDb;
use crate::download::{self, Download};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncRead;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use tunemodel::{Track, PREFERRED_QUALITY};

/// Extension des fichiers audio stockés
const AUDIO_EXTENSION: &str = "mp3";

/// Nom du fichier de base de métadonnées dans le répertoire du cache
const DB_FILENAME: &str = "offline.db";

/// Piste disponible hors-ligne
#[derive(Debug, Clone)]
pub struct OfflineEntry {
    /// Métadonnées complètes de la piste
    pub track: Track,
    /// Chemin du fichier audio local
    pub path: PathBuf,
    /// Qualité de la variante stockée
    pub quality: String,
    /// Taille du fichier en octets
    pub byte_size: u64,
    /// Date/heure de stockage (RFC3339)
    pub stored_at: String,
}

/// Cache audio hors-ligne
///
/// Conçu pour être partagé derrière un `Arc` : la base SQLite a son propre
/// Mutex, la map des téléchargements en cours son RwLock.
pub struct OfflineCache {
    dir: PathBuf,
    db: Arc<OfflineDb>,
    /// Téléchargements en cours (id de piste -> Download)
    downloads: Arc<RwLock<HashMap<String, Arc<Download>>>>,
}

impl OfflineCache {
    /// Ouvre (ou crée) le cache dans un répertoire
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        let db = OfflineDb::init(&dir.join(DB_FILENAME))?;

        Ok(Self {
            dir,
            db: Arc::new(db),
            downloads: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Répertoire de stockage du cache
    pub fn cache_dir(&self) -> &Path {
        &self.dir
    }

    /// Chemin du fichier audio d'une piste
    pub fn file_path(&self, song_id: &str) -> PathBuf {
        self.dir.join(format!("{song_id}.{AUDIO_EXTENSION}"))
    }

    /// Télécharge et stocke une piste pour l'écoute hors-ligne
    ///
    /// Préfère la variante 320kbps, sinon la dernière de la liste. Si la
    /// piste est déjà stockée, ses métadonnées et son fichier sont
    /// remplacés. Les demandes concurrentes sur le même identifiant
    /// partagent le même téléchargement.
    pub async fn store(&self, track: &Track) -> Result<()> {
        track.validate_for_offline()?;

        let variant = track
            .download_url
            .iter()
            .find(|v| v.quality == PREFERRED_QUALITY)
            .or_else(|| track.download_url.last())
            .ok_or_else(|| Error::NoSource(track.id.clone()))?;

        let quality = variant.quality.clone();
        let url = variant.url.clone();
        let path = self.file_path(&track.id);

        // Rejoindre un téléchargement déjà en cours, ou en lancer un
        let (dl, owner) = {
            let mut downloads = self.downloads.write().await;
            match downloads.get(&track.id) {
                Some(existing) => (Arc::clone(existing), false),
                None => {
                    debug!(id = %track.id, quality = %quality, "Starting offline download");
                    let dl = download::download(&path, &url);
                    downloads.insert(track.id.clone(), Arc::clone(&dl));
                    (dl, true)
                }
            }
        };

        self.finish_store(track, dl, owner, &quality).await
    }

    /// Stocke une piste depuis un flux déjà ouvert
    ///
    /// Même contrat que [`store`](Self::store) mais la source audio est un
    /// reader arbitraire : import local, tests.
    pub async fn store_from_reader<R>(&self, track: &Track, reader: R, quality: &str) -> Result<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        if track.id.trim().is_empty() {
            return Err(tunemodel::ModelError::MissingTrackId.into());
        }

        let path = self.file_path(&track.id);

        let (dl, owner) = {
            let mut downloads = self.downloads.write().await;
            match downloads.get(&track.id) {
                Some(existing) => (Arc::clone(existing), false),
                None => {
                    let dl = download::ingest(&path, reader);
                    downloads.insert(track.id.clone(), Arc::clone(&dl));
                    (dl, true)
                }
            }
        };

        self.finish_store(track, dl, owner, quality).await
    }

    /// Attend la fin d'un téléchargement et enregistre l'entrée en base
    ///
    /// Seul le propriétaire du téléchargement (celui qui l'a lancé) écrit
    /// la ligne de métadonnées et nettoie la map ; les autres attendants se
    /// contentent du résultat.
    async fn finish_store(
        &self,
        track: &Track,
        dl: Arc<Download>,
        owner: bool,
        quality: &str,
    ) -> Result<()> {
        let result = dl.wait_until_finished().await;

        if owner {
            self.downloads.write().await.remove(&track.id);
        }

        match result {
            Ok(byte_size) => {
                if owner {
                    let metadata_json = serde_json::to_string(track)
                        .map_err(|e| Error::CorruptMetadata(track.id.clone(), e))?;
                    self.db.add(&track.id, &metadata_json, quality, byte_size)?;
                    info!(id = %track.id, bytes = byte_size, "Track stored offline");
                }
                Ok(())
            }
            Err(reason) => {
                if owner {
                    // Ne jamais laisser un fichier partiel visible
                    let path = self.file_path(&track.id);
                    if let Err(e) = tokio::fs::remove_file(&path).await {
                        if e.kind() != std::io::ErrorKind::NotFound {
                            warn!(id = %track.id, error = %e, "Failed to clean up partial file");
                        }
                    }
                }
                Err(Error::Download {
                    id: track.id.clone(),
                    reason,
                })
            }
        }
    }

    /// Récupère une piste hors-ligne par son identifiant
    ///
    /// Retourne `None` si la piste n'est pas stockée. Une ligne de base
    /// orpheline (fichier audio disparu) est nettoyée et traitée comme
    /// absente.
    pub async fn fetch(&self, song_id: &str) -> Result<Option<OfflineEntry>> {
        let row = match self.db.get(song_id)? {
            Some(row) => row,
            None => return Ok(None),
        };

        let path = self.file_path(song_id);
        if !path.exists() {
            warn!(id = %song_id, "Offline metadata without audio file, dropping entry");
            self.db.delete(song_id)?;
            return Ok(None);
        }

        let track: Track = serde_json::from_str(&row.metadata_json)
            .map_err(|e| Error::CorruptMetadata(song_id.to_string(), e))?;

        Ok(Some(OfflineEntry {
            track,
            path,
            quality: row.quality,
            byte_size: row.byte_size,
            stored_at: row.stored_at,
        }))
    }

    /// Liste toutes les pistes hors-ligne, les plus récentes en premier
    ///
    /// L'ordre suit le timestamp de like (`liked_at`) quand il existe, sinon
    /// la date de stockage : la vue "favoris hors-ligne" garde l'ordre des
    /// likes. Les entrées illisibles ou orphelines sont ignorées (avec un
    /// warn), jamais propagées : une ligne corrompue ne doit pas cacher les
    /// autres.
    pub async fn fetch_all(&self) -> Result<Vec<OfflineEntry>> {
        let rows = self.db.get_all()?;
        let mut entries = Vec::with_capacity(rows.len());

        for row in rows {
            let path = self.file_path(&row.song_id);
            if !path.exists() {
                warn!(id = %row.song_id, "Offline metadata without audio file, skipping");
                continue;
            }
            match serde_json::from_str::<Track>(&row.metadata_json) {
                Ok(track) => entries.push(OfflineEntry {
                    track,
                    path,
                    quality: row.quality,
                    byte_size: row.byte_size,
                    stored_at: row.stored_at,
                }),
                Err(e) => {
                    warn!(id = %row.song_id, error = %e, "Corrupt offline metadata, skipping");
                }
            }
        }

        entries.sort_by_key(|e| std::cmp::Reverse(Self::recency(e)));
        Ok(entries)
    }

    /// Timestamp de tri d'une entrée : like, sinon stockage
    fn recency(entry: &OfflineEntry) -> DateTime<Utc> {
        entry
            .track
            .liked_at
            .or_else(|| {
                DateTime::parse_from_rfc3339(&entry.stored_at)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            })
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Teste la présence d'une piste dans le cache
    pub async fn has(&self, song_id: &str) -> Result<bool> {
        Ok(self.db.has(song_id)? && self.file_path(song_id).exists())
    }

    /// Supprime une piste du cache
    ///
    /// Idempotent : supprimer une piste absente réussit silencieusement.
    /// Retourne `true` si une entrée existait. Un téléchargement en cours
    /// pour cet identifiant est oublié : un `store` ultérieur repart de zéro
    /// au lieu de rejoindre l'ancien.
    pub async fn remove(&self, song_id: &str) -> Result<bool> {
        self.downloads.write().await.remove(song_id);
        let existed = self.db.delete(song_id)?;

        let path = self.file_path(song_id);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e.into());
            }
        }

        Ok(existed)
    }

    /// Vide complètement le cache (fichiers et métadonnées)
    pub async fn clear(&self) -> Result<()> {
        let rows = self.db.get_all()?;
        for row in rows {
            let path = self.file_path(&row.song_id);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(id = %row.song_id, error = %e, "Failed to remove audio file");
                }
            }
        }
        self.db.purge()?;
        info!("Offline cache cleared");
        Ok(())
    }

    /// Nombre de pistes stockées
    pub async fn count(&self) -> Result<usize> {
        Ok(self.db.count()?)
    }

    /// Taille totale du cache en mégaoctets, arrondie à deux décimales
    pub async fn size_in_mb(&self) -> Result<f64> {
        let bytes = self.db.total_bytes()?;
        let mb = bytes as f64 / 1_048_576.0;
        Ok((mb * 100.0).round() / 100.0)
    }
}
