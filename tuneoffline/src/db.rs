//! Base SQLite des métadonnées de pistes hors-ligne
//!
//! Une ligne par piste stockée, indexée par l'identifiant de piste. Les
//! métadonnées complètes (JSON sérialisé du [`Track`](tunemodel::Track))
//! sont conservées telles quelles pour restituer l'affichage hors-ligne.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// Ligne de la table `offline_tracks`
#[derive(Debug, Clone)]
pub struct OfflineRow {
    /// Identifiant de la piste (clé primaire)
    pub song_id: String,
    /// Métadonnées JSON de la piste
    pub metadata_json: String,
    /// Libellé de qualité de la variante stockée (ex: "320kbps")
    pub quality: String,
    /// Taille du fichier audio en octets
    pub byte_size: u64,
    /// Date/heure de stockage (RFC3339)
    pub stored_at: String,
}

/// Base de données SQLite du cache hors-ligne
///
/// La connexion est protégée par un Mutex : les opérations SQLite sont
/// courtes et synchrones, le verrou n'est jamais tenu à travers un await.
#[derive(Debug)]
pub struct OfflineDb {
    conn: Mutex<Connection>,
}

impl OfflineDb {
    /// Ouvre (ou crée) la base de métadonnées
    pub fn init(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS offline_tracks (
                song_id TEXT PRIMARY KEY,
                metadata_json TEXT NOT NULL,
                quality TEXT NOT NULL,
                byte_size INTEGER NOT NULL,
                stored_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_offline_tracks_stored_at
             ON offline_tracks (stored_at DESC)",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Ajoute ou remplace l'entrée d'une piste
    ///
    /// Un re-stockage de la même piste écrase la ligne existante : les
    /// métadonnées et la taille reflètent toujours le dernier téléchargement.
    pub fn add(
        &self,
        song_id: &str,
        metadata_json: &str,
        quality: &str,
        byte_size: u64,
    ) -> rusqlite::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO offline_tracks (song_id, metadata_json, quality, byte_size, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(song_id) DO UPDATE SET
                 metadata_json = excluded.metadata_json,
                 quality = excluded.quality,
                 byte_size = excluded.byte_size,
                 stored_at = excluded.stored_at",
            params![
                song_id,
                metadata_json,
                quality,
                byte_size as i64,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Récupère l'entrée d'une piste par son identifiant
    pub fn get(&self, song_id: &str) -> rusqlite::Result<Option<OfflineRow>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT song_id, metadata_json, quality, byte_size, stored_at
             FROM offline_tracks WHERE song_id = ?1",
            [song_id],
            Self::map_row,
        )
        .optional()
    }

    /// Récupère toutes les entrées, les plus récentes en premier
    pub fn get_all(&self) -> rusqlite::Result<Vec<OfflineRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT song_id, metadata_json, quality, byte_size, stored_at
             FROM offline_tracks ORDER BY stored_at DESC",
        )?;

        let rows = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Teste la présence d'une piste
    pub fn has(&self, song_id: &str) -> rusqlite::Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM offline_tracks WHERE song_id = ?1",
            [song_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Supprime l'entrée d'une piste
    ///
    /// Retourne `true` si une ligne a effectivement été supprimée.
    pub fn delete(&self, song_id: &str) -> rusqlite::Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM offline_tracks WHERE song_id = ?1", [song_id])?;
        Ok(deleted > 0)
    }

    /// Purge toutes les entrées
    pub fn purge(&self) -> rusqlite::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM offline_tracks", [])?;
        Ok(())
    }

    /// Compte le nombre de pistes stockées
    pub fn count(&self) -> rusqlite::Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM offline_tracks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Somme des tailles de fichiers audio, en octets
    pub fn total_bytes(&self) -> rusqlite::Result<u64> {
        let conn = self.conn.lock().unwrap();
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(byte_size), 0) FROM offline_tracks",
            [],
            |row| row.get(0),
        )?;
        Ok(total as u64)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OfflineRow> {
        Ok(OfflineRow {
            song_id: row.get(0)?,
            metadata_json: row.get(1)?,
            quality: row.get(2)?,
            byte_size: row.get::<_, i64>(3)? as u64,
            stored_at: row.get(4)?,
        })
    }
}
