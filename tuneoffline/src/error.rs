//! Erreurs du cache hors-ligne

use thiserror::Error;

/// Erreurs pouvant survenir lors des opérations du cache hors-ligne
#[derive(Debug, Error)]
pub enum Error {
    /// La piste ne porte pas d'identifiant utilisable
    #[error(transparent)]
    Model(#[from] tunemodel::ModelError),

    /// La piste ne propose aucune variante de téléchargement
    #[error("No playable source for track {0}")]
    NoSource(String),

    /// Erreur de la base de métadonnées
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Erreur d'entrée/sortie sur le fichier audio
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Métadonnées illisibles en base
    #[error("Corrupt metadata for track {0}: {1}")]
    CorruptMetadata(String, serde_json::Error),

    /// Échec du téléchargement de la source audio
    #[error("Download failed for track {id}: {reason}")]
    Download { id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
