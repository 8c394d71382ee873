//! # TuneModel
//!
//! Structures de données partagées de TuneFlow : pistes, albums, artistes,
//! playlists et résultats de recherche.
//!
//! Les réponses du catalogue distant sont validées une seule fois à la
//! frontière (désérialiseurs tolérants pour les IDs et les listes
//! d'artistes) ; le reste du code manipule des types propres.

mod catalog;
mod session;
mod track;

pub use catalog::{Album, ApiEnvelope, Artist, Playlist, SearchPage};
pub use session::Session;
pub use track::{AlbumRef, DownloadVariant, ImageVariant, Track, PREFERRED_QUALITY};

/// Erreurs de validation du modèle
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// La piste n'a pas d'identifiant exploitable
    #[error("track is missing its identifier")]
    MissingTrackId,

    /// La piste n'a aucune variante de téléchargement
    #[error("track {0} has no download variants")]
    NoDownloadVariant(String),
}

/// Type Result spécialisé pour tunemodel
pub type Result<T> = std::result::Result<T, ModelError>;
