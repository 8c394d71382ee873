//! Types d'erreurs pour tunequeue

/// Erreurs du contrôleur de lecture
///
/// Les transitions d'état elles-mêmes sont totales et ne peuvent pas
/// échouer ; seules la sauvegarde et la restauration du snapshot font de
/// l'I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Type Result spécialisé pour tunequeue
pub type Result<T> = std::result::Result<T, Error>;
