//! Gestion des erreurs pour le client des favoris

use thiserror::Error;

/// Type Result personnalisé pour tuneliked
pub type Result<T> = std::result::Result<T, LikedError>;

/// Erreurs possibles lors de l'utilisation du client des favoris
#[derive(Error, Debug)]
pub enum LikedError {
    /// Session absente ou expirée, l'UI doit proposer la connexion
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Piste invalide (identifiant manquant)
    #[error(transparent)]
    Model(#[from] tunemodel::ModelError),

    /// Erreur HTTP
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Erreur de l'API des favoris
    #[error("Liked-songs API error (code {code}): {message}")]
    ApiError { code: u16, message: String },
}

impl LikedError {
    /// Crée une erreur API depuis un code de statut HTTP et un message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            401 | 403 => Self::Unauthorized(message.into()),
            _ => Self::ApiError {
                code,
                message: message.into(),
            },
        }
    }

    /// Vérifie si l'erreur demande une authentification
    pub fn is_auth_error(&self) -> bool {
        matches!(self, LikedError::Unauthorized(_))
    }
}
