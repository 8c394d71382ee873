//! Gestion des erreurs pour le client du catalogue

use thiserror::Error;

/// Type Result personnalisé pour tunecatalog
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Erreurs possibles lors de l'utilisation du client du catalogue
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Ressource non trouvée (piste, album, etc.)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erreur HTTP
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Quota dépassé (rate limiting)
    #[error("Rate limit exceeded, please try again later")]
    RateLimitExceeded,

    /// Erreur de l'API du catalogue
    #[error("Catalog API error (code {code}): {message}")]
    ApiError { code: u16, message: String },
}

impl CatalogError {
    /// Crée une erreur API depuis un code de statut HTTP et un message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            404 => Self::NotFound(message.into()),
            429 => Self::RateLimitExceeded,
            _ => Self::ApiError {
                code,
                message: message.into(),
            },
        }
    }

    /// Vérifie si l'erreur est une absence de ressource
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}
