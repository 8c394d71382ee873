//! Identité utilisateur issue du fournisseur OAuth externe

use serde::{Deserialize, Serialize};

/// Identité consommée après authentification
///
/// Le flux OAuth lui-même est hors périmètre : le client ne voit que
/// l'email, le nom d'affichage et l'avatar résultants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Email de l'utilisateur (clé du stockage des favoris)
    pub email: String,
    /// Nom d'affichage
    #[serde(default)]
    pub name: Option<String>,
    /// URL de l'avatar
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Session {
    /// Crée une session à partir d'un email
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            avatar_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_round_trips_with_optional_fields() {
        let session = Session::new("user@example.com");
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
        assert!(back.name.is_none());
    }
}
