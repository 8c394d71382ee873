//! Piste jouable : métadonnées d'affichage et variantes de téléchargement

use crate::{ModelError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Libellé de qualité préféré pour la lecture et le stockage hors-ligne
pub const PREFERRED_QUALITY: &str = "320kbps";

/// Désérialiseur flexible pour les IDs qui peuvent être des strings ou des integers
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(Error::custom("ID must be a string or number")),
    }
}

/// Désérialiseur tolérant pour les listes d'artistes
///
/// Le catalogue renvoie selon les endpoints soit une liste de noms, soit une
/// liste d'objets `{name}`, soit un objet `{primary: [...], featured: [...]}`.
/// On normalise tout en liste ordonnée de noms.
fn deserialize_artist_names<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    fn names_from_seq(seq: &[Value]) -> Vec<String> {
        seq.iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Object(o) => o.get("name").and_then(|n| n.as_str()).map(String::from),
                _ => None,
            })
            .collect()
    }

    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(seq) => names_from_seq(&seq),
        Value::Object(map) => {
            let primary = map.get("primary").and_then(|v| v.as_array());
            let all = map.get("all").and_then(|v| v.as_array());
            match primary.filter(|s| !s.is_empty()).or(all) {
                Some(seq) => names_from_seq(seq),
                None => Vec::new(),
            }
        }
        _ => Vec::new(),
    })
}

/// Référence d'album portée par une piste (id + nom, sans les pistes)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlbumRef {
    /// Identifiant de l'album (optionnel selon les endpoints)
    #[serde(default)]
    pub id: Option<String>,
    /// Nom de l'album
    #[serde(default)]
    pub name: Option<String>,
}

/// Variante d'image (résolution croissante, la dernière est la meilleure)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageVariant {
    /// Libellé de résolution (ex: "500x500")
    #[serde(default)]
    pub quality: String,
    /// URL de l'image
    pub url: String,
}

/// Variante de téléchargement audio (qualité croissante, la dernière est la meilleure)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadVariant {
    /// Libellé de qualité (ex: "160kbps", "320kbps")
    #[serde(default)]
    pub quality: String,
    /// URL du flux audio
    pub url: String,
}

/// Une piste jouable
///
/// L'identifiant est stable et sert de clé unique partout : file de lecture,
/// statut "liké", cache hors-ligne. Une piste n'est jamais mutée en place,
/// sauf pour lui attacher un timestamp `liked_at` côté client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// Identifiant unique de la piste
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Titre affiché
    pub name: String,
    /// Noms d'artistes, dans l'ordre d'affichage
    #[serde(default, deserialize_with = "deserialize_artist_names")]
    pub artists: Vec<String>,
    /// Album contenant la piste
    #[serde(default)]
    pub album: Option<AlbumRef>,
    /// Durée en secondes
    #[serde(default)]
    pub duration: Option<u32>,
    /// Variantes d'image, résolution croissante
    #[serde(default)]
    pub image: Vec<ImageVariant>,
    /// Variantes de téléchargement, qualité croissante
    #[serde(default, rename = "downloadUrl")]
    pub download_url: Vec<DownloadVariant>,
    /// Timestamp d'ajout aux favoris (attaché côté client)
    #[serde(
        default,
        rename = "likedAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub liked_at: Option<DateTime<Utc>>,
}

impl Track {
    /// Retourne la meilleure URL de téléchargement
    ///
    /// Préfère la variante exactement étiquetée `320kbps`, sinon la dernière
    /// de la liste (les variantes sont ordonnées par qualité croissante).
    pub fn best_download_url(&self) -> Option<&str> {
        self.download_url
            .iter()
            .find(|v| v.quality == PREFERRED_QUALITY)
            .or_else(|| self.download_url.last())
            .map(|v| v.url.as_str())
    }

    /// Retourne la meilleure URL d'image (dernière variante)
    pub fn best_image_url(&self) -> Option<&str> {
        self.image.last().map(|v| v.url.as_str())
    }

    /// Retourne le premier artiste, pour l'affichage compact
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str)
    }

    /// Vérifie que la piste peut être stockée hors-ligne
    ///
    /// Refuse tôt : id non vide et au moins une variante de téléchargement.
    pub fn validate_for_offline(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ModelError::MissingTrackId);
        }
        if self.download_url.is_empty() {
            return Err(ModelError::NoDownloadVariant(self.id.clone()));
        }
        Ok(())
    }

    /// Retourne une copie de la piste avec un timestamp `liked_at`
    pub fn with_liked_at(mut self, at: DateTime<Utc>) -> Self {
        self.liked_at = Some(at);
        self
    }
}
