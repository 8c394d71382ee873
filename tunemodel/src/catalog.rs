//! DTOs du catalogue distant : albums, artistes, playlists, recherche

use crate::track::{deserialize_id, ImageVariant, Track};
use serde::{Deserialize, Serialize};

/// Représente un artiste du catalogue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    /// Identifiant unique de l'artiste
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Nom de l'artiste
    pub name: String,
    /// Variantes d'image, résolution croissante
    #[serde(default)]
    pub image: Vec<ImageVariant>,
    /// Rôle renvoyé par le catalogue (ex: "singer")
    #[serde(default)]
    pub role: Option<String>,
}

/// Représente un album du catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    /// Identifiant unique de l'album
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Nom de l'album
    pub name: String,
    /// Année de sortie
    #[serde(default)]
    pub year: Option<String>,
    /// Langue principale
    #[serde(default)]
    pub language: Option<String>,
    /// Variantes d'image
    #[serde(default)]
    pub image: Vec<ImageVariant>,
    /// Pistes de l'album (présentes sur le fetch par id)
    #[serde(default)]
    pub songs: Vec<Track>,
}

/// Représente une playlist du catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    /// Identifiant unique de la playlist
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Nom de la playlist
    pub name: String,
    /// Nombre de pistes annoncé
    #[serde(default, rename = "songCount")]
    pub song_count: Option<u32>,
    /// Variantes d'image
    #[serde(default)]
    pub image: Vec<ImageVariant>,
    /// Pistes de la playlist (présentes sur le fetch par id)
    #[serde(default)]
    pub songs: Vec<Track>,
}

/// Page de résultats de recherche
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage<T> {
    /// Nombre total de résultats côté serveur
    #[serde(default)]
    pub total: u32,
    /// Index de départ de la page
    #[serde(default)]
    pub start: u32,
    /// Résultats de la page
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for SearchPage<T> {
    fn default() -> Self {
        Self {
            total: 0,
            start: 0,
            results: Vec::new(),
        }
    }
}

impl<T> SearchPage<T> {
    /// Vérifie si la page ne contient aucun résultat
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Enveloppe générique des réponses du catalogue
///
/// Le serveur renvoie `{success, data, message}` ; `data` est absent en cas
/// d'erreur et `message` porte alors la cause.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Succès annoncé par le serveur
    #[serde(default)]
    pub success: bool,
    /// Charge utile
    #[serde(default = "none_data")]
    pub data: Option<T>,
    /// Message d'erreur éventuel
    #[serde(default)]
    pub message: Option<String>,
}

fn none_data<T>() -> Option<T> {
    None
}
