//! Cache audio hors-ligne de TuneFlow
//!
//! Ce crate gère le stockage persistant des pistes audio pour l'écoute
//! hors-ligne : les octets audio sur disque (`{dir}/{id}.mp3`) et les
//! métadonnées dans une base SQLite, indexées par l'identifiant de piste.
//!
//! Pas de politique d'éviction : une piste stockée reste disponible jusqu'à
//! suppression explicite par [`OfflineCache::remove`] ou [`OfflineCache::clear`].

pub mod cache;
pub mod db;
pub mod download;
mod error;

pub use cache::{OfflineCache, OfflineEntry};
pub use db::OfflineDb;
pub use error::{Error, Result};
