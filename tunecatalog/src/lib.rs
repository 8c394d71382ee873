//! # tunecatalog - Client du catalogue musical de TuneFlow
//!
//! Cette crate fournit un client Rust pour l'API de catalogue (saavn.dev),
//! avec un cache en mémoire TTL pour minimiser les requêtes réseau.
//!
//! ## Vue d'ensemble
//!
//! `tunecatalog` permet d'accéder aux fonctionnalités du catalogue :
//! - Recherche (pistes, albums, artistes, playlists)
//! - Fetch par identifiant (piste, album, artiste, playlist)
//! - Cache en mémoire avec TTL pour chaque réponse analysée
//!
//! ## Politique d'erreur
//!
//! Les recherches sont permissives : une erreur réseau ou de décodage
//! renvoie la valeur en cache si elle existe, sinon une page vide, jamais
//! une erreur dure. Les fetchs par identifiant, eux, distinguent `NotFound`
//! des erreurs transport.

pub mod cache;
pub mod client;
mod error;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
