//! Client des favoris ("liked songs") de TuneFlow
//!
//! Le stockage des favoris vit derrière une API HTTP externe (une table
//! relationnelle par utilisateur). Ce crate en fournit le client : liste,
//! ids, compteur, like/unlike, avec un cache en mémoire de l'ensemble des
//! identifiants pour répondre à `is_liked` sans aller-retour réseau.

pub mod client;
mod error;

pub use client::LikedClient;
pub use error::{LikedError, Result};
