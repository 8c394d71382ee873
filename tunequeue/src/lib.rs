//! # TuneQueue
//!
//! Contrôleur de file de lecture : la file ordonnée de pistes, le pointeur
//! de position courante, l'état de transport (lecture/pause), le volume et
//! la progression.
//!
//! Deux couches :
//! - [`PlayerState`] : le noyau pur, transitions synchrones et totales ;
//! - [`PlayerStore`] : le conteneur explicite et partageable (verrou +
//!   diffusion d'évènements + snapshot persisté).
//!
//! Invariant central : la piste courante est toujours **dérivée** de
//! `(file, pointeur)`, jamais stockée à part. Le pointeur d'une file non
//! vide est toujours dans les bornes.

mod error;
mod event;
mod state;
mod store;

pub use error::{Error, Result};
pub use event::PlayerEvent;
pub use state::PlayerState;
pub use store::PlayerStore;
