//! PlayerStore : conteneur explicite de l'état du lecteur
//!
//! Le store enveloppe [`PlayerState`] derrière un verrou, publie un
//! [`PlayerEvent`] après chaque transition, et sait persister/restaurer
//! l'état sous forme de snapshot JSON à des points de passage définis
//! (démarrage, arrêt). Il se construit et s'injecte explicitement : pas de
//! singleton ambiant.

use crate::event::PlayerEvent;
use crate::state::PlayerState;
use crate::Result;
use std::path::Path;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};
use tunemodel::Track;

/// Capacité du canal d'évènements (fan-out vers les adaptateurs de rendu)
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Conteneur d'état du lecteur, partageable entre surfaces UI
pub struct PlayerStore {
    state: RwLock<PlayerState>,
    events: broadcast::Sender<PlayerEvent>,
}

impl PlayerStore {
    /// Crée un store vide avec le volume par défaut
    pub fn new() -> Self {
        Self::with_state(PlayerState::default())
    }

    /// Crée un store vide avec un volume initial
    pub fn with_volume(volume: u8) -> Self {
        Self::with_state(PlayerState::with_volume(volume))
    }

    /// Crée un store à partir d'un état existant
    pub fn with_state(state: PlayerState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(state),
            events,
        }
    }

    /// Restaure un store depuis un fichier snapshot
    ///
    /// Un fichier absent ou illisible n'est pas une erreur : on repart d'un
    /// état vide avec le volume fourni.
    pub async fn restore(path: &Path, default_volume: u8) -> Self {
        match tokio::fs::read(path).await {
            Ok(bytes) => match serde_json::from_slice::<PlayerState>(&bytes) {
                Ok(mut state) => {
                    state.sanitize();
                    debug!(path = %path.display(), "Player snapshot restored");
                    Self::with_state(state)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Corrupt player snapshot, starting fresh");
                    Self::with_volume(default_volume)
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "No player snapshot, starting fresh");
                Self::with_volume(default_volume)
            }
        }
    }

    /// Sauvegarde l'état courant dans un fichier snapshot JSON
    pub async fn save_snapshot(&self, path: &Path) -> Result<()> {
        let state = self.state.read().await;
        let json = serde_json::to_vec_pretty(&*state)?;
        drop(state);
        tokio::fs::write(path, json).await?;
        debug!(path = %path.display(), "Player snapshot saved");
        Ok(())
    }

    /// S'abonne au flux d'évènements du lecteur
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: PlayerEvent) {
        // Ignoré s'il n'y a aucun abonné
        let _ = self.events.send(event);
    }

    // ============ Lectures ============

    /// Copie de l'état complet
    pub async fn state(&self) -> PlayerState {
        self.state.read().await.clone()
    }

    /// Piste courante (copie)
    pub async fn current_track(&self) -> Option<Track> {
        self.state.read().await.current_track().cloned()
    }

    /// Lecture en cours ?
    pub async fn is_playing(&self) -> bool {
        self.state.read().await.is_playing()
    }

    // ============ Transitions ============

    /// Remplace la file et lance la lecture à `index`
    ///
    /// Une file de remplacement vide ramène à l'état Idle : l'évènement de
    /// transport reflète le flag réellement calculé, pas l'intention.
    pub async fn play_queue(&self, tracks: Vec<Track>, index: usize) {
        let (current, is_playing) = {
            let mut state = self.state.write().await;
            state.play_queue(tracks, index);
            (state.current_track().cloned(), state.is_playing())
        };
        self.emit(PlayerEvent::QueueChanged);
        self.emit(PlayerEvent::TrackChanged { track: current });
        self.emit(PlayerEvent::TransportChanged { is_playing });
    }

    /// Joue une piste seule
    pub async fn play_track(&self, track: Track) {
        self.play_queue(vec![track], 0).await;
    }

    /// Bascule lecture/pause
    pub async fn toggle_play_pause(&self) {
        let is_playing = {
            let mut state = self.state.write().await;
            state.toggle_play_pause();
            state.is_playing()
        };
        self.emit(PlayerEvent::TransportChanged { is_playing });
    }

    /// Déplace la progression (seek), en pourcentage 0-100
    pub async fn seek(&self, progress: f32) {
        let progress = {
            let mut state = self.state.write().await;
            state.seek(progress);
            state.progress()
        };
        self.emit(PlayerEvent::ProgressChanged { progress });
    }

    /// Mise à jour de progression issue du poll de l'élément audio
    ///
    /// Même effet que [`seek`](Self::seek) sur l'état mais sans évènement :
    /// la cadence vient de la boucle de rendu, inutile de la rediffuser.
    pub async fn report_progress(&self, progress: f32) {
        self.state.write().await.seek(progress);
    }

    /// Piste suivante (bouclage)
    pub async fn next(&self) {
        let current = {
            let mut state = self.state.write().await;
            state.next();
            state.current_track().cloned()
        };
        self.emit(PlayerEvent::TrackChanged { track: current });
    }

    /// Piste précédente (bouclage)
    pub async fn previous(&self) {
        let current = {
            let mut state = self.state.write().await;
            state.previous();
            state.current_track().cloned()
        };
        self.emit(PlayerEvent::TrackChanged { track: current });
    }

    /// Fixe le volume (0-100)
    pub async fn set_volume(&self, volume: u8) {
        let volume = {
            let mut state = self.state.write().await;
            state.set_volume(volume);
            state.volume()
        };
        self.emit(PlayerEvent::VolumeChanged { volume });
    }

    /// Ajoute une piste en fin de file
    pub async fn enqueue(&self, track: Track) {
        self.state.write().await.enqueue(track);
        self.emit(PlayerEvent::QueueChanged);
    }

    /// Réduit la file à la piste courante
    pub async fn clear_queue(&self) {
        self.state.write().await.clear_queue();
        self.emit(PlayerEvent::QueueChanged);
    }
}

impl Default for PlayerStore {
    fn default() -> Self {
        Self::new()
    }
}
