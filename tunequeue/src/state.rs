//! Noyau du contrôleur : file + pointeur + transport
//!
//! Toutes les transitions sont synchrones, totales et infaillibles. Les
//! valeurs hors bornes (index, volume, progression) sont ramenées dans les
//! bornes à l'entrée.

use serde::{Deserialize, Serialize};
use tunemodel::Track;

/// Volume par défaut quand aucun snapshot n'est restauré
pub(crate) const DEFAULT_VOLUME: u8 = 50;

/// État complet du lecteur
///
/// La piste courante n'est jamais stockée : elle est dérivée de
/// `(queue, index)` par [`PlayerState::current_track`]. Un `index` à `None`
/// signifie "aucune sélection" (file vide ou jamais jouée).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    queue: Vec<Track>,
    index: Option<usize>,
    is_playing: bool,
    volume: u8,
    progress: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            queue: Vec::new(),
            index: None,
            is_playing: false,
            volume: DEFAULT_VOLUME,
            progress: 0.0,
        }
    }
}

impl PlayerState {
    /// Crée un état vide avec un volume initial
    pub fn with_volume(volume: u8) -> Self {
        Self {
            volume: volume.min(100),
            ..Self::default()
        }
    }

    // ============ Lectures ============

    /// Piste courante, dérivée de la file et du pointeur
    pub fn current_track(&self) -> Option<&Track> {
        self.index.and_then(|i| self.queue.get(i))
    }

    /// File de lecture complète
    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    /// Position courante dans la file (`None` si aucune sélection)
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Lecture en cours ?
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Volume courant (0-100)
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Progression de la piste courante en pourcentage (0-100)
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Nombre de pistes dans la file
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// La file est-elle vide ?
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    // ============ Transitions ============

    /// Remplace la file en bloc et lance la lecture à `index`
    ///
    /// Le pointeur est ramené dans les bornes ; une file vide retombe à
    /// l'état Idle (aucune sélection, lecture coupée). La progression est
    /// remise à zéro et la lecture marquée active immédiatement
    /// (autoplay-on-select, le démarrage effectif restant soumis au
    /// geste utilisateur côté rendu).
    pub fn play_queue(&mut self, tracks: Vec<Track>, index: usize) {
        self.queue = tracks;
        if self.queue.is_empty() {
            self.index = None;
            self.is_playing = false;
        } else {
            self.index = Some(index.min(self.queue.len() - 1));
            self.is_playing = true;
        }
        self.progress = 0.0;
    }

    /// Joue une piste seule : la file devient `[track]`
    pub fn play_track(&mut self, track: Track) {
        self.play_queue(vec![track], 0);
    }

    /// Bascule lecture/pause, sans toucher au reste de l'état
    pub fn toggle_play_pause(&mut self) {
        self.is_playing = !self.is_playing;
    }

    /// Positionne la progression (pourcentage, borné à 0-100)
    pub fn seek(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 100.0);
    }

    /// Avance à la piste suivante (bouclage en fin de file)
    ///
    /// No-op sur file vide. Ne démarre ni n'arrête la lecture : seul le
    /// flag `is_playing` pilote le transport.
    pub fn next(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let current = self.index.unwrap_or(0);
        self.index = Some((current + 1) % self.queue.len());
        self.progress = 0.0;
    }

    /// Recule à la piste précédente (bouclage en début de file)
    ///
    /// No-op sur file vide. La convention "rejouer la piste courante si
    /// plus de 3 s écoulées" appartient à la couche appelante, pas au
    /// contrôleur.
    pub fn previous(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let current = self.index.unwrap_or(0);
        self.index = Some(if current == 0 {
            self.queue.len() - 1
        } else {
            current - 1
        });
        self.progress = 0.0;
    }

    /// Fixe le volume (borné à 0-100)
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
    }

    /// Ajoute une piste en fin de file sans toucher au pointeur
    pub fn enqueue(&mut self, track: Track) {
        self.queue.push(track);
    }

    /// Réduit la file à la seule piste courante (ou la vide)
    pub fn clear_queue(&mut self) {
        match self.current_track().cloned() {
            Some(track) => {
                self.queue = vec![track];
                self.index = Some(0);
            }
            None => {
                self.queue.clear();
                self.index = None;
            }
        }
    }

    /// Répare les invariants après une restauration de snapshot
    ///
    /// Un snapshot externe peut porter un pointeur hors bornes ; on le
    /// ramène dans la file plutôt que de propager un état incohérent.
    pub(crate) fn sanitize(&mut self) {
        if self.queue.is_empty() {
            self.index = None;
        } else if let Some(i) = self.index {
            if i >= self.queue.len() {
                self.index = Some(self.queue.len() - 1);
            }
        }
        self.volume = self.volume.min(100);
        self.progress = self.progress.clamp(0.0, 100.0);
    }
}
