//! Évènements diffusés par le contrôleur de lecture

use tunemodel::Track;

/// Évènement émis après chaque transition du contrôleur
///
/// L'adaptateur de rendu s'y abonne pour piloter l'élément audio sans
/// interroger l'état en boucle.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// La composition de la file a changé (remplacement, ajout, clear)
    QueueChanged,
    /// La piste courante a changé (ou a été rejouée depuis le début)
    TrackChanged { track: Option<Track> },
    /// Lecture démarrée ou mise en pause
    TransportChanged { is_playing: bool },
    /// Volume modifié (0-100)
    VolumeChanged { volume: u8 },
    /// Progression déplacée explicitement (seek), en pourcentage 0-100
    ProgressChanged { progress: f32 },
}
