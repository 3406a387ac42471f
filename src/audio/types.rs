//! Player-facing types: notifications, state snapshot and transport phase.

use crate::library::Track;

/// Notifications sent from the player engine to its shell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Playback started (`true`) or stopped/paused (`false`).
    StatusChanged(bool),
    /// Whole seconds elapsed in the current track.
    PositionUpdated(u64),
    /// The current track reached its end on its own.
    Ended,
}

/// In-memory transport state. Guarded by the engine's mutex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerState {
    pub track: Option<Track>,
    pub playing: bool,
    /// Elapsed seconds, truncated.
    pub position: u64,
    /// Total seconds, truncated.
    pub duration: u64,
}

impl PlayerState {
    pub fn transport(&self) -> Transport {
        match (&self.track, self.playing) {
            (None, _) => Transport::Empty,
            (Some(_), true) => Transport::Playing,
            (Some(_), false) if self.position > 0 => Transport::Paused,
            (Some(_), false) => Transport::Stopped,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transport {
    /// Nothing loaded.
    Empty,
    /// Loaded, at position 0, not playing.
    Stopped,
    Playing,
    /// Loaded, not playing, with a nonzero position to resume from.
    Paused,
}

impl Default for Transport {
    fn default() -> Self {
        Self::Empty
    }
}
