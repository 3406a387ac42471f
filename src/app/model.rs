//! Session model types: `Session` and `PlaybackState`.
//!
//! A `Session` is what a shell keeps between player callbacks: the catalog
//! in display order, which track is selected, and what the player last
//! reported.

use crate::audio::PlayerEvent;
use crate::library::Track;

/// The playback state as last reported by the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// The main session model.
#[derive(Debug, Default)]
pub struct Session {
    /// Catalog order: most recently imported first.
    pub tracks: Vec<Track>,
    pub selected: Option<usize>,
    pub playback: PlaybackState,
    /// Last reported elapsed seconds.
    pub position: u64,
    /// One-line status message for the shell.
    pub status: String,
    /// Track id awaiting a yes/no answer before it is deleted.
    pub pending_delete: Option<i64>,
}

impl Session {
    /// Create a new `Session` over `tracks` with nothing selected.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            ..Self::default()
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.selected.and_then(|i| self.tracks.get(i))
    }

    fn index_of(&self, id: i64) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Select the track with `id`. Returns whether it exists.
    pub fn select_id(&mut self, id: i64) -> bool {
        match self.index_of(id) {
            Some(i) => {
                self.selected = Some(i);
                true
            }
            None => false,
        }
    }

    /// The selected track, or the first one when nothing is selected.
    pub fn selected_or_first(&mut self) -> Option<&Track> {
        if self.selected_track().is_none() {
            self.selected = if self.has_tracks() { Some(0) } else { None };
        }
        self.selected_track()
    }

    /// Index after the selection, without wrapping.
    pub fn next_index(&self) -> Option<usize> {
        let i = self.selected?;
        (i + 1 < self.tracks.len()).then_some(i + 1)
    }

    /// Index before the selection, without wrapping.
    pub fn prev_index(&self) -> Option<usize> {
        let i = self.selected?;
        i.checked_sub(1)
    }

    /// Move the selection forward and return the newly selected track.
    pub fn select_next(&mut self) -> Option<&Track> {
        let i = self.next_index()?;
        self.selected = Some(i);
        self.tracks.get(i)
    }

    /// Move the selection back and return the newly selected track.
    pub fn select_prev(&mut self) -> Option<&Track> {
        let i = self.prev_index()?;
        self.selected = Some(i);
        self.tracks.get(i)
    }

    /// Drop the track with `id` from the list, keeping the cursor on a
    /// neighbour when the selected track goes away.
    pub fn remove_id(&mut self, id: i64) {
        let Some(removed) = self.index_of(id) else {
            return;
        };
        self.tracks.remove(removed);
        self.selected = match self.selected {
            _ if self.tracks.is_empty() => None,
            Some(s) if s > removed => Some(s - 1),
            Some(s) if s == removed => Some(s.min(self.tracks.len() - 1)),
            other => other,
        };
    }

    /// Reflect a player notification. Returns `true` for end-of-track so the
    /// caller can decide whether to advance.
    pub fn apply(&mut self, event: PlayerEvent) -> bool {
        match event {
            PlayerEvent::StatusChanged(true) => {
                self.playback = PlaybackState::Playing;
                false
            }
            PlayerEvent::StatusChanged(false) => {
                self.playback = if self.position > 0 {
                    PlaybackState::Paused
                } else {
                    PlaybackState::Stopped
                };
                false
            }
            PlayerEvent::PositionUpdated(secs) => {
                self.position = secs;
                false
            }
            PlayerEvent::Ended => {
                self.playback = PlaybackState::Stopped;
                self.position = 0;
                true
            }
        }
    }

    /// Called after an explicit stop or load, which rewinds to 0.
    pub fn rewind(&mut self) {
        self.position = 0;
        self.playback = PlaybackState::Stopped;
    }

    /// Ask before deleting the selected track. Returns whether a question is
    /// now pending.
    pub fn request_delete(&mut self) -> bool {
        let Some(track) = self.selected_track() else {
            return false;
        };
        let (id, prompt) = (track.id, format!("Delete #{} ({})? [y/N]", track.id, track.title));
        self.pending_delete = Some(id);
        self.status = prompt;
        true
    }

    /// Settle a pending delete question. Anything but an explicit yes keeps
    /// the track. Returns the id to delete.
    pub fn answer_delete(&mut self, yes: bool) -> Option<i64> {
        let id = self.pending_delete.take()?;
        if yes {
            Some(id)
        } else {
            self.status = "Delete cancelled".to_string();
            None
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
    }
}
