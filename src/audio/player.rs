use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::PlayerSettings;
use crate::library::Track;

use super::backend::AudioBackend;
use super::error::PlayerError;
use super::output::RodioBackend;
use super::poller::{Poller, Shared, SharedHandle};
use super::types::{PlayerEvent, PlayerState, Transport};

/// Transport control for one loaded track.
///
/// Every method takes the shared mutex before touching state, the polling
/// loop included. Failures are logged and reported as `false`.
pub struct PlayerEngine<B: AudioBackend = RodioBackend> {
    shared: SharedHandle<B>,
    events: Sender<PlayerEvent>,
    poller: Option<Poller>,
    settings: PlayerSettings,
}

impl PlayerEngine<RodioBackend> {
    /// Open the default audio output and build an engine on it.
    pub fn open(settings: PlayerSettings, events: Sender<PlayerEvent>) -> Result<Self, PlayerError> {
        let backend = RodioBackend::open_default()?;
        Ok(Self::with_backend(backend, settings, events))
    }
}

impl<B: AudioBackend> PlayerEngine<B> {
    pub fn with_backend(backend: B, settings: PlayerSettings, events: Sender<PlayerEvent>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                backend,
                state: PlayerState::default(),
                polling: false,
                generation: 0,
            })),
            events,
            poller: None,
            settings,
        }
    }

    fn lock(&self) -> Option<MutexGuard<'_, Shared<B>>> {
        match self.shared.lock() {
            Ok(g) => Some(g),
            Err(_) => {
                error!("player state lock poisoned");
                None
            }
        }
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }

    pub fn snapshot(&self) -> PlayerState {
        self.lock().map(|g| g.state.clone()).unwrap_or_default()
    }

    pub fn transport(&self) -> Transport {
        self.lock().map(|g| g.state.transport()).unwrap_or_default()
    }

    pub fn current_track(&self) -> Option<Track> {
        self.lock().and_then(|g| g.state.track.clone())
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        self.lock().is_some_and(|g| g.state.playing)
    }

    /// Whether a polling loop thread is currently alive.
    #[cfg(test)]
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| !p.is_finished())
    }

    /// Stop whatever is playing and load `track` at position 0.
    pub fn load(&mut self, track: &Track) -> bool {
        self.stop();

        let Some(mut shared) = self.lock() else {
            return false;
        };
        shared.state = PlayerState::default();

        if !track.file_path.exists() {
            warn!("cannot load #{}: {}", track.id, PlayerError::FileMissing(track.file_path.clone()));
            return false;
        }
        if let Err(e) = shared.backend.load(&track.file_path) {
            warn!("cannot load #{}: {e}", track.id);
            return false;
        }

        shared.state.track = Some(track.clone());
        shared.state.duration = track.duration_secs();
        info!("loaded #{} ({})", track.id, track.title);
        true
    }

    /// Start playback, resuming from the recorded position when it is nonzero.
    pub fn play(&mut self) -> bool {
        let generation = {
            let Some(mut guard) = self.lock() else {
                return false;
            };
            let shared = &mut *guard;
            if shared.state.track.is_none() {
                debug!("play ignored: nothing loaded");
                return false;
            }

            if shared.state.position > 0 {
                let at = Duration::from_secs(shared.state.position);
                if let Err(e) = shared.backend.seek(at) {
                    warn!("play failed seeking to {}s: {e}", shared.state.position);
                    return false;
                }
            }
            if let Err(e) = shared.backend.play() {
                warn!("play failed: {e}");
                return false;
            }

            shared.state.playing = true;
            self.emit(PlayerEvent::StatusChanged(true));
            self.claim_polling(shared)
        };

        if let Some(generation) = generation {
            self.start_poller(generation);
        }
        true
    }

    pub fn pause(&mut self) -> bool {
        let Some(mut guard) = self.lock() else {
            return false;
        };
        let shared = &mut *guard;
        if shared.state.track.is_none() {
            return false;
        }

        shared.backend.pause();
        if shared.state.playing && shared.backend.is_busy() {
            shared.state.position = shared.backend.position().as_secs();
        }
        shared.state.playing = false;
        self.emit(PlayerEvent::StatusChanged(false));
        true
    }

    /// Continue after `pause` without re-seeking.
    pub fn resume(&mut self) -> bool {
        let generation = {
            let Some(mut guard) = self.lock() else {
                return false;
            };
            let shared = &mut *guard;
            if shared.state.track.is_none() {
                return false;
            }

            shared.backend.unpause();
            shared.state.playing = true;
            self.emit(PlayerEvent::StatusChanged(true));
            self.claim_polling(shared)
        };

        if let Some(generation) = generation {
            self.start_poller(generation);
        }
        true
    }

    /// Halt playback, rewind to 0, and wait (bounded) for the polling loop
    /// to exit. No position update is emitted after this returns.
    pub fn stop(&mut self) {
        if let Some(mut shared) = self.lock() {
            shared.backend.stop();
            shared.state.playing = false;
            shared.state.position = 0;
            shared.polling = false;
            shared.generation += 1;
            self.emit(PlayerEvent::StatusChanged(false));
        }

        if let Some(poller) = self.poller.take() {
            let timeout = self.settings.stop_join_timeout();
            if !poller.stop(timeout) {
                warn!("polling loop still running after {timeout:?}; detached");
            }
        }
    }

    /// Jump to `position` seconds. Requests beyond the track length are
    /// accepted and ignored.
    pub fn seek(&mut self, position: u64) -> bool {
        let Some(mut guard) = self.lock() else {
            return false;
        };
        let shared = &mut *guard;
        if shared.state.track.is_none() {
            debug!("seek ignored: nothing loaded");
            return false;
        }
        if position > shared.state.duration {
            debug!(
                "seek to {position}s ignored: track is {}s long",
                shared.state.duration
            );
            return true;
        }

        shared.state.position = position;
        if let Err(e) = shared.backend.seek(Duration::from_secs(position)) {
            warn!("seek to {position}s failed: {e}");
            return false;
        }
        self.emit(PlayerEvent::PositionUpdated(position));
        true
    }

    /// Pause when playing; otherwise resume from a nonzero position or play
    /// from the start.
    pub fn toggle_play_pause(&mut self) -> bool {
        let (playing, position) = match self.lock() {
            Some(g) => (g.state.playing, g.state.position),
            None => return false,
        };
        if playing {
            self.pause()
        } else if position > 0 {
            self.resume()
        } else {
            self.play()
        }
    }

    /// Stop playback and release the audio output. Call once at shutdown.
    pub fn cleanup(&mut self) {
        self.stop();
        if let Some(mut shared) = self.lock() {
            shared.backend.release();
            shared.state = PlayerState::default();
        }
        info!("player released");
    }

    /// Mark a loop as wanted. Returns the generation to spawn it with when no
    /// live loop will pick the new playing state up.
    fn claim_polling(&self, shared: &mut Shared<B>) -> Option<u64> {
        if shared.polling {
            return None;
        }
        shared.polling = true;
        Some(shared.generation)
    }

    fn start_poller(&mut self, generation: u64) {
        if let Some(old) = self.poller.take() {
            // The old loop has already given up its claim; it is on its way out.
            old.stop(self.settings.stop_join_timeout());
        }

        match Poller::spawn(
            self.shared.clone(),
            self.events.clone(),
            self.settings.poll_interval(),
            generation,
        ) {
            Ok(p) => self.poller = Some(p),
            Err(e) => {
                error!("failed to start polling loop: {e}");
                if let Some(mut shared) = self.lock() {
                    shared.polling = false;
                }
            }
        }
    }
}
