//! Background position polling.
//!
//! One loop runs per engine while playing. Each tick takes the engine mutex,
//! samples the backend and either reports the position or, once the backend
//! has drained, collapses the state to stopped and reports the end.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use super::backend::AudioBackend;
use super::types::{PlayerEvent, PlayerState};

/// Everything the engine mutex protects.
pub(super) struct Shared<B> {
    pub backend: B,
    pub state: PlayerState,
    /// A polling loop is alive and will keep going while `state.playing`.
    pub polling: bool,
    /// Bumped by every stop; a loop from an older generation exits.
    pub generation: u64,
}

pub(super) type SharedHandle<B> = Arc<Mutex<Shared<B>>>;

pub(super) struct Poller {
    wake: Sender<()>,
    join: JoinHandle<()>,
}

impl Poller {
    pub(super) fn spawn<B: AudioBackend>(
        shared: SharedHandle<B>,
        events: Sender<PlayerEvent>,
        interval: Duration,
        generation: u64,
    ) -> io::Result<Self> {
        let (wake, wake_rx) = mpsc::channel::<()>();
        let join = thread::Builder::new()
            .name("cadenza-poll".into())
            .spawn(move || run(shared, events, wake_rx, interval, generation))?;
        Ok(Self { wake, join })
    }

    #[cfg(test)]
    pub(super) fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wake the loop and wait up to `timeout` for it to exit.
    ///
    /// Returns `false` when the thread was still running at the deadline; it
    /// is then left detached.
    pub(super) fn stop(self, timeout: Duration) -> bool {
        let _ = self.wake.send(());
        let deadline = Instant::now() + timeout;
        while !self.join.is_finished() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(2));
        }
        let _ = self.join.join();
        true
    }
}

fn run<B: AudioBackend>(
    shared: SharedHandle<B>,
    events: Sender<PlayerEvent>,
    wake: Receiver<()>,
    interval: Duration,
    generation: u64,
) {
    loop {
        match wake.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        let Ok(mut guard) = shared.lock() else {
            break;
        };
        if !tick(&mut guard, &events, generation) {
            break;
        }
    }
    debug!("polling loop {generation} exited");
}

/// One sample. Returns whether the loop should keep running.
pub(super) fn tick<B: AudioBackend>(
    shared: &mut Shared<B>,
    events: &Sender<PlayerEvent>,
    generation: u64,
) -> bool {
    if shared.generation != generation {
        return false;
    }
    if !shared.state.playing {
        shared.polling = false;
        return false;
    }

    if shared.backend.is_busy() {
        let secs = shared.backend.position().as_secs();
        shared.state.position = secs;
        let _ = events.send(PlayerEvent::PositionUpdated(secs));
        true
    } else {
        shared.state.playing = false;
        shared.state.position = 0;
        shared.polling = false;
        let _ = events.send(PlayerEvent::StatusChanged(false));
        let _ = events.send(PlayerEvent::Ended);
        false
    }
}
