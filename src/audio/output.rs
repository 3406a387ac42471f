use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::backend::AudioBackend;
use super::error::PlayerError;
use super::sink::create_sink_at;

/// Handle on the system's default audio output.
///
/// The `rodio` stream is not `Send`, so it lives on a dedicated thread for
/// as long as this handle is open; only the mixer crosses over.
pub struct OutputDevice {
    mixer: Mixer,
    shutdown: Option<Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl OutputDevice {
    pub fn open_default() -> Result<Self, PlayerError> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<Mixer, String>>();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let join = thread::Builder::new()
            .name("cadenza-output".into())
            .spawn(move || {
                let mut stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(s) => s,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                // rodio logs to stderr when OutputStream is dropped.
                stream.log_on_drop(false);
                let _ = ready_tx.send(Ok(stream.mixer().clone()));

                // Hold the stream until asked to close (or the handle is gone).
                let _ = shutdown_rx.recv();
                drop(stream);
            })
            .map_err(|e| PlayerError::Device(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(mixer)) => Ok(Self {
                mixer,
                shutdown: Some(shutdown_tx),
                join: Some(join),
            }),
            Ok(Err(msg)) => {
                let _ = join.join();
                Err(PlayerError::Device(msg))
            }
            Err(_) => {
                let _ = join.join();
                Err(PlayerError::Device("output thread exited early".into()))
            }
        }
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    pub fn close(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(h) = self.join.take() {
            let _ = h.join();
            debug!("audio output closed");
        }
    }
}

impl Drop for OutputDevice {
    fn drop(&mut self) {
        self.close();
    }
}

/// `AudioBackend` over a `rodio` sink on the default output device.
///
/// Seeking rebuilds the sink with the decoder skipped ahead, so the reported
/// position is `offset` plus what the sink has played since.
pub struct RodioBackend {
    device: Option<OutputDevice>,
    path: Option<PathBuf>,
    sink: Option<Sink>,
    offset: Duration,
}

impl RodioBackend {
    pub fn open_default() -> Result<Self, PlayerError> {
        Ok(Self::new(OutputDevice::open_default()?))
    }

    pub fn new(device: OutputDevice) -> Self {
        Self {
            device: Some(device),
            path: None,
            sink: None,
            offset: Duration::ZERO,
        }
    }

    fn mixer(&self) -> Result<&Mixer, PlayerError> {
        self.device
            .as_ref()
            .map(OutputDevice::mixer)
            .ok_or_else(|| PlayerError::Device("output released".into()))
    }

    fn rebuild_at(&mut self, start_at: Duration) -> Result<Sink, PlayerError> {
        let path = self.path.as_deref().ok_or(PlayerError::NoTrack)?;
        create_sink_at(self.mixer()?, path, start_at)
    }

    fn drop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<(), PlayerError> {
        self.drop_sink();
        self.path = None;
        self.offset = Duration::ZERO;

        let sink = create_sink_at(self.mixer()?, path, Duration::ZERO)?;
        self.path = Some(path.to_path_buf());
        self.sink = Some(sink);
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        let needs_rebuild = self.sink.as_ref().is_none_or(Sink::empty);
        if needs_rebuild {
            self.drop_sink();
            let sink = self.rebuild_at(Duration::ZERO)?;
            self.sink = Some(sink);
            self.offset = Duration::ZERO;
        }
        if let Some(s) = &self.sink {
            s.play();
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = &self.sink {
            s.pause();
        }
    }

    fn unpause(&mut self) {
        if let Some(s) = &self.sink {
            s.play();
        }
    }

    fn stop(&mut self) {
        self.drop_sink();
        self.offset = Duration::ZERO;
    }

    fn seek(&mut self, position: Duration) -> Result<(), PlayerError> {
        let was_playing = self
            .sink
            .as_ref()
            .is_some_and(|s| !s.is_paused() && !s.empty());

        let sink = self.rebuild_at(position)?;
        self.drop_sink();
        if was_playing {
            sink.play();
        }
        self.sink = Some(sink);
        self.offset = position;
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }

    fn position(&self) -> Duration {
        self.offset + self.sink.as_ref().map_or(Duration::ZERO, Sink::get_pos)
    }

    fn release(&mut self) {
        self.drop_sink();
        self.path = None;
        match self.device.take() {
            Some(mut device) => device.close(),
            None => warn!("audio output already released"),
        }
    }
}
