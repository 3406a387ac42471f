use std::path::Path;
use std::time::Duration;

use super::error::PlayerError;

/// The output side of the player engine.
///
/// Every call is made with the engine's state mutex held, from either the
/// foreground thread or the polling loop, so implementations need no locking
/// of their own.
pub trait AudioBackend: Send + 'static {
    /// Prepare `path` for playback from the start, replacing anything loaded.
    fn load(&mut self, path: &Path) -> Result<(), PlayerError>;

    /// Start playback. After a stop or a natural end this restarts the
    /// loaded file from the beginning.
    fn play(&mut self) -> Result<(), PlayerError>;

    fn pause(&mut self);

    fn unpause(&mut self);

    /// Halt playback and rewind. The file stays loaded.
    fn stop(&mut self);

    /// Jump to `position`, keeping the current play/pause state.
    fn seek(&mut self, position: Duration) -> Result<(), PlayerError>;

    /// Whether there is still audio queued for output.
    fn is_busy(&self) -> bool;

    /// Elapsed time in the loaded file.
    fn position(&self) -> Duration;

    /// Release the output device. No other call is valid afterwards.
    fn release(&mut self);
}
