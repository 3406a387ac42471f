//! Utilities for creating `rodio` sinks from stored files.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};

use super::error::PlayerError;

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(mixer: &Mixer, path: &Path, start_at: Duration) -> Result<Sink, PlayerError> {
    let file = File::open(path).map_err(|source| PlayerError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| PlayerError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        // Seeking = decoding from the start and skipping ahead.
        .skip_duration(start_at);

    let sink = Sink::connect_new(mixer);
    sink.pause();
    sink.append(source);
    Ok(sink)
}
