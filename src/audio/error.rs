//! Error types for playback.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("No track loaded")]
    NoTrack,

    #[error("File not found: {}", .0.display())]
    FileMissing(PathBuf),

    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("Audio output unavailable: {0}")]
    Device(String),
}
