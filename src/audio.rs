//! Playback: the player engine and the audio output it drives.
//!
//! `PlayerEngine` owns transport state behind a single mutex shared with a
//! background polling loop. The loop reports progress and end-of-track as
//! `PlayerEvent`s over a channel. Output goes through the `AudioBackend`
//! trait; `RodioBackend` is the real device implementation.

mod backend;
mod error;
mod output;
mod player;
mod poller;
mod sink;
mod types;

pub use backend::AudioBackend;
pub use error::PlayerError;
pub use output::RodioBackend;
pub use player::PlayerEngine;
pub use types::{PlayerEvent, PlayerState, Transport};
