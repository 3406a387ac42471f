//! Application module: exposes the session model used by the runtime.
//!
//! The `Session` model lives in `app::model` and holds the catalog order,
//! the selected track and the playback state reflected from the player.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
