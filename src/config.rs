//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive storage,
//! playback and logging, plus helpers to load it from disk.

mod load;
mod schema;

pub use load::{default_data_dir, resolve_config_path};
pub use schema::*;
