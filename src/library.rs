//! Music catalog: persisted track records and the audio files backing them.
//!
//! `Catalog` owns ingestion (copy into storage, read tags, insert), queries
//! and deletion. The file store, metadata extractor and SQLite access live in
//! the submodules and are only reached through it.

mod catalog;
mod db;
mod display;
mod error;
mod metadata;
mod model;
mod scan;
mod store;

pub use catalog::Catalog;
pub use display::display_from_fields;
pub use error::CatalogError;
pub use metadata::{UNKNOWN_ALBUM, UNKNOWN_ARTIST, format_duration};
pub use model::Track;
pub use scan::{collect_importable, is_supported};
