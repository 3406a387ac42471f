//! Error types for the catalog.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Source file not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
}
