use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub library: LibrarySettings,
    pub player: PlayerSettings,
    pub controls: ControlsSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Application-private base directory. Holds the database and the
    /// imported audio copies. Defaults to `$XDG_DATA_HOME/cadenza`.
    pub base_dir: Option<PathBuf>,
    /// Name of the subdirectory (under `base_dir`) that receives imported files.
    pub music_dir_name: String,
    /// File name of the SQLite database (under `base_dir`).
    pub database_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            base_dir: None,
            music_dir_name: "music_files".to_string(),
            database_file: "music_db.sqlite3".to_string(),
        }
    }
}

impl StorageSettings {
    /// The configured base directory, or the XDG data default.
    pub fn resolved_base_dir(&self) -> PathBuf {
        self.base_dir
            .clone()
            .or_else(super::load::default_data_dir)
            .unwrap_or_else(|| PathBuf::from("cadenza-data"))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions accepted for import (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks while expanding directories.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,

    /// Which fields `cadenza list` shows for each track, in order.
    ///
    /// Example: ["artist", "title", "duration"] -> "Artist - Title - 03:12"
    pub display_fields: Vec<TrackDisplayField>,
    /// Separator used to join `display_fields`.
    pub display_separator: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "flac", "wav", "ogg", "m4a", "aac", "wma"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            display_fields: vec![
                TrackDisplayField::Artist,
                TrackDisplayField::Title,
                TrackDisplayField::Duration,
            ],
            display_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// How often the polling loop samples the backend while playing (milliseconds).
    pub poll_interval_ms: u64,
    /// Upper bound on how long `stop()` waits for the polling loop to exit (milliseconds).
    pub stop_join_timeout_ms: u64,
    /// Load and play the next track in catalog order when one ends.
    pub auto_advance: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            stop_join_timeout_ms: 500,
            auto_advance: true,
        }
    }
}

impl PlayerSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn stop_join_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_join_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` takes precedence.
    pub level: String,
    /// Log file path. Defaults to `<base_dir>/cadenza.log`.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Album,
    Filename,
    Path,
    #[serde(alias = "length", alias = "time")]
    Duration,
    Id,
}
