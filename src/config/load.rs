use std::env;
use std::path::{Path, PathBuf};

use ::config::{Config, ConfigError, Environment, File};

use super::schema::Settings;

/// Sources in ascending precedence: the optional TOML file at `path`, then
/// `CADENZA__SECTION__KEY` variables.
fn layered(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = Config::builder();
    if let Some(p) = path {
        builder = builder.add_source(File::from(p).required(false));
    }
    builder
        .add_source(
            Environment::with_prefix("CADENZA")
                .separator("__")
                .try_parsing(true),
        )
        .build()
}

impl Settings {
    /// Effective settings: struct defaults, overlaid by the config file (when
    /// one exists), overlaid by the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = resolve_config_path();
        layered(path.as_deref())?.try_deserialize()
    }

    /// Reject settings the catalog or the player cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.player.poll_interval_ms == 0 {
            return Err("player.poll_interval_ms must be >= 1".to_string());
        }
        if self
            .library
            .extensions
            .iter()
            .all(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err("library.extensions must name at least one extension".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `CADENZA_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CADENZA_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/cadenza/config.toml`
/// or `~/.config/cadenza/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_home("XDG_CONFIG_HOME", ".config").map(|d| d.join("cadenza").join("config.toml"))
}

/// Compute the default data directory: `$XDG_DATA_HOME/cadenza` or
/// `~/.local/share/cadenza`.
pub fn default_data_dir() -> Option<PathBuf> {
    xdg_home("XDG_DATA_HOME", ".local/share").map(|d| d.join("cadenza"))
}

fn xdg_home(var: &str, fallback_under_home: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(fallback_under_home))
    }
}
