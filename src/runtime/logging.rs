use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Settings;

fn log_path(settings: &Settings) -> PathBuf {
    settings
        .log
        .file
        .clone()
        .unwrap_or_else(|| settings.storage.resolved_base_dir().join("cadenza.log"))
}

/// Install the global `tracing` subscriber.
///
/// Output goes to the log file so the interactive terminal stays clean;
/// stderr is used when the file cannot be opened. `RUST_LOG` overrides
/// `log.level`.
pub fn init(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let path = log_path(settings);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(e) => {
            eprintln!("cadenza: cannot open log file {}: {e}; logging to stderr", path.display());
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
