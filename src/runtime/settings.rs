use std::path::Path;

use crate::config::{Settings, resolve_config_path};

/// Pick the settings to run with. A broken or rejected config never stops
/// the player: the built-in defaults are used and the reason is returned.
fn settle(loaded: Result<Settings, ::config::ConfigError>, source: Option<&Path>) -> (Settings, Option<String>) {
    let origin = source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "environment".to_string());
    match loaded {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                Settings::default(),
                Some(format!("ignoring settings from {origin} ({msg}); library and player use defaults")),
            ),
        },
        Err(e) => (
            Settings::default(),
            Some(format!("cannot read settings from {origin} ({e}); library and player use defaults")),
        ),
    }
}

pub fn load_settings() -> Settings {
    let source = resolve_config_path().filter(|p| p.is_file());
    let (settings, warning) = settle(Settings::load(), source.as_deref());
    if let Some(msg) = warning {
        eprintln!("cadenza: {msg}");
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_settings_pass_through_without_a_warning() {
        let mut s = Settings::default();
        s.player.poll_interval_ms = 250;
        let (chosen, warning) = settle(Ok(s), None);
        assert_eq!(chosen.player.poll_interval_ms, 250);
        assert!(warning.is_none());
    }

    #[test]
    fn rejected_settings_fall_back_and_name_the_file() {
        let mut s = Settings::default();
        s.player.poll_interval_ms = 0;
        let (chosen, warning) = settle(Ok(s), Some(Path::new("/etc/cadenza.toml")));
        assert_eq!(chosen.player.poll_interval_ms, 500);
        let warning = warning.unwrap();
        assert!(warning.contains("/etc/cadenza.toml"), "{warning}");
        assert!(warning.contains("poll_interval_ms"), "{warning}");
    }

    #[test]
    fn unreadable_settings_fall_back_to_defaults() {
        let err = ::config::ConfigError::Message("bad toml".into());
        let (chosen, warning) = settle(Err(err), None);
        assert_eq!(chosen.storage.music_dir_name, "music_files");
        assert!(warning.unwrap().contains("environment"));
    }
}
