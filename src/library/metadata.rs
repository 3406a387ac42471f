//! Tag and property extraction for imported files.
//!
//! Anything that cannot be read falls back to a placeholder so an import
//! never fails on metadata alone.

use std::path::Path;

use lofty::prelude::*;
use tracing::warn;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

#[derive(Debug, Clone, PartialEq)]
pub struct AudioMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: f64,
    pub duration_str: String,
}

impl AudioMetadata {
    fn placeholder(title: &str) -> Self {
        Self {
            title: title.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: UNKNOWN_ALBUM.to_string(),
            duration: 0.0,
            duration_str: format_duration(0.0),
        }
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped at the hour.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Read title/artist/album/duration from `path`.
///
/// `fallback_title` is used when the file carries no usable title tag
/// (callers pass the original file stem, not the stored name).
pub fn read_metadata(path: &Path, fallback_title: &str) -> AudioMetadata {
    let mut meta = AudioMetadata::placeholder(fallback_title);

    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            warn!("failed to read metadata from {}: {e}", path.display());
            return meta;
        }
    };

    let secs = tagged.properties().duration().as_secs_f64();
    meta.duration = secs;
    meta.duration_str = format_duration(secs);

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(v) = non_empty(tag.title()) {
            meta.title = v;
        }
        if let Some(v) = non_empty(tag.artist()) {
            meta.artist = v;
        }
        if let Some(v) = non_empty(tag.album()) {
            meta.album = v;
        }
    }

    meta
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn format_duration_pads_and_truncates() {
        assert_eq!(format_duration(0.0), "00:00");
        assert_eq!(format_duration(59.99), "00:59");
        assert_eq!(format_duration(61.0), "01:01");
        assert_eq!(format_duration(185.7), "03:05");
        assert_eq!(format_duration(3600.0), "60:00");
        assert_eq!(format_duration(-3.0), "00:00");
        assert_eq!(format_duration(f64::NAN), "00:00");
    }

    #[test]
    fn unreadable_file_falls_back_to_placeholders() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("abc123.mp3");
        fs::write(&p, b"definitely not audio").unwrap();

        let meta = read_metadata(&p, "My Song");
        assert_eq!(meta.title, "My Song");
        assert_eq!(meta.artist, UNKNOWN_ARTIST);
        assert_eq!(meta.album, UNKNOWN_ALBUM);
        assert_eq!(meta.duration, 0.0);
        assert_eq!(meta.duration_str, "00:00");
    }

    #[test]
    fn missing_file_falls_back_to_placeholders() {
        let meta = read_metadata(Path::new("/nonexistent/cadenza/x.flac"), "x");
        assert_eq!(meta.title, "x");
        assert_eq!(meta.artist, UNKNOWN_ARTIST);
    }

    #[test]
    fn non_empty_trims_and_rejects_blank() {
        assert_eq!(non_empty(Some("  A  ".into())), Some("A".to_string()));
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(None), None);
    }
}
