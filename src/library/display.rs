use crate::config::TrackDisplayField;

use super::model::Track;

/// Build a one-line description of `track` from the configured `fields`.
///
/// Blank fields are skipped; when nothing is produced the title is used.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        let part = match f {
            TrackDisplayField::Id => format!("#{}", track.id),
            TrackDisplayField::Title => track.title.trim().to_string(),
            TrackDisplayField::Artist => track.artist.trim().to_string(),
            TrackDisplayField::Album => track.album.trim().to_string(),
            TrackDisplayField::Filename => track.filename.clone(),
            TrackDisplayField::Path => track.file_path.display().to_string(),
            TrackDisplayField::Duration => track.duration_str.clone(),
        };
        if !part.trim().is_empty() {
            parts.push(part);
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}
