use std::path::PathBuf;

/// One imported audio file, as persisted in the `music` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Basename of the stored copy.
    pub filename: String,
    /// Absolute path of the stored copy. Unique across the catalog.
    pub file_path: PathBuf,
    /// Duration in seconds.
    pub duration: f64,
    /// Duration formatted as `MM:SS`.
    pub duration_str: String,
    pub file_size: u64,
    /// Import timestamp, epoch seconds.
    pub import_time: i64,
    pub is_favorite: bool,
}

impl Track {
    /// Whole seconds of playback, truncated.
    pub fn duration_secs(&self) -> u64 {
        if self.duration.is_finite() && self.duration > 0.0 {
            self.duration as u64
        } else {
            0
        }
    }
}

/// A record ready for insertion; the database assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub filename: String,
    pub file_path: PathBuf,
    pub duration: f64,
    pub duration_str: String,
    pub file_size: u64,
    pub import_time: i64,
}

impl NewTrack {
    pub fn with_id(self, id: i64) -> Track {
        Track {
            id,
            title: self.title,
            artist: self.artist,
            album: self.album,
            filename: self.filename,
            file_path: self.file_path,
            duration: self.duration,
            duration_str: self.duration_str,
            file_size: self.file_size,
            import_time: self.import_time,
            is_favorite: false,
        }
    }
}
