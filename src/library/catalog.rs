use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;
use tracing::{debug, error, info, warn};

use crate::config::StorageSettings;

use super::db;
use super::error::CatalogError;
use super::metadata::read_metadata;
use super::model::{NewTrack, Track};
use super::store::{copy_into, file_info};

/// Current time in epoch seconds.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Owns the persisted track table and the stored copies behind it.
///
/// Public operations never return an error except `initialize`: failures are
/// logged and turned into a partial result, `None` or `false`.
#[derive(Debug, Clone)]
pub struct Catalog {
    base_dir: PathBuf,
    music_dir: PathBuf,
    db_path: PathBuf,
    now: fn() -> i64,
}

impl Catalog {
    /// Build a catalog from the storage settings. A relative base directory
    /// is resolved against the current directory so persisted paths are
    /// always absolute.
    pub fn new(settings: &StorageSettings) -> Self {
        let configured = settings.resolved_base_dir();
        let base_dir = std::path::absolute(&configured).unwrap_or(configured);
        Self {
            music_dir: base_dir.join(&settings.music_dir_name),
            db_path: base_dir.join(&settings.database_file),
            base_dir,
            now: unix_now,
        }
    }

    /// A catalog rooted at `base_dir` with default directory and file names.
    #[cfg(test)]
    pub fn at(base_dir: impl Into<PathBuf>) -> Self {
        Self::new(&StorageSettings {
            base_dir: Some(base_dir.into()),
            ..StorageSettings::default()
        })
    }

    /// Replace the clock used to stamp `import_time`.
    #[cfg(test)]
    pub fn with_clock(mut self, now: fn() -> i64) -> Self {
        self.now = now;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn music_dir(&self) -> &Path {
        &self.music_dir
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection, CatalogError> {
        Ok(db::open(&self.db_path)?)
    }

    /// Create the storage directories and the table if missing. Safe to call
    /// on every startup.
    pub fn initialize(&self) -> Result<(), CatalogError> {
        fs::create_dir_all(&self.base_dir)?;
        fs::create_dir_all(&self.music_dir)?;
        let conn = self.connect()?;
        db::create_schema(&conn)?;
        debug!("catalog ready at {}", self.db_path.display());
        Ok(())
    }

    /// Import every path independently and return the records that were
    /// newly inserted. Duplicates and failures are skipped.
    pub fn add<P: AsRef<Path>>(&self, sources: &[P]) -> Vec<Track> {
        let mut added = Vec::new();
        for source in sources {
            let source = source.as_ref();
            match self.import_one(source) {
                Ok(Some(track)) => {
                    info!("imported {} as #{} ({})", source.display(), track.id, track.title);
                    added.push(track);
                }
                Ok(None) => debug!("skipping duplicate: {}", source.display()),
                Err(e) => warn!("failed to import {}: {e}", source.display()),
            }
        }
        added
    }

    fn import_one(&self, source: &Path) -> Result<Option<Track>, CatalogError> {
        let stored = copy_into(source, &self.music_dir)?;
        let info = file_info(&stored)?;

        let fallback_title = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| info.filename.clone());
        let meta = read_metadata(&stored, &fallback_title);

        let record = NewTrack {
            title: meta.title,
            artist: meta.artist,
            album: meta.album,
            filename: info.filename,
            file_path: stored,
            duration: meta.duration,
            duration_str: meta.duration_str,
            file_size: info.size,
            import_time: (self.now)(),
        };

        let conn = self.connect()?;
        let id = db::insert_or_ignore(&conn, &record)?;
        Ok(id.map(|id| record.with_id(id)))
    }

    /// Every record, most recently imported first.
    pub fn list_all(&self) -> Vec<Track> {
        let result = self.connect().and_then(|conn| Ok(db::select_all(&conn)?));
        match result {
            Ok(tracks) => tracks,
            Err(e) => {
                error!("failed to list catalog: {e}");
                Vec::new()
            }
        }
    }

    pub fn get_by_id(&self, id: i64) -> Option<Track> {
        let result = self.connect().and_then(|conn| Ok(db::select_by_id(&conn, id)?));
        match result {
            Ok(track) => track,
            Err(e) => {
                error!("failed to look up track #{id}: {e}");
                None
            }
        }
    }

    /// Number of stored records (0 when the store cannot be read).
    pub fn len(&self) -> usize {
        let result = self.connect().and_then(|conn| Ok(db::count(&conn)?));
        result.unwrap_or_else(|e| {
            error!("failed to count catalog: {e}");
            0
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove the row for `id`, then its stored file.
    ///
    /// Returns `false` when the id is unknown, or when anything fails. A file
    /// removal failure happens after the row is already gone.
    pub fn delete(&self, id: i64) -> bool {
        match self.try_delete(id) {
            Ok(deleted) => deleted,
            Err(e) => {
                error!("failed to delete track #{id}: {e}");
                false
            }
        }
    }

    fn try_delete(&self, id: i64) -> Result<bool, CatalogError> {
        let conn = self.connect()?;
        let Some(track) = db::select_by_id(&conn, id)? else {
            debug!("delete: no track #{id}");
            return Ok(false);
        };

        db::delete_by_id(&conn, id)?;
        drop(conn);

        if track.file_path.exists() {
            fs::remove_file(&track.file_path)?;
        }

        info!("deleted #{id} ({})", track.title);
        Ok(true)
    }
}
