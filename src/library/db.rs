//! SQLite access for the `music` table.
//!
//! Every catalog operation opens its own short-lived connection; nothing here
//! caches a `Connection`.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::model::{NewTrack, Track};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS music (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    artist TEXT NOT NULL,
    album TEXT NOT NULL,
    filename TEXT NOT NULL,
    file_path TEXT NOT NULL UNIQUE,
    duration REAL NOT NULL,
    duration_str TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    import_time INTEGER NOT NULL,
    is_favorite INTEGER DEFAULT 0
)";

const COLUMNS: &str = "id, title, artist, album, filename, file_path, duration, duration_str, \
                       file_size, import_time, is_favorite";

pub(super) fn open(db_path: &Path) -> rusqlite::Result<Connection> {
    Connection::open(db_path)
}

pub(super) fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

fn track_from_row(row: &Row<'_>) -> rusqlite::Result<Track> {
    let file_path: String = row.get("file_path")?;
    let file_size: i64 = row.get("file_size")?;
    let is_favorite: Option<i64> = row.get("is_favorite")?;
    Ok(Track {
        id: row.get("id")?,
        title: row.get("title")?,
        artist: row.get("artist")?,
        album: row.get("album")?,
        filename: row.get("filename")?,
        file_path: PathBuf::from(file_path),
        duration: row.get("duration")?,
        duration_str: row.get("duration_str")?,
        file_size: u64::try_from(file_size).unwrap_or(0),
        import_time: row.get("import_time")?,
        is_favorite: is_favorite.unwrap_or(0) != 0,
    })
}

/// Insert `track`, ignoring a duplicate `file_path`.
///
/// Returns the new row id, or `None` when the row was ignored.
pub(super) fn insert_or_ignore(conn: &Connection, track: &NewTrack) -> rusqlite::Result<Option<i64>> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO music
            (title, artist, album, filename, file_path, duration, duration_str, file_size, import_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            track.title,
            track.artist,
            track.album,
            track.filename,
            track.file_path.to_string_lossy(),
            track.duration,
            track.duration_str,
            i64::try_from(track.file_size).unwrap_or(i64::MAX),
            track.import_time,
        ],
    )?;
    if changed == 0 {
        Ok(None)
    } else {
        Ok(Some(conn.last_insert_rowid()))
    }
}

/// All rows, most recently imported first.
pub(super) fn select_all(conn: &Connection) -> rusqlite::Result<Vec<Track>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM music ORDER BY import_time DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], track_from_row)?;
    rows.collect()
}

pub(super) fn select_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Track>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM music WHERE id = ?1"),
        params![id],
        track_from_row,
    )
    .optional()
}

pub(super) fn delete_by_id(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM music WHERE id = ?1", params![id])
}

pub(super) fn count(conn: &Connection) -> rusqlite::Result<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM music", [], |row| row.get(0))?;
    Ok(usize::try_from(n).unwrap_or(0))
}
