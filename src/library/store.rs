//! File store: copies sources into the application-owned music directory.
//!
//! Stored names are derived from the file content (SHA-256, truncated) plus
//! the lower-cased original extension, so distinct files never collide and a
//! byte-identical re-import lands on the same path.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::error::CatalogError;

/// Number of digest bytes kept in a stored name (32 hex chars).
const NAME_DIGEST_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub filename: String,
    pub size: u64,
}

fn content_digest(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    let digest = hasher.finalize();
    Ok(hex::encode(&digest[..NAME_DIGEST_BYTES]))
}

fn stored_name(digest: &str, source: &Path) -> String {
    let mut name = digest.to_string();
    if let Some(ext) = source.extension().and_then(OsStr::to_str) {
        name.push('.');
        name.push_str(&ext.to_ascii_lowercase());
    }
    name
}

/// Copy `source` into `target_dir` and return the stored path.
///
/// The copy is written under a temporary name and renamed into place, so a
/// stored path never holds a partial file. An existing stored file is kept
/// only when its content still matches the source; otherwise it is replaced.
pub fn copy_into(source: &Path, target_dir: &Path) -> Result<PathBuf, CatalogError> {
    if !source.exists() {
        return Err(CatalogError::SourceMissing(source.to_path_buf()));
    }
    if !source.is_file() {
        return Err(CatalogError::NotAFile(source.to_path_buf()));
    }

    fs::create_dir_all(target_dir)?;
    let digest = content_digest(source)?;
    let name = stored_name(&digest, source);
    let target = target_dir.join(&name);

    if target.is_file() && content_digest(&target).is_ok_and(|d| d == digest) {
        return Ok(target);
    }

    let partial = target_dir.join(format!(".{name}.part"));
    if let Err(e) = fs::copy(source, &partial).and_then(|_| fs::rename(&partial, &target)) {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }
    Ok(target)
}

/// Basename and byte size of a stored file.
pub fn file_info(path: &Path) -> Result<FileInfo, CatalogError> {
    let size = fs::metadata(path)?.len();
    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(FileInfo { filename, size })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copy_into_names_by_content_and_keeps_extension_lowercase() {
        let src_dir = tempdir().unwrap();
        let store = tempdir().unwrap();
        let a = src_dir.path().join("Song.MP3");
        fs::write(&a, b"same bytes").unwrap();

        let stored = copy_into(&a, store.path()).unwrap();
        let name = stored.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with(".mp3"));
        assert_eq!(name.len(), 32 + ".mp3".len());
        assert_eq!(fs::read(&stored).unwrap(), b"same bytes");
        assert!(a.exists(), "source must be left in place");
    }

    #[test]
    fn identical_content_maps_to_same_path_and_distinct_content_does_not() {
        let src_dir = tempdir().unwrap();
        let store = tempdir().unwrap();
        let a = src_dir.path().join("a.flac");
        let b = src_dir.path().join("b.flac");
        let c = src_dir.path().join("c.flac");
        fs::write(&a, b"one").unwrap();
        fs::write(&b, b"one").unwrap();
        fs::write(&c, b"two").unwrap();

        let pa = copy_into(&a, store.path()).unwrap();
        let pb = copy_into(&b, store.path()).unwrap();
        let pc = copy_into(&c, store.path()).unwrap();
        assert_eq!(pa, pb);
        assert_ne!(pa, pc);
        assert_eq!(fs::read_dir(store.path()).unwrap().count(), 2);
    }

    #[test]
    fn copy_into_replaces_a_truncated_stored_file() {
        let src_dir = tempdir().unwrap();
        let store = tempdir().unwrap();
        let a = src_dir.path().join("a.mp3");
        fs::write(&a, b"the complete audio payload").unwrap();

        let first = copy_into(&a, store.path()).unwrap();
        fs::write(&first, b"the c").unwrap();

        let again = copy_into(&a, store.path()).unwrap();
        assert_eq!(again, first);
        assert_eq!(fs::read(&again).unwrap(), b"the complete audio payload");
        assert_eq!(file_info(&again).unwrap().size, 26);
        assert_eq!(fs::read_dir(store.path()).unwrap().count(), 1, "no temp file left behind");
    }

    #[test]
    fn copy_into_keeps_a_matching_stored_file() {
        let src_dir = tempdir().unwrap();
        let store = tempdir().unwrap();
        let a = src_dir.path().join("a.ogg");
        fs::write(&a, b"bytes").unwrap();

        let first = copy_into(&a, store.path()).unwrap();
        let before = fs::metadata(&first).unwrap().modified().unwrap();
        let again = copy_into(&a, store.path()).unwrap();
        assert_eq!(again, first);
        assert_eq!(fs::metadata(&again).unwrap().modified().unwrap(), before);
    }

    #[test]
    fn copy_into_creates_missing_target_dir() {
        let src_dir = tempdir().unwrap();
        let base = tempdir().unwrap();
        let target = base.path().join("nested").join("music_files");
        let a = src_dir.path().join("a.wav");
        fs::write(&a, b"x").unwrap();

        let stored = copy_into(&a, &target).unwrap();
        assert!(stored.starts_with(&target));
        assert!(stored.exists());
    }

    #[test]
    fn copy_into_rejects_missing_source_and_directories() {
        let store = tempdir().unwrap();
        let missing = store.path().join("nope.mp3");
        assert!(matches!(
            copy_into(&missing, store.path()),
            Err(CatalogError::SourceMissing(_))
        ));
        assert!(matches!(
            copy_into(store.path(), store.path()),
            Err(CatalogError::NotAFile(_))
        ));
    }

    #[test]
    fn file_info_reports_basename_and_size() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("abc.ogg");
        fs::write(&p, b"12345").unwrap();
        assert_eq!(
            file_info(&p).unwrap(),
            FileInfo {
                filename: "abc.ogg".into(),
                size: 5
            }
        );
    }
}
