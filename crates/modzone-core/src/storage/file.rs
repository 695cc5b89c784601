//! File-per-key backend
//!
//! Each key is stored as `<dir>/<key>.json`. Writes are atomic (write to a
//! temp file, then rename) so a value is never left partially written.
//!
//! Storage location: `~/.local/share/modzone/storage/` (configurable via
//! `Config`)

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::backend::{validate_key, KeyValueBackend};
use super::error::{StorageError, StorageResult};

const EXTENSION: &str = "json";

/// Key-value backend that keeps one file per key in a directory
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (and create if needed) a backend rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDirectory {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the value files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file that holds `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, EXTENSION))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::from_read_io(e, path)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        atomic_write(&self.path_for(key), value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(e, path)),
        }
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let entries =
            fs::read_dir(&self.dir).map_err(|e| StorageError::from_read_io(e, self.dir.clone()))?;

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = FileBackend::open(temp_dir.path()).unwrap();

        assert!(backend.get("modzone_games").unwrap().is_none());

        backend.set("modzone_games", "[]").unwrap();
        assert_eq!(backend.get("modzone_games").unwrap().as_deref(), Some("[]"));
        assert!(backend.path_for("modzone_games").exists());
    }

    #[test]
    fn test_overwrite_replaces_whole_value() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = FileBackend::open(temp_dir.path()).unwrap();

        backend.set("k", "a much longer first value").unwrap();
        backend.set("k", "short").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("short"));
        assert!(!backend.path_for("k").with_extension("tmp").exists());
    }

    #[test]
    fn test_remove_and_keys() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = FileBackend::open(temp_dir.path()).unwrap();

        backend.set("b", "2").unwrap();
        backend.set("a", "1").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();
        assert_eq!(backend.keys().unwrap(), vec!["a", "b"]);

        backend.remove("a").unwrap();
        backend.remove("missing").unwrap();
        assert_eq!(backend.keys().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = FileBackend::open(temp_dir.path()).unwrap();

        assert!(matches!(
            backend.set("../outside", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(backend.get("a/b").is_err());
    }

    #[test]
    fn test_open_creates_nested_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b").join("storage");

        let mut backend = FileBackend::open(&nested).unwrap();
        backend.set("k", "v").unwrap();

        assert!(nested.join("k.json").exists());
        assert_eq!(backend.location(), nested.display().to_string());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("x").join("y").join("file.json");

        atomic_write(&nested_path, b"test data").unwrap();

        let content = fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "test data");
    }
}
