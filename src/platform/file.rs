//! File-backed storage for native builds
//!
//! Each key is one file `<dir>/<key>.json`. The directory is created on the
//! first write.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{StorageError, StoragePort};

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Map a storage key onto a safe file stem
fn sanitize_key(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    // Keep "." and ".." out of the path
    if stem.chars().all(|c| c == '.') {
        format!("_{stem}")
    } else {
        stem
    }
}

fn map_io(err: std::io::Error) -> StorageError {
    if err.kind() == ErrorKind::StorageFull {
        StorageError::QuotaExceeded
    } else {
        StorageError::Io(err)
    }
}

impl StoragePort for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(map_io)?;
        let path = self.path_for(key);
        // Write then rename so a failed write never truncates the old record
        let tmp = path.with_extension("json.tmp");
        let written = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(map_io(e));
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("vdfmi.appState.v1"), "vdfmi.appState.v1");
        assert_eq!(sanitize_key("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_key(".."), "_..");
        assert_eq!(sanitize_key("a b/c"), "a_b_c");
    }

    #[test]
    fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("store"));
        assert_eq!(storage.get_item("nope").unwrap(), None);
        // Removing from a directory that doesn't exist yet is fine
        storage.remove_item("nope").unwrap();
    }

    #[test]
    fn test_write_read_overwrite_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("store"));

        storage.set_item("app", "{\"a\":1}").unwrap();
        assert!(storage.path_for("app").exists());
        assert_eq!(storage.get_item("app").unwrap().as_deref(), Some("{\"a\":1}"));

        storage.set_item("app", "{\"a\":2}").unwrap();
        assert_eq!(storage.get_item("app").unwrap().as_deref(), Some("{\"a\":2}"));
        assert!(!storage.path_for("app").with_extension("json.tmp").exists());

        storage.remove_item("app").unwrap();
        assert_eq!(storage.get_item("app").unwrap(), None);
        storage.remove_item("app").unwrap();
    }

    #[test]
    fn test_failed_rename_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        // A non-empty directory where the record file should go blocks the rename
        let target = storage.path_for("app");
        fs::create_dir_all(target.join("occupied")).unwrap();

        assert!(storage.set_item("app", "{}").is_err());
        assert!(!target.with_extension("json.tmp").exists());
        assert!(target.is_dir());
    }
}
