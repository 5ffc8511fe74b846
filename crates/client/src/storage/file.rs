//! File-backed state repository.

use std::path::{Path, PathBuf};

use super::{StateRepository, StorageError, validate_key};

/// Stores each blob as `<state_dir>/<key>.json`.
///
/// The directory is created eagerly so later saves only touch one file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// The directory this store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StateRepository for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.blob_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        let path = self.blob_path(key)?;
        // Write-then-rename keeps a crashed write from truncating the blob.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, blob)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        let path = self.blob_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::keys;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("toolcrib-storage-{tag}-{}", std::process::id()))
    }

    #[test]
    fn test_round_trip() {
        let dir = scratch_dir("round-trip");
        let store = FileStore::new(&dir).unwrap();

        assert!(store.load(keys::AUTH_STORAGE).unwrap().is_none());

        store.save(keys::AUTH_STORAGE, r#"{"token":"abc"}"#).unwrap();
        assert_eq!(
            store.load(keys::AUTH_STORAGE).unwrap().as_deref(),
            Some(r#"{"token":"abc"}"#)
        );

        store.clear(keys::AUTH_STORAGE).unwrap();
        assert!(store.load(keys::AUTH_STORAGE).unwrap().is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_overwrites() {
        let dir = scratch_dir("overwrite");
        let store = FileStore::new(&dir).unwrap();

        store.save(keys::CART_STORAGE, "first").unwrap();
        store.save(keys::CART_STORAGE, "second").unwrap();
        assert_eq!(
            store.load(keys::CART_STORAGE).unwrap().as_deref(),
            Some("second")
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_clear_absent_key_is_noop() {
        let dir = scratch_dir("clear-absent");
        let store = FileStore::new(&dir).unwrap();
        store.clear(keys::CART_STORAGE).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rejects_traversal_key() {
        let dir = scratch_dir("traversal");
        let store = FileStore::new(&dir).unwrap();
        assert!(matches!(
            store.save("../outside", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
