//! In-memory state repository for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{StateRepository, StorageError, validate_key};

/// Map-backed repository with the same contract as [`super::FileStore`].
///
/// Nothing survives the process; tests use this to exercise persistence
/// behavior without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.lock().expect("storage lock poisoned").len()
    }

    /// Whether the store holds no blobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateRepository for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self
            .blobs
            .lock()
            .expect("storage lock poisoned")
            .get(key)
            .cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.blobs
            .lock()
            .expect("storage lock poisoned")
            .insert(key.to_owned(), blob.to_owned());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.blobs.lock().expect("storage lock poisoned").remove(key);
        Ok(())
    }
}
