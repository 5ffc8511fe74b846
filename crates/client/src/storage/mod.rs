//! Durable client state repository.
//!
//! Both stateful stores (session, cart) persist themselves as JSON blobs
//! under well-known keys, mirroring the key/value storage the application
//! has always used. The repository is a trait so production code can write
//! files while tests substitute [`MemoryStore`].
//!
//! Writes are fire-and-forget from the stores' perspective: a failed save is
//! logged and the in-memory state stays authoritative for the process.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// Blob holding the persisted session (identity and tokens).
    pub const AUTH_STORAGE: &str = "auth-storage";
    /// Blob holding the persisted cart lines.
    pub const CART_STORAGE: &str = "cart-storage";
}

/// Errors that can occur when touching durable state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A key contained characters that cannot form a file name.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Durable key/value repository for client state blobs.
///
/// Implementations must be cheap to call from synchronous store mutations;
/// the file-backed store writes small local files and the in-memory fake is
/// a map behind a lock.
pub trait StateRepository: Send + Sync {
    /// Load the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying read fails. A missing blob
    /// is `Ok(None)`, not an error.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Persist `blob` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying write fails.
    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError>;

    /// Remove the blob stored under `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying removal fails.
    fn clear(&self, key: &str) -> Result<(), StorageError>;
}

/// Reject keys that would escape the state directory.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty()
        || key
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
    {
        return Err(StorageError::InvalidKey(key.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_known_keys() {
        assert!(validate_key(keys::AUTH_STORAGE).is_ok());
        assert!(validate_key(keys::CART_STORAGE).is_ok());
    }

    #[test]
    fn test_validate_key_rejects_path_traversal() {
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("").is_err());
    }
}
