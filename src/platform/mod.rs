//! Platform abstraction layer
//!
//! Key-value storage behind a `getItem`/`setItem`/`removeItem` port:
//! - `MemoryStorage`: in-process map (tests, headless runs)
//! - `LocalStorage`: browser LocalStorage (wasm32 only)
//! - `FileStorage`: one JSON file per key (native only)

mod memory;
pub use memory::MemoryStorage;

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::config::Config;

/// Failure reported by a storage backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No storage mechanism exists in this environment
    #[error("storage unavailable")]
    Unavailable,

    /// The backend refused the write (browser quota, disk full)
    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Exception text reported by the browser
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// String key-value store, modeled on the Web Storage API
pub trait StoragePort {
    /// Read the value under `key`, `None` when no record exists
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: StoragePort + ?Sized> StoragePort for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Persistent storage for the current target
#[cfg(target_arch = "wasm32")]
pub type PlatformStorage = LocalStorage;

/// Persistent storage for the current target
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = FileStorage;

/// Open the persistent storage for the current target, `None` if there is none
#[cfg(target_arch = "wasm32")]
pub fn detect(_config: &Config) -> Option<PlatformStorage> {
    LocalStorage::open()
}

/// Open the persistent storage for the current target, `None` if there is none
#[cfg(not(target_arch = "wasm32"))]
pub fn detect(config: &Config) -> Option<PlatformStorage> {
    let dir = config.resolved_data_dir()?;
    Some(FileStorage::new(dir))
}
