//! Browser LocalStorage backend

use wasm_bindgen::{JsCast, JsValue};

use super::{StorageError, StoragePort};

/// `window.localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open LocalStorage. `None` outside a window or when access is denied
    /// (e.g. privacy mode, sandboxed iframes).
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { storage })
    }
}

fn to_storage_error(err: JsValue) -> StorageError {
    if let Some(err) = err.dyn_ref::<js_sys::Error>() {
        let name = String::from(err.name());
        if name == "QuotaExceededError" || name == "NS_ERROR_DOM_QUOTA_REACHED" {
            return StorageError::QuotaExceeded;
        }
        return StorageError::Backend(String::from(err.message()));
    }
    StorageError::Backend(err.as_string().unwrap_or_else(|| "Storage error".to_string()))
}

impl StoragePort for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(to_storage_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(to_storage_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(to_storage_error)
    }
}
