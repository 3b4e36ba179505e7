//! In-memory storage with failure injection

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{StorageError, StoragePort};

#[derive(Debug, Default)]
struct Inner {
    items: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    fail_removes: bool,
}

/// `HashMap`-backed storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `get_item` fail
    pub fn fail_reads(&self, fail: bool) {
        self.inner.borrow_mut().fail_reads = fail;
    }

    /// Make every `set_item` fail as if the quota were exhausted
    pub fn fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    /// Make every `remove_item` fail
    pub fn fail_removes(&self, fail: bool) {
        self.inner.borrow_mut().fail_removes = fail;
    }

    /// Raw value under `key`, bypassing injected failures
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().items.get(key).cloned()
    }

    /// Store raw text under `key`, bypassing injected failures
    pub fn insert_raw(&self, key: &str, value: impl Into<String>) {
        self.inner
            .borrow_mut()
            .items
            .insert(key.to_string(), value.into());
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }
}

impl StoragePort for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.inner.borrow();
        if inner.fail_reads {
            return Err(StorageError::Backend("read blocked".to_string()));
        }
        Ok(inner.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(StorageError::QuotaExceeded);
        }
        inner.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_removes {
            return Err(StorageError::Backend("remove blocked".to_string()));
        }
        inner.items.remove(key);
        Ok(())
    }
}
