//! In-process object store.
//!
//! Keeps a set of keys and a log of every call, and can be told to fail
//! copies or deletes to exercise partial-failure paths.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::StorageError;
use crate::store::ObjectStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Copy { source: String, dest: String },
    Delete { key: String },
}

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeSet<String>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_copies: AtomicBool,
    fail_deletes: AtomicBool,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an object, as a browser upload would.
    pub fn put(&self, key: &str) {
        locked(&self.objects).insert(key.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        locked(&self.objects).contains(key)
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        locked(&self.calls).clone()
    }

    pub fn fail_copies(&self, fail: bool) {
        self.fail_copies.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn copy_object(&self, source_key: &str, dest_key: &str) -> Result<(), StorageError> {
        locked(&self.calls).push(StoreCall::Copy {
            source: source_key.to_string(),
            dest: dest_key.to_string(),
        });
        if self.fail_copies.load(Ordering::SeqCst) {
            return Err(StorageError::RequestFailed {
                status: 500,
                body: "InternalError".to_string(),
            });
        }

        let mut objects = locked(&self.objects);
        if !objects.contains(source_key) {
            return Err(StorageError::RequestFailed {
                status: 404,
                body: "NoSuchKey".to_string(),
            });
        }
        objects.insert(dest_key.to_string());
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        locked(&self.calls).push(StoreCall::Delete {
            key: key.to_string(),
        });
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::RequestFailed {
                status: 403,
                body: "AccessDenied".to_string(),
            });
        }
        locked(&self.objects).remove(key);
        Ok(())
    }
}
