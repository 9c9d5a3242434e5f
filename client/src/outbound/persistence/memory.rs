//! In-memory key-value adapter for tests and headless use.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError, Namespace};

/// Volatile key-value adapter backed by a map.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<&'static str, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<&'static str, String>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, namespace: Namespace) -> Result<Option<String>, KeyValueStoreError> {
        Ok(self.lock().get(namespace.as_str()).cloned())
    }

    async fn put(&self, namespace: Namespace, value: &str) -> Result<(), KeyValueStoreError> {
        self.lock().insert(namespace.as_str(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, namespace: Namespace) -> Result<(), KeyValueStoreError> {
        self.lock().remove(namespace.as_str());
        Ok(())
    }
}
