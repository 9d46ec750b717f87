use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{KeyValueStore, StoreError};

/// Non-durable store, for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a value is stored under `key`.
    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Internal("lock poisoned".into()))?;
        Ok(entries.contains_key(key))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Internal("lock poisoned".into()))?;
        entries.insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Internal("lock poisoned".into()))?;
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}
