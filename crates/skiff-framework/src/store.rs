//! Built-in volatile key-value store.
//!
//! [`MemoryStore`] implements the core's
//! [`KeyValueStore`](skiff_core::KeyValueStore) contract with a plain
//! in-process map. Its contents do not survive a restart — it exists for
//! demos, tests, and bots whose state is genuinely disposable. Anything
//! that must outlive the process belongs in a durable implementation of
//! the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use skiff_core::{KeyValueStore, StoreResult};

/// Volatile, namespace-aware store backed by an in-process map.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys across all namespaces.
    pub fn len(&self) -> usize {
        self.entries.read().values().map(HashMap::len).sum()
    }

    /// Returns `true` if the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, namespace: &str, key: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .entries
            .read()
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned())
    }

    async fn put(&self, namespace: &str, key: &str, value: Value) -> StoreResult<()> {
        self.entries
            .write()
            .entry(namespace.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, namespace: &str, key: &str) -> StoreResult<bool> {
        Ok(self
            .entries
            .write()
            .get_mut(namespace)
            .is_some_and(|ns| ns.remove(key).is_some()))
    }
}
