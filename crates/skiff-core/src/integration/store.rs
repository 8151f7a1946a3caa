//! External key-value state contract.
//!
//! The core is stateless between events: nothing a handler keeps in memory
//! is promised to survive the next event, let alone a process restart.
//! State a handler needs across events goes through this explicit,
//! swappable collaborator instead of ad-hoc process-resident maps, which
//! makes cold-start semantics a stated contract.
//!
//! A built-in volatile implementation lives in `skiff-framework`
//! (`MemoryStore`); durable backends are the bot author's choice.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors a store operation can produce.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be used as requested.
    #[error("stored value is not usable: {0}")]
    Invalid(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Namespaced key-value storage injected into handlers.
///
/// Namespaces keep independent handlers (polls, workflows, counters) from
/// colliding on key names. Values are JSON so any serde-serializable state
/// fits.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value, or `None` if the key is absent.
    async fn get(&self, namespace: &str, key: &str) -> StoreResult<Option<Value>>;

    /// Writes a value, replacing any previous one.
    async fn put(&self, namespace: &str, key: &str, value: Value) -> StoreResult<()>;

    /// Deletes a key, returning whether it existed.
    async fn delete(&self, namespace: &str, key: &str) -> StoreResult<bool>;
}

/// A shared, type-erased store.
pub type BoxedStore = Arc<dyn KeyValueStore>;
