//! Record store client boundary.
//!
//! The contract never owns ledger state; it only talks to a [`RecordStore`].
//! Every call is a suspension point, and range scans hand back a
//! [`StateCursor`] that must be closed by whoever opened it.

pub mod memory;

pub use memory::{InMemoryStore, StoreSnapshot, StoreStats};

use crate::core::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One key/value pair delivered by a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Result of a single `next()` on a cursor.
///
/// A step may carry an entry and signal `done` at the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorStep {
    pub entry: Option<KeyValue>,
    pub done: bool,
}

impl CursorStep {
    pub fn entry(entry: KeyValue, done: bool) -> Self {
        Self {
            entry: Some(entry),
            done,
        }
    }

    pub fn exhausted() -> Self {
        Self {
            entry: None,
            done: true,
        }
    }
}

/// Stateful handle over an ordered range of store entries.
#[async_trait]
pub trait StateCursor: Send {
    /// Fetch the next entry in ascending key order.
    async fn next(&mut self) -> Result<CursorStep>;

    /// Release the cursor at the store.
    async fn close(&mut self) -> Result<()>;
}

/// Versioned key-value store the contract reads and writes.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the stored bytes, or an empty vector when the key is absent.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Removes the key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Opens a cursor over `[start_key, end_key)`.
    async fn range_scan(&self, start_key: &str, end_key: &str) -> Result<Box<dyn StateCursor>>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key).await
    }

    async fn range_scan(&self, start_key: &str, end_key: &str) -> Result<Box<dyn StateCursor>> {
        (**self).range_scan(start_key, end_key).await
    }
}
