use super::{CursorStep, KeyValue, RecordStore, StateCursor};
use crate::core::{LedgerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Current on-disk format of [`StoreSnapshot`].
pub const STORE_SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Cursor bookkeeping, shared between the store and the cursors it hands out.
#[derive(Debug, Default)]
struct CursorCounters {
    opened: AtomicU64,
    closed: AtomicU64,
}

/// Point-in-time copy of the cursor counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub cursors_opened: u64,
    pub cursors_closed: u64,
}

impl StoreStats {
    /// Cursors handed out and not yet closed.
    pub fn open_cursors(&self) -> u64 {
        self.cursors_opened.saturating_sub(self.cursors_closed)
    }
}

/// Serializable copy of the whole keyspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub format_version: u32,
    pub entries: BTreeMap<String, Vec<u8>>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            format_version: STORE_SNAPSHOT_FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Ordered in-memory keyspace implementing [`RecordStore`].
///
/// Range scans copy the matching entries when the cursor is opened, so a
/// cursor sees a stable view even if writes land while it is being drained.
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    counters: Arc<CursorCounters>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            counters: Arc::new(CursorCounters::default()),
        }
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        if snapshot.format_version != STORE_SNAPSHOT_FORMAT_VERSION {
            return Err(LedgerError::store(format!(
                "unsupported snapshot format version {} (expected {})",
                snapshot.format_version, STORE_SNAPSHOT_FORMAT_VERSION
            )));
        }
        Ok(Self {
            entries: RwLock::new(snapshot.entries),
            counters: Arc::new(CursorCounters::default()),
        })
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        let entries = self.entries.read().await;
        StoreSnapshot {
            format_version: STORE_SNAPSHOT_FORMAT_VERSION,
            entries: entries.clone(),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            cursors_opened: self.counters.opened.load(Ordering::SeqCst),
            cursors_closed: self.counters.closed.load(Ordering::SeqCst),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned().unwrap_or_default())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        if key.is_empty() {
            return Err(LedgerError::store("key must not be empty"));
        }
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn range_scan(&self, start_key: &str, end_key: &str) -> Result<Box<dyn StateCursor>> {
        let entries = self.entries.read().await;

        // An empty end key leaves the range open-ended. An inverted range
        // would make BTreeMap::range panic, so it yields nothing instead.
        let upper = if end_key.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end_key.to_string())
        };
        let inverted = !end_key.is_empty() && start_key >= end_key;
        let pending: VecDeque<KeyValue> = if inverted {
            VecDeque::new()
        } else {
            entries
                .range((Bound::Included(start_key.to_string()), upper))
                .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
                .collect()
        };

        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryCursor {
            pending,
            closed: false,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct MemoryCursor {
    pending: VecDeque<KeyValue>,
    closed: bool,
    counters: Arc<CursorCounters>,
}

#[async_trait]
impl StateCursor for MemoryCursor {
    async fn next(&mut self) -> Result<CursorStep> {
        if self.closed {
            return Err(LedgerError::store("cursor is closed"));
        }
        match self.pending.pop_front() {
            Some(entry) => Ok(CursorStep::entry(entry, self.pending.is_empty())),
            None => Ok(CursorStep::exhausted()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        // Every close call is counted so double releases show up in stats.
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        self.closed = true;
        self.pending.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        for key in ["a", "b", "c", "d"] {
            store.put(key, key.as_bytes().to_vec()).await.unwrap();
        }
        store
    }

    async fn collect(mut cursor: Box<dyn StateCursor>) -> Vec<String> {
        let mut keys = Vec::new();
        loop {
            let step = cursor.next().await.unwrap();
            if let Some(entry) = step.entry {
                keys.push(entry.key);
            }
            if step.done {
                break;
            }
        }
        cursor.close().await.unwrap();
        keys
    }

    #[tokio::test]
    async fn test_get_absent_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_absent_is_ok() {
        let store = InMemoryStore::new();
        store.delete("missing").await.unwrap();
        store.delete("missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_range_is_half_open() {
        let store = seeded().await;
        let cursor = store.range_scan("b", "d").await.unwrap();
        assert_eq!(collect(cursor).await, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_empty_end_key_is_unbounded() {
        let store = seeded().await;
        let cursor = store.range_scan("c", "").await.unwrap();
        assert_eq!(collect(cursor).await, vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_inverted_range_is_empty() {
        let store = seeded().await;
        let cursor = store.range_scan("d", "a").await.unwrap();
        assert!(collect(cursor).await.is_empty());
        let cursor = store.range_scan("b", "b").await.unwrap();
        assert!(collect(cursor).await.is_empty());
    }

    #[tokio::test]
    async fn test_cursor_stats_and_closed_cursor() {
        let store = seeded().await;
        let mut cursor = store.range_scan("a", "z").await.unwrap();
        assert_eq!(store.stats().open_cursors(), 1);
        cursor.close().await.unwrap();
        assert!(cursor.next().await.is_err());
        assert_eq!(
            store.stats(),
            StoreStats {
                cursors_opened: 1,
                cursors_closed: 1
            }
        );
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let store = seeded().await;
        let snapshot = store.snapshot().await;
        let restored = InMemoryStore::from_snapshot(snapshot.clone()).unwrap();
        assert_eq!(restored.snapshot().await, snapshot);
        assert_eq!(restored.len().await, 4);

        let mut bad = snapshot;
        bad.format_version = 99;
        assert!(InMemoryStore::from_snapshot(bad).is_err());
    }
}
