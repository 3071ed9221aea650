// ============================================================================
// Cursor Drain
// ============================================================================
//
// Consumes a range-scan cursor into an ordered list of key/record pairs.
//
// Lifecycle:
// ```text
// Open ──first fetch──> Draining ──done / failure / limit──> Closed
//                         │  ▲
//                         └──┘ next fetch
// ```
//
// The cursor is released exactly once on every exit path out of `drain`.
// Payloads that do not decode as a gadget are kept as raw text.
//
// ============================================================================

use crate::core::{Gadget, LedgerError, Result};
use crate::store::{CursorStep, StateCursor};
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

/// Where a [`CursorDrain`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainState {
    /// Cursor acquired, nothing fetched yet.
    Open,
    /// At least one fetch issued; more may follow.
    Draining,
    /// Cursor released. Terminal.
    Closed,
}

/// Record half of a range query entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryRecord {
    Decoded(Gadget),
    /// The stored payload, verbatim, when it is not a gadget.
    Raw(String),
}

impl QueryRecord {
    pub fn as_gadget(&self) -> Option<&Gadget> {
        match self {
            QueryRecord::Decoded(gadget) => Some(gadget),
            QueryRecord::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, QueryRecord::Raw(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResultEntry {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: QueryRecord,
}

pub struct CursorDrain {
    cursor: Box<dyn StateCursor>,
    state: DrainState,
    doc_type: String,
    limit: Option<usize>,
}

impl CursorDrain {
    pub fn new(cursor: Box<dyn StateCursor>, doc_type: impl Into<String>) -> Self {
        Self {
            cursor,
            state: DrainState::Open,
            doc_type: doc_type.into(),
            limit: None,
        }
    }

    /// Stop after `limit` accepted entries. The cursor is still released.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn state(&self) -> DrainState {
        self.state
    }

    /// Drains the cursor to completion and releases it.
    ///
    /// A failure while fetching wins over a failure while closing; either way
    /// the close has been attempted exactly once before this returns.
    pub async fn drain(mut self) -> Result<Vec<QueryResultEntry>> {
        let outcome = self.fill().await;
        let released = self.release().await;

        match (outcome, released) {
            (Ok(entries), Ok(())) => Ok(entries),
            (Err(err), released) => {
                if let Err(close_err) = released {
                    event!(Level::ERROR, error = %close_err, "cursor close failed after drain failure");
                }
                Err(err)
            }
            (Ok(_), Err(close_err)) => Err(close_err),
        }
    }

    async fn fill(&mut self) -> Result<Vec<QueryResultEntry>> {
        let mut results = Vec::new();
        loop {
            if self.limit.is_some_and(|limit| results.len() >= limit) {
                event!(Level::INFO, returned = results.len(), "range query truncated at limit");
                return Ok(results);
            }

            let step = self.fetch().await?;
            if let Some(entry) = step.entry {
                if !entry.value.is_empty() {
                    results.push(self.decode_entry(entry.key, &entry.value));
                }
            }
            if step.done {
                return Ok(results);
            }
        }
    }

    async fn fetch(&mut self) -> Result<CursorStep> {
        match self.state {
            DrainState::Closed => return Err(LedgerError::store("fetch on a released cursor")),
            DrainState::Open => {
                event!(Level::DEBUG, "cursor draining");
                self.state = DrainState::Draining;
            }
            DrainState::Draining => {}
        }
        self.cursor.next().await
    }

    fn decode_entry(&self, key: String, value: &[u8]) -> QueryResultEntry {
        let record = match Gadget::decode(value, &self.doc_type) {
            Ok(gadget) => QueryRecord::Decoded(gadget),
            Err(err) => {
                event!(Level::WARN, key = %key, error = %err, "keeping undecodable record as raw text");
                QueryRecord::Raw(String::from_utf8_lossy(value).into_owned())
            }
        };
        QueryResultEntry { key, record }
    }

    async fn release(&mut self) -> Result<()> {
        if self.state == DrainState::Closed {
            return Ok(());
        }
        self.state = DrainState::Closed;
        event!(Level::DEBUG, "cursor closed");
        self.cursor.close().await
    }
}

impl Drop for CursorDrain {
    fn drop(&mut self) {
        if self.state != DrainState::Closed {
            event!(Level::WARN, state = ?self.state, "cursor dropped without being released");
        }
    }
}

/// Drains `cursor` with no entry limit.
pub async fn drain_cursor(
    cursor: Box<dyn StateCursor>,
    doc_type: &str,
) -> Result<Vec<QueryResultEntry>> {
    CursorDrain::new(cursor, doc_type).drain().await
}
