// ============================================================================
// Gadget Ledger Library
// ============================================================================

pub mod contract;
pub mod core;
pub mod query;
pub mod store;

// Re-export main types for convenience
pub use contract::{ContractConfig, GadgetContract, Invocation, OPERATIONS, Operation, Response};
pub use core::{DEFAULT_DOC_TYPE, Gadget, LedgerError, Result};
pub use query::{CursorDrain, DrainState, QueryRecord, QueryResultEntry, drain_cursor};
pub use store::{
    CursorStep, InMemoryStore, KeyValue, RecordStore, StateCursor, StoreSnapshot, StoreStats,
};
