pub mod drain;

pub use drain::{CursorDrain, DrainState, QueryRecord, QueryResultEntry, drain_cursor};
