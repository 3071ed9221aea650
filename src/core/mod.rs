pub mod error;
pub mod record;

pub use error::{LedgerError, Result};
pub use record::{DEFAULT_DOC_TYPE, Gadget};
