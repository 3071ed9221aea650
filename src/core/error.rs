use thiserror::Error;

/// Failures an invocation can end with.
///
/// The `Display` form of each variant is exactly the message carried by a
/// failure [`Response`](crate::contract::Response).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Wrong arity or a malformed argument.
    #[error("{0}")]
    Argument(String),

    /// A gadget with this model is already stored.
    #[error("This gadget already exists: {0}")]
    Conflict(String),

    /// The read/transfer target is absent.
    #[error("{0}")]
    NotFound(String),

    /// A stored payload does not parse as a gadget record.
    #[error("Failed to decode JSON of: {0}")]
    Decode(String),

    /// No operation is registered under this invocation name.
    #[error("no method of name: {0} found")]
    MethodNotFound(String),

    /// Opaque failure surfaced from the record store.
    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Short machine-friendly name of the variant, used as a tracing field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Argument(_) => "argument",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Decode(_) => "decode",
            Self::MethodNotFound(_) => "method_not_found",
            Self::Store(_) => "store",
            Self::Config(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(format!("serialization failed: {}", err))
    }
}
