use crate::core::{LedgerError, Result};
use std::fmt;
use std::str::FromStr;

/// The fixed set of operations an invocation can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateGadget,
    ReadGadget,
    GetGadgetByRange,
    ChangeGadget,
    Delete,
}

/// Lookup table from invocation name to operation.
pub const OPERATIONS: [(&str, Operation); 5] = [
    ("createGadget", Operation::CreateGadget),
    ("readGadget", Operation::ReadGadget),
    ("getGadgetByRange", Operation::GetGadgetByRange),
    ("changeGadget", Operation::ChangeGadget),
    ("delete", Operation::Delete),
];

impl Operation {
    /// Resolves an invocation name. Names are case-sensitive.
    pub fn resolve(name: &str) -> Result<Self> {
        OPERATIONS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, operation)| *operation)
            .ok_or_else(|| LedgerError::MethodNotFound(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateGadget => "createGadget",
            Operation::ReadGadget => "readGadget",
            Operation::GetGadgetByRange => "getGadgetByRange",
            Operation::ChangeGadget => "changeGadget",
            Operation::Delete => "delete",
        }
    }

    /// Whether the operation writes to the store.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Operation::ReadGadget | Operation::GetGadgetByRange)
    }
}

impl FromStr for Operation {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
