use crate::core::{DEFAULT_DOC_TYPE, LedgerError, Result};

pub const ENV_DOC_TYPE: &str = "GADGET_LEDGER_DOC_TYPE";
pub const ENV_MAX_RANGE_RESULTS: &str = "GADGET_LEDGER_MAX_RANGE_RESULTS";
pub const ENV_REJECT_INVERTED_RANGE: &str = "GADGET_LEDGER_REJECT_INVERTED_RANGE";

/// Contract configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    /// Tag written into, and required from, every record's `docType`
    pub doc_type: String,

    /// Upper bound on entries returned by one range query
    pub max_range_results: Option<usize>,

    /// Fail range queries whose start key sorts after the end key
    pub reject_inverted_range: bool,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            doc_type: DEFAULT_DOC_TYPE.to_string(),
            max_range_results: None,
            reject_inverted_range: false,
        }
    }
}

impl ContractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record tag
    pub fn doc_type(mut self, doc_type: &str) -> Self {
        self.doc_type = doc_type.to_string();
        self
    }

    /// Set the range query limit
    pub fn max_range_results(mut self, max: usize) -> Self {
        self.max_range_results = Some(max);
        self
    }

    /// Reject inverted ranges instead of returning nothing
    pub fn reject_inverted_range(mut self, reject: bool) -> Self {
        self.reject_inverted_range = reject;
        self
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(doc_type) = lookup(ENV_DOC_TYPE) {
            let doc_type = doc_type.trim();
            if doc_type.is_empty() {
                return Err(LedgerError::Config(format!("{} must not be empty", ENV_DOC_TYPE)));
            }
            config.doc_type = doc_type.to_string();
        }

        if let Some(raw) = lookup(ENV_MAX_RANGE_RESULTS) {
            let max = raw.trim().parse::<usize>().map_err(|_| {
                LedgerError::Config(format!("invalid {}='{}'", ENV_MAX_RANGE_RESULTS, raw))
            })?;
            config.max_range_results = Some(max);
        }

        if let Some(raw) = lookup(ENV_REJECT_INVERTED_RANGE) {
            config.reject_inverted_range = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(LedgerError::Config(format!(
                        "invalid {}='{}'",
                        ENV_REJECT_INVERTED_RANGE, raw
                    )));
                }
            };
        }

        Ok(config)
    }
}
