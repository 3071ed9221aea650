use crate::core::{LedgerError, Result};

/// Positional string arguments with checked access and conversion.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    values: &'a [String],
}

impl<'a> Arguments<'a> {
    pub fn new(values: &'a [String]) -> Self {
        Self { values }
    }

    pub fn expect_exactly(self, count: usize, message: &str) -> Result<Self> {
        if self.values.len() != count {
            return Err(LedgerError::argument(message));
        }
        Ok(self)
    }

    pub fn expect_at_least(self, count: usize, message: &str) -> Result<Self> {
        if self.values.len() < count {
            return Err(LedgerError::argument(message));
        }
        Ok(self)
    }

    /// Argument at `index`; callers check arity first.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        self.values
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| LedgerError::argument(format!("missing argument at position {}", index)))
    }

    pub fn non_empty(&self, index: usize, message: &str) -> Result<&'a str> {
        let value = self.get(index)?;
        if value.is_empty() {
            return Err(LedgerError::argument(message));
        }
        Ok(value)
    }

    /// Parses the trimmed argument as a signed integer.
    pub fn integer(&self, index: usize, message: &str) -> Result<i64> {
        self.get(index)?
            .trim()
            .parse::<i64>()
            .map_err(|_| LedgerError::argument(message))
    }
}
