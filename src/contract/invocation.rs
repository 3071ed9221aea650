use crate::core::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single named call with its string arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invocation {
    /// Transaction id, used only for tracing.
    pub tx_id: Uuid,
    /// Name of the operation to run.
    pub function: String,
    /// Positional arguments; meaning depends on `function`.
    pub args: Vec<String>,
    /// When the invocation was created.
    pub created_at: DateTime<Utc>,
}

impl Invocation {
    /// Creates an invocation with a fresh transaction id and current timestamp.
    pub fn new<I, S>(function: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tx_id: Uuid::new_v4(),
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
            created_at: Utc::now(),
        }
    }

    /// Sets the transaction id.
    pub fn with_tx_id(mut self, tx_id: Uuid) -> Self {
        self.tx_id = tx_id;
        self
    }
}

/// Outcome of every invocation. Failures never escape as anything else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Success { payload: Vec<u8> },
    Failure { message: String },
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Response::Success { payload }
    }

    pub fn empty() -> Self {
        Response::Success {
            payload: Vec::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Response::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Response::Success { payload } => Some(payload),
            Response::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Response::Success { .. } => None,
            Response::Failure { message } => Some(message),
        }
    }
}

impl From<Result<Option<Vec<u8>>>> for Response {
    fn from(outcome: Result<Option<Vec<u8>>>) -> Self {
        match outcome {
            Ok(Some(payload)) => Response::success(payload),
            Ok(None) => Response::empty(),
            Err(err) => Response::failure(err.to_string()),
        }
    }
}
