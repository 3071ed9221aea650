use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag written into `docType` unless the contract is configured otherwise.
pub const DEFAULT_DOC_TYPE: &str = "gadget";

/// A gadget as persisted on the ledger, keyed by `model`.
///
/// Only `owner` changes after creation. `color` and `owner` are stored
/// lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gadget {
    #[serde(rename = "docType")]
    pub doc_type: String,
    pub model: String,
    pub color: String,
    pub make: i64,
    pub owner: String,
}

/// Why a stored payload could not be read back as a [`Gadget`].
#[derive(Error, Debug)]
pub enum RecordDecodeError {
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unexpected docType '{found}', expected '{expected}'")]
    UnexpectedDocType { found: String, expected: String },
}

impl Gadget {
    /// Builds a new record, normalizing `color` and `owner` to lowercase.
    pub fn new(
        doc_type: impl Into<String>,
        model: impl Into<String>,
        color: &str,
        make: i64,
        owner: &str,
    ) -> Self {
        Self {
            doc_type: doc_type.into(),
            model: model.into(),
            color: color.to_lowercase(),
            make,
            owner: owner.to_lowercase(),
        }
    }

    /// Decodes a stored payload. All five fields must be present with their
    /// JSON types, and `docType` must equal `expected_doc_type`.
    pub fn decode(bytes: &[u8], expected_doc_type: &str) -> Result<Self, RecordDecodeError> {
        let gadget: Gadget = serde_json::from_slice(bytes)?;
        if gadget.doc_type != expected_doc_type {
            return Err(RecordDecodeError::UnexpectedDocType {
                found: gadget.doc_type,
                expected: expected_doc_type.to_string(),
            });
        }
        Ok(gadget)
    }

    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Hands the gadget to a new owner. Every other field is left untouched.
    pub fn transfer_to(&mut self, new_owner: &str) {
        self.owner = new_owner.to_lowercase();
    }

    /// Rewrites the owner of a stored payload.
    ///
    /// The payload must decode as a gadget; fields the record type does not
    /// know about are written back unchanged.
    pub fn transfer_stored(
        stored: &[u8],
        expected_doc_type: &str,
        new_owner: &str,
    ) -> Result<(Self, Vec<u8>), RecordDecodeError> {
        let mut gadget = Self::decode(stored, expected_doc_type)?;
        gadget.transfer_to(new_owner);

        let mut fields: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(stored)?;
        fields.insert(
            "owner".to_string(),
            serde_json::Value::String(gadget.owner.clone()),
        );
        Ok((gadget, serde_json::to_vec(&fields)?))
    }
}
