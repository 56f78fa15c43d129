//! # Error Types — Structured Error Hierarchy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - `DataError` always names the offending operator record.
//! - `ConfigError` always names the offending ledger or config field.
//! - An operator on a version the ledger does not know is NOT an error; it is
//!   classified, not rejected.

use thiserror::Error;

/// Top-level error type for a compliance run.
#[derive(Error, Debug)]
pub enum TvcError {
    /// An operator record is structurally invalid.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// The ledger or engine configuration is malformed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// An individual operator record failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// A required field is missing or blank.
    #[error("record {record_id:?}: missing required field `{field}`")]
    MissingField {
        /// Identifier of the record (or its input position when the id itself is missing).
        record_id: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// The last-activity value is not a recognizable date.
    #[error("record {record_id:?}: unparseable last_active_at {value:?}: {reason}")]
    InvalidDate {
        /// Identifier of the record.
        record_id: String,
        /// The raw value that failed to parse.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Two records share the same identifier.
    #[error("record {record_id:?}: duplicate operator id")]
    DuplicateId {
        /// The repeated identifier.
        record_id: String,
    },
}

/// The version ledger or engine configuration is malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The ledger history has no entries.
    #[error("ledger.history is empty")]
    EmptyHistory,

    /// The ledger's current version does not appear in its history.
    #[error("ledger.current_version {0:?} is not listed in ledger.history")]
    CurrentVersionNotInHistory(String),

    /// A version identifier appears more than once in the history.
    #[error("ledger.history lists version {0:?} more than once")]
    DuplicateVersion(String),

    /// A configuration field holds an unusable value.
    #[error("config field `{field}` is invalid: {reason}")]
    InvalidField {
        /// Dotted path of the field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl DataError {
    /// Returns the identifier of the record this error refers to.
    pub fn record_id(&self) -> &str {
        match self {
            Self::MissingField { record_id, .. }
            | Self::InvalidDate { record_id, .. }
            | Self::DuplicateId { record_id } => record_id,
        }
    }
}
