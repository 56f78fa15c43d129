//! # Operator Records
//!
//! The input entity: one tracked trainer's confirmed content version and last
//! confirmed activity, plus identity and grouping metadata. Records are
//! created and edited outside this system; a compliance run treats the list it
//! is given as an immutable snapshot.

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::ledger::VersionId;

/// Group label used for records whose `group` field is blank.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// One tracked operator as supplied by the roster.
///
/// Absent keys deserialize as blank values so that [`validate()`](Self::validate)
/// and the classifier report them as [`DataError::MissingField`] naming the
/// record, instead of failing the whole file at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorRecord {
    /// Stable identifier, unique within a roster.
    #[serde(default)]
    pub id: String,
    /// Display name. The first whitespace-separated token is used as the
    /// greeting in notifications.
    #[serde(default)]
    pub name: String,
    /// Aggregation dimension, typically a region. Free text; may be blank.
    #[serde(default, alias = "region")]
    pub group: String,
    /// The content version the operator last confirmed.
    #[serde(default)]
    pub current_version: VersionId,
    /// Date or timestamp of last confirmed activity, unparsed.
    #[serde(default)]
    pub last_active_at: String,
    /// Completed sessions. Only used to personalize notifications.
    #[serde(default)]
    pub activity_count: u32,
    /// Delivery address for the external channel (e.g. an email address).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl OperatorRecord {
    /// The group this record is aggregated under; blank groups map to
    /// [`UNKNOWN_GROUP`].
    pub fn group_label(&self) -> &str {
        let group = self.group.trim();
        if group.is_empty() {
            UNKNOWN_GROUP
        } else {
            group
        }
    }

    /// First name for greetings, falling back to the id when the name is blank.
    pub fn first_name(&self) -> &str {
        self.name
            .split_whitespace()
            .next()
            .unwrap_or(self.id.as_str())
    }

    /// Check required fields. `position` is the record's zero-based index in
    /// the roster and stands in for the id when the id itself is missing.
    pub fn validate(&self, position: usize) -> Result<(), DataError> {
        if self.id.trim().is_empty() {
            return Err(DataError::MissingField {
                record_id: format!("#{position}"),
                field: "id",
            });
        }
        if self.name.trim().is_empty() {
            return Err(DataError::MissingField {
                record_id: self.id.clone(),
                field: "name",
            });
        }
        if self.current_version.is_empty() {
            return Err(DataError::MissingField {
                record_id: self.id.clone(),
                field: "current_version",
            });
        }
        Ok(())
    }
}
