//! # Classifier
//!
//! Turns one operator record into one [`ComplianceStatus`], given the ledger,
//! the staleness threshold, and a fixed reference date. Classification of a
//! record never looks at any other record, and nothing here reads the clock.
//!
//! ## Algorithm
//!
//! 1. Look the reported version up in the ledger. Unknown versions get
//!    `versions_behind = None` and no missed versions.
//! 2. Known versions get the ordinal distance to the current version and the
//!    slice of history the operator has not yet picked up.
//! 3. Days since activity are whole calendar days to the reference date.
//! 4. Stale means strictly more days than the threshold.
//! 5. The [`RuleTable`] assigns the tier.
//!
//! An unknown version is a classification outcome, not an error. The only
//! failures are structural: a blank version or an unparseable activity date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tvc_core::{
    days_between, parse_activity_date, DataError, OperatorRecord, VersionId, VersionLedger,
};

use crate::rules::{RuleInput, RuleTable};
use crate::urgency::Urgency;

/// Derived compliance facts for one operator. Recomputed every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceStatus {
    /// Identifier of the classified record.
    pub operator_id: String,
    /// The version the operator reported.
    pub reported_version: VersionId,
    /// Ordinal distance to the current version; `None` when unknown.
    pub versions_behind: Option<u32>,
    /// Versions released since the reported one, oldest first.
    pub missed_versions: Vec<VersionId>,
    /// Calendar date of last activity.
    pub last_active_on: NaiveDate,
    /// Whole days from last activity to the reference date. Negative for
    /// activity dated after the reference date.
    pub days_since_active: i64,
    /// Inactive for longer than the staleness threshold.
    pub is_stale: bool,
    /// Assigned tier.
    pub urgency: Urgency,
    /// Name of the rule that assigned the tier.
    pub rule: String,
    /// The operator is known to be behind and should be contacted.
    pub needs_notification: bool,
}

impl ComplianceStatus {
    /// True when the operator reported a version the ledger does not list.
    pub fn is_unknown_version(&self) -> bool {
        self.versions_behind.is_none()
    }

    /// True when the operator is on the current (or a staged) version.
    pub fn is_current(&self) -> bool {
        self.versions_behind == Some(0)
    }
}

/// Classifies records against an injected ledger and reference date.
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    ledger: &'a VersionLedger,
    staleness_threshold_days: u32,
    as_of: NaiveDate,
    rules: RuleTable,
}

impl<'a> Classifier<'a> {
    /// A classifier using the default rule table.
    pub fn new(ledger: &'a VersionLedger, staleness_threshold_days: u32, as_of: NaiveDate) -> Self {
        Self {
            ledger,
            staleness_threshold_days,
            as_of,
            rules: RuleTable::default(),
        }
    }

    /// Replace the tiering policy.
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }

    /// The reference date day counts are measured against.
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Classify a single record.
    ///
    /// # Errors
    ///
    /// [`DataError`] naming the record when its version is blank or its
    /// activity date cannot be parsed.
    pub fn classify(&self, record: &OperatorRecord) -> Result<ComplianceStatus, DataError> {
        if record.current_version.is_empty() {
            return Err(DataError::MissingField {
                record_id: record.id.clone(),
                field: "current_version",
            });
        }

        let last_active_on = parse_activity_date(&record.id, &record.last_active_at)?;
        let days_since_active = days_between(self.as_of, last_active_on);
        if days_since_active < 0 {
            tracing::warn!(
                operator = %record.id,
                last_active_on = %last_active_on,
                as_of = %self.as_of,
                "last activity is dated after the reference date"
            );
        }
        let is_stale = days_since_active > i64::from(self.staleness_threshold_days);

        let version = &record.current_version;
        let versions_behind = self.ledger.versions_behind(version);
        let missed_versions = self
            .ledger
            .missed_versions(version)
            .map(<[VersionId]>::to_vec)
            .unwrap_or_default();

        let (urgency, rule) = self.rules.evaluate(&RuleInput {
            versions_behind,
            is_stale,
        });

        let status = ComplianceStatus {
            operator_id: record.id.clone(),
            reported_version: version.clone(),
            versions_behind,
            missed_versions,
            last_active_on,
            days_since_active,
            is_stale,
            urgency,
            rule: rule.to_string(),
            needs_notification: matches!(versions_behind, Some(n) if n > 0),
        };

        tracing::debug!(
            operator = %status.operator_id,
            version = %status.reported_version,
            behind = ?status.versions_behind,
            days = status.days_since_active,
            urgency = %status.urgency,
            rule,
            "classified operator"
        );

        Ok(status)
    }

    /// Classify every record, preserving input order. Stops at the first
    /// invalid record.
    pub fn classify_all(
        &self,
        records: &[OperatorRecord],
    ) -> Result<Vec<ComplianceStatus>, DataError> {
        records.iter().map(|r| self.classify(r)).collect()
    }
}
