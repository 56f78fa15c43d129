//! # Compliance Engine
//!
//! Wires the components into one pure run:
//!
//! ```text
//! ledger + roster ─► Classifier ─► statuses ─┬─► Notification Renderer ─┐
//!                                            └─► Aggregator ────────────┴─► Report Renderer
//! ```
//!
//! A run either produces every output or fails. Configuration is validated
//! when the engine is built; every record is validated before any is
//! classified, so an invalid roster never yields a partial report.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use tvc_core::{sha256_hex, DataError, OperatorRecord, TvcError, VersionLedger};

use crate::aggregate::{aggregate, AggregateStats};
use crate::classifier::{Classifier, ComplianceStatus};
use crate::config::EngineConfig;
use crate::notification::{render_notification, ManualReview, Notification};
use crate::report::{render_report, ReportInput};
use crate::rules::RuleTable;

/// Every output of a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceRun {
    /// Reference date the run was computed against.
    pub as_of: NaiveDate,
    /// Version operators were measured against.
    pub current_version: String,
    /// Staleness threshold in effect.
    pub staleness_threshold_days: u32,
    /// One status per record, in roster order.
    pub statuses: Vec<ComplianceStatus>,
    /// Aggregated statistics.
    pub aggregate: AggregateStats,
    /// One message per operator needing notification, in roster order.
    pub notifications: Vec<Notification>,
    /// Operators on versions the ledger does not list.
    pub manual_review: Vec<ManualReview>,
    /// The rendered markdown report.
    pub report: String,
}

impl ComplianceRun {
    /// SHA-256 hex of the rendered report.
    pub fn report_digest(&self) -> String {
        sha256_hex(self.report.as_bytes())
    }
}

/// A validated ledger and configuration, ready to classify rosters.
#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    ledger: VersionLedger,
    config: EngineConfig,
    rules: RuleTable,
}

impl ComplianceEngine {
    /// Build an engine.
    ///
    /// # Errors
    ///
    /// [`TvcError::Config`] when the configuration is invalid. The ledger is
    /// already validated by construction.
    pub fn new(ledger: VersionLedger, config: EngineConfig) -> Result<Self, TvcError> {
        config.validate()?;
        Ok(Self {
            ledger,
            config,
            rules: RuleTable::default(),
        })
    }

    /// Replace the tiering policy.
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }

    /// The ledger in use.
    pub fn ledger(&self) -> &VersionLedger {
        &self.ledger
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check every record's required fields and id uniqueness.
    pub fn validate_roster(records: &[OperatorRecord]) -> Result<(), DataError> {
        let mut seen = HashSet::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            record.validate(position)?;
            if !seen.insert(record.id.trim()) {
                return Err(DataError::DuplicateId {
                    record_id: record.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Classify the roster as of `as_of` and render every output.
    ///
    /// # Errors
    ///
    /// [`TvcError::Data`] naming the first invalid record. Nothing is
    /// rendered in that case.
    pub fn run(
        &self,
        records: &[OperatorRecord],
        as_of: NaiveDate,
    ) -> Result<ComplianceRun, TvcError> {
        let threshold = self.config.staleness_threshold_days;
        tracing::info!(
            operators = records.len(),
            current_version = %self.ledger.current_version(),
            staleness_threshold_days = threshold,
            %as_of,
            "starting compliance run"
        );

        Self::validate_roster(records)?;

        let classifier = Classifier::new(&self.ledger, threshold, as_of).with_rules(self.rules);
        let statuses = classifier.classify_all(records)?;

        let mut notifications = Vec::new();
        let mut manual_review = Vec::new();
        for (record, status) in records.iter().zip(statuses.iter()) {
            if let Some(note) =
                render_notification(record, status, &self.ledger, &self.config.notification)
            {
                notifications.push(note);
            }
            if let Some(review) = ManualReview::for_status(record, status) {
                tracing::warn!(
                    operator = %review.operator_id,
                    version = %review.reported_version,
                    "operator reported a version not in the ledger; needs manual follow-up"
                );
                manual_review.push(review);
            }
        }

        let stats = aggregate(records.iter().zip(statuses.iter()));

        let report = render_report(&ReportInput {
            as_of,
            ledger: &self.ledger,
            staleness_threshold_days: threshold,
            records,
            statuses: &statuses,
            aggregate: &stats,
            notifications: &notifications,
            manual_review: &manual_review,
        });

        tracing::info!(
            total = stats.summary.total,
            current = stats.summary.current,
            notifications = notifications.len(),
            manual_review = manual_review.len(),
            "compliance run complete"
        );

        Ok(ComplianceRun {
            as_of,
            current_version: self.ledger.current_version().to_string(),
            staleness_threshold_days: threshold,
            statuses,
            aggregate: stats,
            notifications,
            manual_review,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tvc_core::ConfigError;

    fn ledger() -> VersionLedger {
        VersionLedger::new(
            "1.2".into(),
            vec!["1.0".into(), "1.1".into(), "1.2".into()],
            BTreeMap::new(),
        )
        .unwrap()
    }

    fn record(id: &str, version: &str, last: &str) -> OperatorRecord {
        OperatorRecord {
            id: id.into(),
            name: format!("Name {id}"),
            group: "North".into(),
            current_version: version.into(),
            last_active_at: last.into(),
            activity_count: 2,
            contact: None,
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected_before_run() {
        let config = EngineConfig::default().with_staleness_threshold(0);
        let err = ComplianceEngine::new(ledger(), config).unwrap_err();
        assert!(matches!(err, TvcError::Config(ConfigError::InvalidField { .. })));
    }

    #[test]
    fn test_run_outputs_line_up() {
        let engine = ComplianceEngine::new(ledger(), EngineConfig::default()).unwrap();
        let records = vec![
            record("a", "1.2", "2026-02-20"),
            record("b", "1.0", "2026-02-20"),
            record("c", "0.9-beta", "2026-02-20"),
            record("d", "1.1", "2026-02-20"),
        ];
        let run = engine.run(&records, as_of()).unwrap();
        assert_eq!(run.statuses.len(), 4);
        let ids: Vec<_> = run.statuses.iter().map(|s| s.operator_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        let notified: Vec<_> = run.notifications.iter().map(|n| n.operator_id.as_str()).collect();
        assert_eq!(notified, vec!["b", "d"]);
        assert_eq!(run.manual_review.len(), 1);
        assert_eq!(run.manual_review[0].operator_id, "c");
        assert_eq!(run.aggregate.summary.total, 4);
        assert_eq!(run.current_version, "1.2");
        assert_eq!(run.report_digest().len(), 64);
    }

    #[test]
    fn test_invalid_record_fails_whole_run() {
        let engine = ComplianceEngine::new(ledger(), EngineConfig::default()).unwrap();
        let records = vec![
            record("a", "1.2", "2026-02-20"),
            record("b", "1.0", "sometime"),
        ];
        match engine.run(&records, as_of()) {
            Err(TvcError::Data(e)) => assert_eq!(e.record_id(), "b"),
            other => panic!("expected data error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_name_reported_before_classification() {
        let engine = ComplianceEngine::new(ledger(), EngineConfig::default()).unwrap();
        let mut bad = record("z", "1.2", "also bad");
        bad.name = String::new();
        let err = engine.run(&[bad], as_of()).unwrap_err();
        assert!(err.to_string().contains("`name`"), "{err}");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let records = vec![record("a", "1.2", "2026-02-20"), record("a", "1.1", "2026-02-20")];
        let err = ComplianceEngine::validate_roster(&records).unwrap_err();
        assert_eq!(err, DataError::DuplicateId { record_id: "a".into() });
    }

    #[test]
    fn test_threshold_override_changes_staleness() {
        let records = vec![record("a", "1.2", "2026-02-01")];
        let strict_config = EngineConfig::default().with_staleness_threshold(10);
        let strict = ComplianceEngine::new(ledger(), strict_config)
            .unwrap()
            .run(&records, as_of())
            .unwrap();
        let lenient = ComplianceEngine::new(ledger(), EngineConfig::default())
            .unwrap()
            .run(&records, as_of())
            .unwrap();
        assert!(strict.statuses[0].is_stale);
        assert!(!lenient.statuses[0].is_stale);
        assert!(strict.report.contains("Staleness threshold: 10 days."));
    }

    #[test]
    fn test_run_serializes_to_json() {
        let engine = ComplianceEngine::new(ledger(), EngineConfig::default()).unwrap();
        let run = engine.run(&[record("a", "1.0", "2026-02-20")], as_of()).unwrap();
        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["statuses"][0]["urgency"], "CRITICAL");
        assert_eq!(json["statuses"][0]["versions_behind"], 2);
        assert_eq!(json["aggregate"]["summary"]["by_urgency"]["CRITICAL"], 1);
        assert_eq!(json["as_of"], "2026-03-01");
    }
}
