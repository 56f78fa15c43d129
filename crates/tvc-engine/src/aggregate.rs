//! # Aggregator
//!
//! Folds classified operators into run-level statistics in a single pass:
//! global counts, a count per urgency tier, and a per-group compliance table.
//! Cost is linear in the number of operators and independent of ledger size.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tvc_core::OperatorRecord;

use crate::classifier::ComplianceStatus;
use crate::urgency::Urgency;

/// Run-wide counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    /// Operators classified.
    pub total: usize,
    /// On the current version.
    pub current: usize,
    /// Exactly one version behind.
    pub one_behind: usize,
    /// Two or more versions behind.
    pub two_or_more_behind: usize,
    /// On a version the ledger does not list.
    pub unknown_version: usize,
    /// Inactive beyond the staleness threshold.
    pub stale: usize,
    /// Operators that get a notification.
    pub needs_notification: usize,
    /// Operators per tier. Every tier is present, zero-filled.
    pub by_urgency: BTreeMap<Urgency, usize>,
}

/// Compliance within one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    /// Group label (blank groups appear as `Unknown`).
    pub group: String,
    /// Operators in the group.
    pub total: usize,
    /// Operators in the group on the current version.
    pub current: usize,
}

impl GroupStats {
    /// `current / total * 100`, rounded half up. Zero for an empty group.
    pub fn compliance_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.current * 200 + self.total) / (self.total * 2);
        u32::try_from(pct).unwrap_or(100)
    }
}

/// The aggregator's output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Global counts.
    pub summary: ComplianceSummary,
    /// One row per group, ordered by group label.
    pub groups: Vec<GroupStats>,
}

impl AggregateStats {
    /// Overall `current / total * 100`, rounded; zero for an empty run.
    pub fn overall_percent(&self) -> u32 {
        GroupStats {
            group: String::new(),
            total: self.summary.total,
            current: self.summary.current,
        }
        .compliance_percent()
    }
}

/// Aggregate `(record, status)` pairs.
pub fn aggregate<'a, I>(pairs: I) -> AggregateStats
where
    I: IntoIterator<Item = (&'a OperatorRecord, &'a ComplianceStatus)>,
{
    let mut summary = ComplianceSummary {
        by_urgency: Urgency::all().iter().map(|u| (*u, 0)).collect(),
        ..ComplianceSummary::default()
    };
    let mut groups: BTreeMap<&'a str, (usize, usize)> = BTreeMap::new();

    for (record, status) in pairs {
        summary.total += 1;
        match status.versions_behind {
            None => summary.unknown_version += 1,
            Some(0) => summary.current += 1,
            Some(1) => summary.one_behind += 1,
            Some(_) => summary.two_or_more_behind += 1,
        }
        if status.is_stale {
            summary.stale += 1;
        }
        if status.needs_notification {
            summary.needs_notification += 1;
        }
        *summary.by_urgency.entry(status.urgency).or_insert(0) += 1;

        let entry = groups.entry(record.group_label()).or_insert((0, 0));
        entry.0 += 1;
        if status.is_current() {
            entry.1 += 1;
        }
    }

    let groups = groups
        .into_iter()
        .map(|(group, (total, current))| GroupStats {
            group: group.to_string(),
            total,
            current,
        })
        .collect();

    AggregateStats { summary, groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use chrono::NaiveDate;
    use tvc_core::VersionLedger;

    fn ledger() -> VersionLedger {
        VersionLedger::new(
            "1.2".into(),
            vec!["1.0".into(), "1.1".into(), "1.2".into()],
            Default::default(),
        )
        .unwrap()
    }

    fn record(id: &str, group: &str, version: &str, last: &str) -> OperatorRecord {
        OperatorRecord {
            id: id.into(),
            name: format!("Operator {id}"),
            group: group.into(),
            current_version: version.into(),
            last_active_at: last.into(),
            activity_count: 0,
            contact: None,
        }
    }

    fn run(records: &[OperatorRecord]) -> AggregateStats {
        let l = ledger();
        let as_of = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let statuses = Classifier::new(&l, 45, as_of).classify_all(records).unwrap();
        aggregate(records.iter().zip(statuses.iter()))
    }

    #[test]
    fn test_global_counts() {
        let records = vec![
            record("a", "North", "1.2", "2026-02-28"),
            record("b", "North", "1.2", "2025-12-01"),
            record("c", "South", "1.1", "2026-02-28"),
            record("d", "South", "1.0", "2025-12-01"),
            record("e", "East", "0.9-beta", "2026-02-28"),
        ];
        let stats = run(&records);
        let s = &stats.summary;
        assert_eq!(s.total, 5);
        assert_eq!(s.current, 2);
        assert_eq!(s.one_behind, 1);
        assert_eq!(s.two_or_more_behind, 1);
        assert_eq!(s.unknown_version, 1);
        assert_eq!(s.stale, 2);
        assert_eq!(s.needs_notification, 2);
        assert_eq!(s.by_urgency[&Urgency::Ok], 1);
        assert_eq!(s.by_urgency[&Urgency::Low], 1);
        assert_eq!(s.by_urgency[&Urgency::Medium], 1);
        assert_eq!(s.by_urgency[&Urgency::Critical], 1);
        assert_eq!(s.by_urgency[&Urgency::Unknown], 1);
        assert_eq!(s.by_urgency[&Urgency::High], 0);
    }

    #[test]
    fn test_groups_sorted_and_percentages() {
        let records = vec![
            record("a", "North", "1.2", "2026-02-28"),
            record("b", "North", "1.2", "2026-02-28"),
            record("c", "North", "1.1", "2026-02-28"),
            record("d", "South", "1.0", "2026-02-28"),
        ];
        let stats = run(&records);
        let names: Vec<_> = stats.groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(names, vec!["North", "South"]);
        assert_eq!(stats.groups[0].total, 3);
        assert_eq!(stats.groups[0].current, 2);
        assert_eq!(stats.groups[0].compliance_percent(), 67);
        assert_eq!(stats.groups[1].compliance_percent(), 0);
        assert_eq!(stats.overall_percent(), 50);
    }

    #[test]
    fn test_blank_group_becomes_unknown() {
        let records = vec![
            record("a", "", "1.2", "2026-02-28"),
            record("b", "  ", "1.0", "2026-02-28"),
        ];
        let stats = run(&records);
        assert_eq!(stats.groups.len(), 1);
        assert_eq!(stats.groups[0].group, "Unknown");
        assert_eq!(stats.groups[0].total, 2);
    }

    #[test]
    fn test_empty_input() {
        let stats = run(&[]);
        assert_eq!(stats.summary.total, 0);
        assert!(stats.groups.is_empty());
        assert_eq!(stats.overall_percent(), 0);
        assert_eq!(stats.summary.by_urgency.len(), Urgency::all().len());
    }

    #[test]
    fn test_percent_rounding() {
        let g = |current, total| GroupStats {
            group: "g".into(),
            total,
            current,
        };
        assert_eq!(g(0, 0).compliance_percent(), 0);
        assert_eq!(g(1, 3).compliance_percent(), 33);
        assert_eq!(g(2, 3).compliance_percent(), 67);
        assert_eq!(g(1, 8).compliance_percent(), 13);
        assert_eq!(g(1, 200).compliance_percent(), 1);
        assert_eq!(g(5, 5).compliance_percent(), 100);
    }
}
