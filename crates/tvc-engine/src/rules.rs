//! # Urgency Rule Table
//!
//! The tiering policy as data: an ordered list of `(condition → tier)` rules,
//! evaluated top to bottom, first match wins.
//!
//! | # | Rule | Condition | Tier |
//! |---|------|-----------|------|
//! | 1 | `unknown_version` | version not in ledger | `UNKNOWN` |
//! | 2 | `two_or_more_behind` | behind ≥ 2 | `CRITICAL` |
//! | 3 | `one_behind_stale` | behind = 1 and stale | `HIGH` |
//! | 4 | `one_behind` | behind = 1 | `MEDIUM` |
//! | 5 | `current_but_stale` | stale | `LOW` |
//! | 6 | `current_and_active` | always | `OK` |
//!
//! Being several versions behind outranks staleness, so rule 2 ignores
//! activity entirely. Staleness only escalates a single-version gap; on its
//! own it is informational (`LOW`). A stale operator two or more versions
//! behind stays `CRITICAL`: there is no tier above it.

use crate::urgency::Urgency;

/// The facts a rule may inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInput {
    /// Versions behind, or `None` when the version is unknown.
    pub versions_behind: Option<u32>,
    /// Inactive beyond the staleness threshold.
    pub is_stale: bool,
}

/// One row of the policy table.
#[derive(Clone, Copy)]
pub struct UrgencyRule {
    /// Stable rule name, reported alongside the tier.
    pub name: &'static str,
    /// Tier assigned when `condition` holds.
    pub tier: Urgency,
    /// Predicate over the classified facts.
    pub condition: fn(&RuleInput) -> bool,
}

impl std::fmt::Debug for UrgencyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrgencyRule")
            .field("name", &self.name)
            .field("tier", &self.tier)
            .finish_non_exhaustive()
    }
}

impl UrgencyRule {
    /// True when this rule applies to `input`.
    pub fn matches(&self, input: &RuleInput) -> bool {
        (self.condition)(input)
    }
}

/// The default tiering policy.
pub const DEFAULT_RULES: &[UrgencyRule] = &[
    UrgencyRule {
        name: "unknown_version",
        tier: Urgency::Unknown,
        condition: |i| i.versions_behind.is_none(),
    },
    UrgencyRule {
        name: "two_or_more_behind",
        tier: Urgency::Critical,
        condition: |i| matches!(i.versions_behind, Some(n) if n >= 2),
    },
    UrgencyRule {
        name: "one_behind_stale",
        tier: Urgency::High,
        condition: |i| i.versions_behind == Some(1) && i.is_stale,
    },
    UrgencyRule {
        name: "one_behind",
        tier: Urgency::Medium,
        condition: |i| i.versions_behind == Some(1),
    },
    UrgencyRule {
        name: "current_but_stale",
        tier: Urgency::Low,
        condition: |i| i.is_stale,
    },
    UrgencyRule {
        name: "current_and_active",
        tier: Urgency::Ok,
        condition: |_| true,
    },
];

/// Rule name reported when no rule in the table matches.
pub const FALLBACK_RULE: &str = "fallback";

/// An ordered rule list with first-match-wins evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable {
    rules: &'static [UrgencyRule],
}

impl RuleTable {
    /// A table over `rules`. The final rule should match unconditionally;
    /// if none matches, evaluation logs a warning and falls back to
    /// [`Urgency::Ok`] under [`FALLBACK_RULE`].
    pub const fn new(rules: &'static [UrgencyRule]) -> Self {
        Self { rules }
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &'static [UrgencyRule] {
        self.rules
    }

    /// The first rule matching `input`.
    pub fn first_match(&self, input: &RuleInput) -> Option<&'static UrgencyRule> {
        self.rules.iter().find(|rule| rule.matches(input))
    }

    /// Tier and rule name for `input`.
    pub fn evaluate(&self, input: &RuleInput) -> (Urgency, &'static str) {
        match self.first_match(input) {
            Some(rule) => (rule.tier, rule.name),
            None => {
                tracing::warn!(
                    versions_behind = ?input.versions_behind,
                    is_stale = input.is_stale,
                    "no urgency rule matched; falling back to OK"
                );
                (Urgency::Ok, FALLBACK_RULE)
            }
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new(DEFAULT_RULES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(behind: Option<u32>, stale: bool) -> RuleInput {
        RuleInput {
            versions_behind: behind,
            is_stale: stale,
        }
    }

    fn rule(name: &str) -> &'static UrgencyRule {
        DEFAULT_RULES
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no rule named {name}"))
    }

    // ---- rule by rule ----

    #[test]
    fn test_unknown_version_rule() {
        let r = rule("unknown_version");
        assert!(r.matches(&input(None, false)));
        assert!(r.matches(&input(None, true)));
        assert!(!r.matches(&input(Some(0), false)));
    }

    #[test]
    fn test_two_or_more_behind_rule() {
        let r = rule("two_or_more_behind");
        assert!(r.matches(&input(Some(2), false)));
        assert!(r.matches(&input(Some(7), true)));
        assert!(!r.matches(&input(Some(1), true)));
        assert!(!r.matches(&input(None, true)));
    }

    #[test]
    fn test_one_behind_stale_rule() {
        let r = rule("one_behind_stale");
        assert!(r.matches(&input(Some(1), true)));
        assert!(!r.matches(&input(Some(1), false)));
        assert!(!r.matches(&input(Some(2), true)));
    }

    #[test]
    fn test_one_behind_rule() {
        let r = rule("one_behind");
        assert!(r.matches(&input(Some(1), false)));
        assert!(r.matches(&input(Some(1), true)));
        assert!(!r.matches(&input(Some(0), false)));
    }

    #[test]
    fn test_current_but_stale_rule() {
        let r = rule("current_but_stale");
        assert!(r.matches(&input(Some(0), true)));
        assert!(!r.matches(&input(Some(0), false)));
    }

    #[test]
    fn test_last_rule_is_unconditional() {
        let last = DEFAULT_RULES.last().unwrap();
        assert_eq!(last.tier, Urgency::Ok);
        assert!(last.matches(&input(Some(0), false)));
        assert!(last.matches(&input(None, true)));
    }

    // ---- table evaluation ----

    #[test]
    fn test_evaluate_full_matrix() {
        let table = RuleTable::default();
        let cases = [
            (None, false, Urgency::Unknown),
            (None, true, Urgency::Unknown),
            (Some(0), false, Urgency::Ok),
            (Some(0), true, Urgency::Low),
            (Some(1), false, Urgency::Medium),
            (Some(1), true, Urgency::High),
            (Some(2), false, Urgency::Critical),
            (Some(2), true, Urgency::Critical),
            (Some(10), true, Urgency::Critical),
        ];
        for (behind, stale, expected) in cases {
            let (tier, name) = table.evaluate(&input(behind, stale));
            assert_eq!(tier, expected, "behind={behind:?} stale={stale} via {name}");
        }
    }

    #[test]
    fn test_evaluate_reports_rule_name() {
        let table = RuleTable::default();
        assert_eq!(table.evaluate(&input(Some(1), true)).1, "one_behind_stale");
        assert_eq!(table.evaluate(&input(Some(0), false)).1, "current_and_active");
    }

    #[test]
    fn test_empty_table_falls_back_to_ok() {
        let table = RuleTable::new(&[]);
        assert_eq!(table.evaluate(&input(Some(3), true)), (Urgency::Ok, FALLBACK_RULE));
    }

    // ---- Fallback warning ----

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn evaluate_capturing(
        table: RuleTable,
        input: &RuleInput,
    ) -> ((Urgency, &'static str), String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || table.evaluate(input));
        (result, logs.contents())
    }

    static BEHIND_ONLY: [UrgencyRule; 1] = [UrgencyRule {
        name: "behind_only",
        tier: Urgency::Medium,
        condition: |i| matches!(i.versions_behind, Some(n) if n > 0),
    }];

    #[test]
    fn test_table_gap_warns_and_falls_back() {
        let table = RuleTable::new(&BEHIND_ONLY);
        let (result, logs) = evaluate_capturing(table, &input(Some(0), false));
        assert_eq!(result, (Urgency::Ok, FALLBACK_RULE));
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("no urgency rule matched"), "{logs}");
    }

    #[test]
    fn test_matched_rule_does_not_warn() {
        let table = RuleTable::new(&BEHIND_ONLY);
        let (result, logs) = evaluate_capturing(table, &input(Some(2), false));
        assert_eq!(result, (Urgency::Medium, "behind_only"));
        assert!(logs.is_empty(), "{logs}");
    }

    #[test]
    fn test_every_tier_is_reachable() {
        for tier in Urgency::all() {
            assert!(
                DEFAULT_RULES.iter().any(|r| r.tier == *tier),
                "no rule assigns {tier}"
            );
        }
    }
}
