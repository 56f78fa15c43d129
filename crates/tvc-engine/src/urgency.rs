//! # Urgency Tiers
//!
//! The closed set of classification outcomes. Every consumer (the report's
//! sort, the notification subject lookup) matches on [`Urgency`]
//! exhaustively, so adding a tier is a compile error until each of them
//! decides what the new tier means.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How urgently an operator needs to act on their content version.
///
/// Severity order, most urgent first:
///
/// ```text
/// Critical > High > Medium > Low > Ok > Unknown
/// ```
///
/// `Unknown` sorts last: it is not "less urgent than OK" so much as
/// "not classifiable", and it is handled by manual review rather than by a
/// notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    /// Two or more versions behind.
    Critical,
    /// One version behind and inactive beyond the staleness threshold.
    High,
    /// One version behind.
    Medium,
    /// On the current version but inactive beyond the threshold.
    Low,
    /// On the current version and recently active.
    Ok,
    /// Reported a version the ledger does not list.
    Unknown,
}

impl Urgency {
    /// All tiers in report order.
    pub fn all() -> &'static [Urgency] {
        &[
            Self::Critical,
            Self::High,
            Self::Medium,
            Self::Low,
            Self::Ok,
            Self::Unknown,
        ]
    }

    /// Sort key; lower sorts first in the report.
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::Ok => 4,
            Self::Unknown => 5,
        }
    }

    /// Uppercase label used in reports and serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Ok => "OK",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// True for tiers that require the operator to update content.
    pub fn is_actionable(self) -> bool {
        matches!(self, Self::Critical | Self::High | Self::Medium)
    }
}

impl PartialOrd for Urgency {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Urgency {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = String;

    /// Case-insensitive parse of the labels produced by [`Urgency::as_str()`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|u| u.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown urgency tier: {s:?}"))
    }
}
