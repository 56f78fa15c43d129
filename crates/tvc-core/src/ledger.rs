//! # Version Ledger
//!
//! The ordered catalog of known content versions plus their release notes.
//! Position in `history` is the only notion of version ordering the system
//! has: "how far behind" is ordinal distance in that sequence, nothing more.
//!
//! ## Invariants
//!
//! - `history` is non-empty and lists each identifier once.
//! - `current_version` appears in `history`. It is normally the last entry,
//!   but entries after it (staged releases) are allowed; an operator already
//!   on a staged release is zero versions behind.
//!
//! Both are checked by [`VersionLedger::new()`], and deserialization routes
//! through the same constructor.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A content version identifier, e.g. `"1.2"` or `"2024-Q3"`.
///
/// Identifiers are opaque: no semantic-version parsing is attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct VersionId(String);

impl VersionId {
    /// Wrap a raw identifier. Surrounding whitespace is trimmed.
    pub fn new(id: impl Into<String>) -> Self {
        let id: String = id.into();
        let trimmed = id.trim();
        if trimmed.len() == id.len() {
            Self(id)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for VersionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for VersionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// On-disk shape of a ledger, before validation.
#[derive(Debug, Clone, Deserialize)]
struct LedgerFile {
    current_version: VersionId,
    history: Vec<VersionId>,
    #[serde(default)]
    release_notes: BTreeMap<VersionId, String>,
}

impl TryFrom<LedgerFile> for VersionLedger {
    type Error = ConfigError;

    fn try_from(file: LedgerFile) -> Result<Self, Self::Error> {
        Self::new(file.current_version, file.history, file.release_notes)
    }
}

/// The validated version catalog injected into every classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LedgerFile")]
pub struct VersionLedger {
    current_version: VersionId,
    history: Vec<VersionId>,
    release_notes: BTreeMap<VersionId, String>,
    #[serde(skip)]
    positions: HashMap<VersionId, usize>,
}

impl VersionLedger {
    /// Build a ledger, rejecting an empty history, duplicate history entries,
    /// or a current version that is not part of the history.
    ///
    /// Release notes keyed by versions outside the history are dropped with a
    /// warning: they could never be shown to an operator.
    pub fn new(
        current_version: VersionId,
        history: Vec<VersionId>,
        release_notes: BTreeMap<VersionId, String>,
    ) -> Result<Self, ConfigError> {
        if history.is_empty() {
            return Err(ConfigError::EmptyHistory);
        }

        let mut positions = HashMap::with_capacity(history.len());
        for (idx, version) in history.iter().enumerate() {
            if positions.insert(version.clone(), idx).is_some() {
                return Err(ConfigError::DuplicateVersion(version.to_string()));
            }
        }

        let current_idx = positions
            .get(&current_version)
            .copied()
            .ok_or_else(|| ConfigError::CurrentVersionNotInHistory(current_version.to_string()))?;

        if current_idx + 1 != history.len() {
            tracing::debug!(
                current = %current_version,
                staged = history.len() - current_idx - 1,
                "ledger lists versions after the current version"
            );
        }

        let release_notes = release_notes
            .into_iter()
            .filter(|(version, _)| {
                let known = positions.contains_key(version);
                if !known {
                    tracing::warn!(
                        version = %version,
                        "ignoring release note for version not in ledger history"
                    );
                }
                known
            })
            .collect();

        Ok(Self {
            current_version,
            history,
            release_notes,
            positions,
        })
    }

    /// The version every operator should be on.
    pub fn current_version(&self) -> &VersionId {
        &self.current_version
    }

    /// All known versions, oldest first.
    pub fn history(&self) -> &[VersionId] {
        &self.history
    }

    /// Release notes for every version that has one, in identifier order.
    pub fn release_notes(&self) -> &BTreeMap<VersionId, String> {
        &self.release_notes
    }

    /// Release notes in history order, skipping versions without a note.
    pub fn release_notes_in_order(&self) -> impl Iterator<Item = (&VersionId, &str)> {
        self.history
            .iter()
            .filter_map(|v| self.release_notes.get(v).map(|note| (v, note.as_str())))
    }

    /// The release note recorded for `version`, if any.
    pub fn release_note(&self, version: &VersionId) -> Option<&str> {
        self.release_notes.get(version).map(String::as_str)
    }

    /// Position of `version` in the history, or `None` if unknown.
    pub fn position(&self, version: &VersionId) -> Option<usize> {
        self.positions.get(version).copied()
    }

    /// True when `version` is listed in the history.
    pub fn contains(&self, version: &VersionId) -> bool {
        self.positions.contains_key(version)
    }

    fn current_position(&self) -> usize {
        // Present by construction.
        self.positions
            .get(&self.current_version)
            .copied()
            .unwrap_or(self.history.len() - 1)
    }

    /// Ordinal distance from `version` to the current version, floored at zero.
    ///
    /// Returns `None` when `version` is not in the history.
    pub fn versions_behind(&self, version: &VersionId) -> Option<u32> {
        let idx = self.position(version)?;
        let behind = self.current_position().saturating_sub(idx);
        Some(u32::try_from(behind).unwrap_or(u32::MAX))
    }

    /// The versions released after `version`, up to and including the current
    /// version. Its length always equals [`versions_behind()`](Self::versions_behind).
    ///
    /// Returns `None` when `version` is not in the history.
    pub fn missed_versions(&self, version: &VersionId) -> Option<&[VersionId]> {
        let idx = self.position(version)?;
        let current = self.current_position();
        if idx >= current {
            Some(&self.history[..0])
        } else {
            Some(&self.history[idx + 1..=current])
        }
    }
}
