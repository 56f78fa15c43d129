//! # tvc-engine — Version Compliance & Notification Engine
//!
//! Classifies every operator on a roster against the version ledger, renders
//! tiered notifications for operators who are behind, aggregates compliance
//! by group, and renders a markdown report.
//!
//! - **Urgency** (`urgency.rs`): the closed set of tiers and their severity
//!   order.
//! - **Rules** (`rules.rs`): the tiering policy as an ordered
//!   `(condition → tier)` table.
//! - **Classifier** (`classifier.rs`): record → [`ComplianceStatus`].
//! - **Notification** (`notification.rs`): status → subject and body, plus
//!   manual follow-up entries for unknown versions.
//! - **Aggregate** (`aggregate.rs`): single-pass global and per-group counts.
//! - **Report** (`report.rs`): deterministic markdown rendering.
//! - **Engine** (`engine.rs`): validates, runs all of the above, returns a
//!   [`ComplianceRun`].
//!
//! ## Crate Policy
//!
//! - No I/O. Inputs arrive deserialized; outputs are returned as values.
//! - No clock reads. The reference date is always an argument.
//! - Every `match` on [`Urgency`] is exhaustive.

pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod notification;
pub mod report;
pub mod rules;
pub mod urgency;

pub use aggregate::{aggregate, AggregateStats, ComplianceSummary, GroupStats};
pub use classifier::{Classifier, ComplianceStatus};
pub use config::{EngineConfig, NotificationSettings};
pub use engine::{ComplianceEngine, ComplianceRun};
pub use notification::{render_notification, ManualReview, Notification};
pub use report::{render_report, sort_by_severity, ReportInput};
pub use rules::{RuleInput, RuleTable, UrgencyRule, DEFAULT_RULES, FALLBACK_RULE};
pub use urgency::Urgency;
