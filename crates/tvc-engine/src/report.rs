//! # Report Renderer
//!
//! Renders a complete run into a single markdown document:
//!
//! 1. Summary table (plus counts per urgency tier)
//! 2. Compliance by group
//! 3. Operator status, most urgent first
//! 4. Manual follow-up for unknown versions
//! 5. One section per outbound notification
//! 6. Release notes reference
//!
//! Rendering is total and deterministic. The operator table is ordered by
//! [`Urgency::rank()`] with a stable sort, so operators in the same tier keep
//! their roster order and reruns produce identical bytes.

use chrono::NaiveDate;

use tvc_core::{OperatorRecord, VersionLedger};

use crate::aggregate::AggregateStats;
use crate::classifier::ComplianceStatus;
use crate::notification::{ManualReview, Notification};
use crate::urgency::Urgency;

/// Everything the report shows. `records` and `statuses` are parallel slices
/// in roster order.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    /// Reference date of the run.
    pub as_of: NaiveDate,
    /// Ledger used for classification.
    pub ledger: &'a VersionLedger,
    /// Staleness threshold used for classification.
    pub staleness_threshold_days: u32,
    /// Roster, in input order.
    pub records: &'a [OperatorRecord],
    /// Statuses, parallel to `records`.
    pub statuses: &'a [ComplianceStatus],
    /// Aggregated statistics.
    pub aggregate: &'a AggregateStats,
    /// Rendered notifications, in roster order.
    pub notifications: &'a [Notification],
    /// Operators needing manual follow-up.
    pub manual_review: &'a [ManualReview],
}

/// Pair records with statuses and order them most urgent first, keeping
/// roster order within a tier.
pub fn sort_by_severity<'a>(
    records: &'a [OperatorRecord],
    statuses: &'a [ComplianceStatus],
) -> Vec<(&'a OperatorRecord, &'a ComplianceStatus)> {
    let mut rows: Vec<_> = records.iter().zip(statuses.iter()).collect();
    // `sort_by_key` is stable.
    rows.sort_by_key(|(_, status)| status.urgency.rank());
    rows
}

/// Markdown table cell: pipes escaped, line breaks flattened.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// A backtick fence longer than any backtick run inside `body`, so the body
/// cannot close it early.
fn code_fence(body: &str) -> String {
    let longest = body.split(|c| c != '`').map(str::len).max().unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Render the full report.
pub fn render_report(input: &ReportInput<'_>) -> String {
    let mut out = String::new();
    let summary = &input.aggregate.summary;
    let threshold = input.staleness_threshold_days;

    out.push_str("# Trainer Content Compliance Report\n");
    out.push('\n');
    out.push_str(&format!(
        "As of {}. Current version: **{}**. Staleness threshold: {} days.\n",
        input.as_of,
        input.ledger.current_version(),
        threshold
    ));
    out.push('\n');

    // ---- Summary ----
    out.push_str("## Summary\n");
    out.push('\n');
    out.push_str("| Metric | Count |\n");
    out.push_str("|--------|------:|\n");
    out.push_str(&format!("| Total operators | {} |\n", summary.total));
    out.push_str(&format!(
        "| On current version | {} ({}%) |\n",
        summary.current,
        input.aggregate.overall_percent()
    ));
    out.push_str(&format!("| One version behind | {} |\n", summary.one_behind));
    out.push_str(&format!(
        "| Two or more versions behind | {} |\n",
        summary.two_or_more_behind
    ));
    out.push_str(&format!("| Unknown version | {} |\n", summary.unknown_version));
    out.push_str(&format!(
        "| Stale (over {threshold} days inactive) | {} |\n",
        summary.stale
    ));
    out.push_str(&format!(
        "| Notifications to send | {} |\n",
        summary.needs_notification
    ));
    out.push('\n');

    out.push_str("### By urgency\n");
    out.push('\n');
    out.push_str("| Urgency | Operators |\n");
    out.push_str("|---------|----------:|\n");
    for tier in Urgency::all() {
        let count = summary.by_urgency.get(tier).copied().unwrap_or(0);
        out.push_str(&format!("| {tier} | {count} |\n"));
    }
    out.push('\n');

    // ---- Groups ----
    out.push_str("## Compliance by group\n");
    out.push('\n');
    if input.aggregate.groups.is_empty() {
        out.push_str("_No operators._\n");
    } else {
        out.push_str("| Group | Operators | Current | Compliance |\n");
        out.push_str("|-------|----------:|--------:|-----------:|\n");
        for group in &input.aggregate.groups {
            out.push_str(&format!(
                "| {} | {} | {} | {}% |\n",
                cell(&group.group),
                group.total,
                group.current,
                group.compliance_percent()
            ));
        }
    }
    out.push('\n');

    // ---- Operators ----
    out.push_str("## Operator status\n");
    out.push('\n');
    let rows = sort_by_severity(input.records, input.statuses);
    if rows.is_empty() {
        out.push_str("_No operators._\n");
    } else {
        out.push_str(
            "| Urgency | ID | Name | Group | Version | Behind | Last active | Days | Stale |\n",
        );
        out.push_str(
            "|---------|----|------|-------|---------|-------:|-------------|-----:|-------|\n",
        );
        for (record, status) in rows {
            let behind = status
                .versions_behind
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string());
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
                status.urgency,
                cell(&record.id),
                cell(&record.name),
                cell(record.group_label()),
                cell(status.reported_version.as_str()),
                behind,
                status.last_active_on,
                status.days_since_active,
                yes_no(status.is_stale)
            ));
        }
    }
    out.push('\n');

    // ---- Manual follow-up ----
    out.push_str("## Manual follow-up\n");
    out.push('\n');
    if input.manual_review.is_empty() {
        out.push_str("_None._\n");
    } else {
        out.push_str(
            "These operators reported a version that is not in the ledger. Confirm what they \
             are running before contacting them.\n",
        );
        out.push('\n');
        for review in input.manual_review {
            out.push_str(&format!(
                "- **{}** (`{}`, {}) reported version `{}`\n",
                review.operator_name, review.operator_id, review.group, review.reported_version
            ));
        }
    }
    out.push('\n');

    // ---- Notifications ----
    out.push_str("## Notifications\n");
    out.push('\n');
    if input.notifications.is_empty() {
        out.push_str("_No notifications to send._\n");
        out.push('\n');
    }
    for note in input.notifications {
        out.push_str(&format!(
            "### {} (`{}`): {}\n",
            note.operator_name, note.operator_id, note.urgency
        ));
        out.push('\n');
        if let Some(contact) = &note.contact {
            out.push_str(&format!("**To:** {contact}  \n"));
        }
        out.push_str(&format!("**Subject:** {}\n", note.subject));
        out.push('\n');
        let fence = code_fence(&note.body);
        out.push_str(&format!("{fence}text\n"));
        out.push_str(&note.body);
        if !note.body.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("{fence}\n"));
        out.push('\n');
    }

    // ---- Release notes ----
    out.push_str("## Release notes\n");
    out.push('\n');
    let current = input.ledger.current_version();
    for version in input.ledger.history() {
        let marker = if version == current { " (current)" } else { "" };
        match input.ledger.release_note(version) {
            Some(note) => out.push_str(&format!("- **{version}**{marker}: {note}\n")),
            None => out.push_str(&format!("- **{version}**{marker}: _no notes recorded_\n")),
        }
    }

    out
}
