//! # Status Subcommand
//!
//! A compact terminal view: one line per operator in roster order, then the
//! count per urgency tier.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use tvc_engine::{ComplianceRun, Urgency};

use crate::input::{execute, InputArgs};

/// Arguments for the status subcommand.
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only list operators whose tier needs attention (CRITICAL, HIGH, MEDIUM).
    #[arg(long)]
    pub actionable: bool,
}

/// Render the status listing.
pub fn format_status(run: &ComplianceRun, actionable_only: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:<10} {:>6} {:>6}  {}\n",
        "ID", "VERSION", "BEHIND", "DAYS", "URGENCY"
    ));
    for status in &run.statuses {
        if actionable_only && !status.urgency.is_actionable() {
            continue;
        }
        let behind = status
            .versions_behind
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        out.push_str(&format!(
            "{:<12} {:<10} {:>6} {:>6}  {}\n",
            status.operator_id,
            status.reported_version.as_str(),
            behind,
            status.days_since_active,
            status.urgency
        ));
    }
    out.push('\n');
    let tiers: Vec<String> = Urgency::all()
        .iter()
        .map(|tier| {
            let count = run.aggregate.summary.by_urgency.get(tier).copied().unwrap_or(0);
            format!("{tier}={count}")
        })
        .collect();
    out.push_str(&format!(
        "{} operators, {}% on {}: {}\n",
        run.aggregate.summary.total,
        run.aggregate.overall_percent(),
        run.current_version,
        tiers.join(" ")
    ));
    out
}

/// Execute the status subcommand.
pub fn run_status(args: &StatusArgs, config: Option<&Path>) -> Result<u8> {
    let run = execute(&args.input, config)?;
    print!("{}", format_status(&run, args.actionable));
    Ok(0)
}
