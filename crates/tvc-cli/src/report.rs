//! # Report Subcommand
//!
//! Runs the engine and emits the full compliance report, either as the
//! rendered markdown document or as the complete run serialized to JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::input::{execute, InputArgs};
use crate::write_output;

/// Output encodings for the report.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// The rendered markdown document.
    Markdown,
    /// Statuses, aggregates, notifications, and the report as JSON.
    Json,
}

/// Arguments for the report subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
    pub format: ReportFormat,

    /// Write to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute the report subcommand.
pub fn run_report(args: &ReportArgs, config: Option<&Path>) -> Result<u8> {
    let run = execute(&args.input, config)?;

    let rendered = match args.format {
        ReportFormat::Markdown => run.report.clone(),
        ReportFormat::Json => {
            let mut json = serde_json::to_string_pretty(&run).context("failed to serialize run")?;
            json.push('\n');
            json
        }
    };

    tracing::info!(digest = %run.report_digest(), "report rendered");

    match &args.out {
        Some(path) => {
            write_output(path, &rendered)?;
            eprintln!("Wrote report to {}", path.display());
            eprintln!("  report digest: {}", run.report_digest());
        }
        None => print!("{rendered}"),
    }

    Ok(0)
}
