//! # tvc CLI entry point
//!
//! Parses command-line arguments, initializes tracing, and dispatches to the
//! subcommand handlers. Logs go to stderr; stdout carries only report output.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tvc_cli::notify::{run_notify, NotifyArgs};
use tvc_cli::report::{run_report, ReportArgs};
use tvc_cli::status::{run_status, StatusArgs};

/// Trainer version compliance: classify operators against the current
/// content version and produce the compliance report and notifications.
#[derive(Parser, Debug)]
#[command(name = "tvc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the engine configuration file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the full compliance report.
    Report(ReportArgs),

    /// Print one status line per operator.
    Status(StatusArgs),

    /// Print or write the outbound notifications.
    Notify(NotifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "tvc starting");

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Report(args) => run_report(args, config),
        Commands::Status(args) => run_status(args, config),
        Commands::Notify(args) => run_notify(args, config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvc_cli::report::ReportFormat;

    #[test]
    fn cli_parse_report_defaults() {
        let cli = Cli::try_parse_from([
            "tvc", "report", "--ledger", "ledger.yaml", "--roster", "roster.yaml",
        ])
        .unwrap();
        if let Commands::Report(args) = cli.command {
            assert_eq!(args.input.ledger, PathBuf::from("ledger.yaml"));
            assert_eq!(args.input.roster, PathBuf::from("roster.yaml"));
            assert!(args.input.as_of.is_none());
            assert!(args.input.stale_days.is_none());
            assert_eq!(args.format, ReportFormat::Markdown);
            assert!(args.out.is_none());
        } else {
            panic!("expected report command");
        }
    }

    #[test]
    fn cli_parse_report_all_options() {
        let cli = Cli::try_parse_from([
            "tvc",
            "report",
            "--ledger",
            "l.json",
            "--roster",
            "r.json",
            "--as-of",
            "2026-10-19",
            "--stale-days",
            "30",
            "--format",
            "json",
            "--out",
            "report.json",
        ])
        .unwrap();
        if let Commands::Report(args) = cli.command {
            assert_eq!(args.input.as_of.as_deref(), Some("2026-10-19"));
            assert_eq!(args.input.stale_days, Some(30));
            assert_eq!(args.format, ReportFormat::Json);
            assert_eq!(args.out, Some(PathBuf::from("report.json")));
        } else {
            panic!("expected report command");
        }
    }

    #[test]
    fn cli_parse_status_actionable() {
        let cli = Cli::try_parse_from([
            "tvc", "status", "--ledger", "l.yaml", "--roster", "r.yaml", "--actionable",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Status(ref a) if a.actionable));
    }

    #[test]
    fn cli_parse_notify_out_dir() {
        let cli = Cli::try_parse_from([
            "tvc", "notify", "--ledger", "l.yaml", "--roster", "r.yaml", "--out-dir", "outbox",
        ])
        .unwrap();
        if let Commands::Notify(args) = cli.command {
            assert_eq!(args.out_dir, Some(PathBuf::from("outbox")));
        } else {
            panic!("expected notify command");
        }
    }

    #[test]
    fn cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "tvc", "-vv", "--config", "tvc.yaml", "status", "--ledger", "l.yaml", "--roster",
            "r.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("tvc.yaml")));
    }

    #[test]
    fn cli_parse_missing_roster_errors() {
        assert!(Cli::try_parse_from(["tvc", "report", "--ledger", "l.yaml"]).is_err());
    }

    #[test]
    fn cli_parse_negative_stale_days_errors() {
        assert!(Cli::try_parse_from([
            "tvc", "status", "--ledger", "l.yaml", "--roster", "r.yaml", "--stale-days", "-5",
        ])
        .is_err());
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["tvc"]).is_err());
    }

    #[test]
    fn cli_parse_unknown_format_errors() {
        assert!(Cli::try_parse_from([
            "tvc", "report", "--ledger", "l", "--roster", "r", "--format", "html",
        ])
        .is_err());
    }
}
