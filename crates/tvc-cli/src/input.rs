//! # Input Loading
//!
//! Reads the ledger, roster, and engine configuration from YAML or JSON
//! files (chosen by extension; anything that is not `.json` is parsed as
//! YAML) and resolves the reference date. Rosters may also be `.csv`
//! exports with a header row.
//!
//! Roster file shape:
//!
//! ```yaml
//! - id: tr-001
//!   name: Amina Yusuf
//!   group: East
//!   current_version: "1.1"
//!   last_active_at: 2026-09-30
//!   activity_count: 14
//!   contact: amina@example.org
//! ```
//!
//! CSV rosters use the same column names (camelCase headers such as
//! `lastActiveAt` are accepted too). Empty cells read as blank values:
//!
//! ```text
//! id,name,group,current_version,last_active_at,activity_count,contact
//! tr-001,Amina Yusuf,East,1.1,2026-09-30,14,amina@example.org
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use tvc_core::{OperatorRecord, VersionLedger};
use tvc_engine::{ComplianceEngine, ComplianceRun, EngineConfig};

/// Input selection shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Version ledger file (YAML or JSON).
    #[arg(long)]
    pub ledger: PathBuf,

    /// Operator roster file (YAML or JSON list of records).
    #[arg(long)]
    pub roster: PathBuf,

    /// Reference date (YYYY-MM-DD). Defaults to today in local time.
    #[arg(long)]
    pub as_of: Option<String>,

    /// Override the configured staleness threshold, in days.
    #[arg(long)]
    pub stale_days: Option<u32>,
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn is_json(path: &Path) -> bool {
    has_extension(path, "json")
}

/// One CSV roster row. Every column is optional so that gaps surface as
/// record-level validation errors rather than parse failures.
#[derive(Debug, Deserialize)]
struct CsvRosterRow {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default, alias = "region")]
    group: String,
    #[serde(default, alias = "currentVersion", alias = "version")]
    current_version: String,
    #[serde(default, alias = "lastActiveAt")]
    last_active_at: String,
    #[serde(default, alias = "activityCount")]
    activity_count: Option<u32>,
    #[serde(default)]
    contact: Option<String>,
}

impl From<CsvRosterRow> for OperatorRecord {
    fn from(row: CsvRosterRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            group: row.group,
            current_version: row.current_version.into(),
            last_active_at: row.last_active_at,
            activity_count: row.activity_count.unwrap_or(0),
            contact: row.contact.filter(|c| !c.is_empty()),
        }
    }
}

/// Read a CSV roster with a header row.
pub fn load_csv_roster(path: &Path) -> Result<Vec<OperatorRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    reader
        .deserialize::<CsvRosterRow>()
        .map(|row| {
            row.map(OperatorRecord::from)
                .with_context(|| format!("failed to parse CSV {}", path.display()))
        })
        .collect()
}

/// Deserialize a YAML or JSON file.
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON {}", path.display()))
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML {}", path.display()))
    }
}

/// Load and validate the version ledger.
pub fn load_ledger(path: &Path) -> Result<VersionLedger> {
    let ledger: VersionLedger = load_file(path)?;
    tracing::debug!(
        path = %path.display(),
        versions = ledger.history().len(),
        current = %ledger.current_version(),
        "loaded ledger"
    );
    Ok(ledger)
}

/// Load the operator roster from YAML, JSON, or CSV.
pub fn load_roster(path: &Path) -> Result<Vec<OperatorRecord>> {
    let records: Vec<OperatorRecord> = if has_extension(path, "csv") {
        load_csv_roster(path)?
    } else {
        load_file(path)?
    };
    tracing::debug!(path = %path.display(), operators = records.len(), "loaded roster");
    Ok(records)
}

/// Load the engine configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => load_file(p),
        None => Ok(EngineConfig::default()),
    }
}

/// Parse `--as-of`, defaulting to today's local date.
pub fn resolve_as_of(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid --as-of date {s:?}; expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Load every input and run the engine.
pub fn execute(args: &InputArgs, config_path: Option<&Path>) -> Result<ComplianceRun> {
    let mut config = load_config(config_path)?;
    if let Some(days) = args.stale_days {
        config = config.with_staleness_threshold(days);
    }
    let as_of = resolve_as_of(args.as_of.as_deref())?;
    let ledger = load_ledger(&args.ledger)?;
    let roster = load_roster(&args.roster)?;

    let engine = ComplianceEngine::new(ledger, config)?;
    let run = engine.run(&roster, as_of)?;
    Ok(run)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::{Path, PathBuf};

    pub const LEDGER_YAML: &str = "\
current_version: \"1.2\"
history: [\"1.0\", \"1.1\", \"1.2\"]
release_notes:
  \"1.1\": New warm-up sequence
  \"1.2\": Revised safety module
";

    pub const ROSTER_YAML: &str = "\
- id: tr-001
  name: Amina Yusuf
  group: East
  current_version: \"1.0\"
  last_active_at: 2026-01-01
  activity_count: 14
  contact: amina@example.org
- id: tr-002
  name: Li Wei
  group: North
  current_version: \"1.2\"
  last_active_at: 2026-02-25
- id: tr-003
  name: Sam Okafor
  group: North
  current_version: \"0.9-beta\"
  last_active_at: 2026-02-20
";

    /// Write ledger and roster fixtures into `dir`.
    pub fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let ledger = dir.join("ledger.yaml");
        let roster = dir.join("roster.yaml");
        std::fs::write(&ledger, LEDGER_YAML).unwrap();
        std::fs::write(&roster, ROSTER_YAML).unwrap();
        (ledger, roster)
    }
}
