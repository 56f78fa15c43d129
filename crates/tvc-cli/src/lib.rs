//! # tvc-cli — Command-Line Interface
//!
//! Provides the `tvc` binary. This crate is the I/O boundary around the
//! engine: it reads the ledger, roster, and configuration files, picks the
//! reference date, and writes whatever the engine returns. No classification
//! logic lives here.
//!
//! ## Subcommands
//!
//! - `tvc report`: full markdown (or JSON) compliance report.
//! - `tvc status`: one line per operator, in roster order.
//! - `tvc notify`: the outbound messages, printed or written one file each.
//!
//! ```bash
//! tvc report --ledger ledger.yaml --roster trainers.yaml --out report.md
//! tvc status --ledger ledger.yaml --roster trainers.yaml --stale-days 30
//! tvc notify --ledger ledger.yaml --roster trainers.yaml --out-dir outbox/
//! ```

pub mod input;
pub mod notify;
pub mod report;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Write `contents` to `path`, creating parent directories.
///
/// The file is written in full or not at all from the caller's perspective:
/// output is staged in a sibling temporary file and renamed into place.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let staging = staging_path(path);
    std::fs::write(&staging, contents)
        .with_context(|| format!("failed to write: {}", staging.display()))?;
    std::fs::rename(&staging, path)
        .with_context(|| format!("failed to move output into place: {}", path.display()))?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_output_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("report.md");
        write_output(&target, "# Report\n").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "# Report\n");
        assert!(!dir.path().join("nested").join("report.md.partial").exists());
    }

    #[test]
    fn write_output_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.md");
        std::fs::write(&target, "old").unwrap();
        write_output(&target, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn public_modules_are_accessible() {
        let _ = std::any::type_name::<input::InputArgs>();
        let _ = std::any::type_name::<report::ReportArgs>();
        let _ = std::any::type_name::<status::StatusArgs>();
        let _ = std::any::type_name::<notify::NotifyArgs>();
    }
}
