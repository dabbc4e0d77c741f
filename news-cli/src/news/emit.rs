//! Writing the rendered script to a timestamped file

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// What happened to the script file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    Written(PathBuf),
    /// The write failed; the run carries on without a file
    Failed { path: PathBuf, error: String },
}

/// `QUERY_<day>-<MONTH>-<year>_<HH>-<MM>.sql` for the given local time
pub fn file_name_for(at: NaiveDateTime) -> String {
    format!(
        "QUERY_{}-{}-{}_{:02}-{:02}.sql",
        at.day(),
        MONTH_NAMES[at.month0() as usize],
        at.year(),
        at.hour(),
        at.minute()
    )
}

/// Create the output directory if it doesn't exist
///
/// Only the last path component is created; a missing parent is an error.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Write the script into `dir`, named after `at`
///
/// Directory creation errors are returned; a failed write is logged and
/// reported as [`Emitted::Failed`] instead.
pub fn emit_script(dir: &Path, script: &str, at: NaiveDateTime) -> Result<Emitted> {
    info!("Generating the files.....");
    ensure_output_dir(dir)?;

    let path = dir.join(file_name_for(at));
    match fs::write(&path, script) {
        Ok(()) => {
            info!("File successfully created: {}", path.display());
            Ok(Emitted::Written(path))
        }
        Err(e) => {
            error!("Failed creating the file {}: {}", path.display(), e);
            Ok(Emitted::Failed {
                path,
                error: e.to_string(),
            })
        }
    }
}
