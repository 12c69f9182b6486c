//! Loader for simulated total_current files
//!
//! Whitespace-delimited numeric columns `[iteration, time, jx, jy, ...]`,
//! time in atomic units. Which file the user picked is the front end's
//! concern; this loader only parses and validates.

use std::fs;
use std::path::Path;

use crate::error::CoreError;
use crate::signal::TimeSeries;

const TIME_COLUMN: usize = 1;
const JX_COLUMN: usize = 2;
const JY_COLUMN: usize = 3;
const MIN_COLUMNS: usize = 4;

/// Load a total_current file into a validated series.
pub fn load_total_current(path: &Path) -> Result<TimeSeries, CoreError> {
    load_decimated(path, 1)
}

/// Load every `stride`-th row of a total_current file.
///
/// The time-frequency path reads decimated data to keep the map tractable.
pub fn load_decimated(path: &Path, stride: usize) -> Result<TimeSeries, CoreError> {
    if stride == 0 {
        return Err(CoreError::Precondition(
            "decimation stride must be at least 1".into(),
        ));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        CoreError::InvalidInput(format!("failed to read {}: {e}", path.display()))
    })?;

    let mut t = Vec::new();
    let mut jx = Vec::new();
    let mut jy = Vec::new();
    let mut row = 0usize;

    for (line_no, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_COLUMNS {
            return Err(CoreError::InvalidInput(format!(
                "line {}: expected at least {MIN_COLUMNS} columns, got {}",
                line_no + 1,
                fields.len()
            )));
        }

        if row % stride == 0 {
            let parse = |col: usize| -> Result<f64, CoreError> {
                fields[col].parse().map_err(|_| {
                    CoreError::InvalidInput(format!(
                        "line {}: invalid number {:?}",
                        line_no + 1,
                        fields[col]
                    ))
                })
            };
            t.push(parse(TIME_COLUMN)?);
            jx.push(parse(JX_COLUMN)?);
            jy.push(parse(JY_COLUMN)?);
        }
        row += 1;
    }

    if row == 0 {
        return Err(CoreError::InvalidInput(format!(
            "{} contains no data rows",
            path.display()
        )));
    }

    log::debug!(
        "loaded {} of {row} rows from {} (stride {stride})",
        t.len(),
        path.display()
    );
    TimeSeries::new(t, jx, jy)
}
