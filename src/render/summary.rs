//! JSON summary of what was plotted.

use crate::ReportOutcome;
use crate::error::{ReportError, Result};
use std::fs;
use std::path::Path;

/// Write the report outcome (tags, box statistics, bound) as pretty JSON.
pub fn write_summary(path: &Path, outcome: &ReportOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome).map_err(|e| ReportError::write(path, e))?;
    fs::write(path, json).map_err(|e| ReportError::write(path, e))
}
