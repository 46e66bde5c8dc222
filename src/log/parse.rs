use crate::error::{ReportError, Result};
use crate::log::row::{LongTable, TimingRecord};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const FIELDS_PER_RECORD: usize = 3;

/// Parse a timing log file into a long table.
///
/// Expected columns (comma-separated, no header):
/// ix  tag  time
///
/// Example (spacing as the benchmark harness prints it):
/// 0, load_table,83451234
pub fn parse_timing_file(path: &Path) -> Result<LongTable> {
    let file = File::open(path).map_err(|e| ReportError::read(path, None, e))?;
    parse_timing_reader(file, path)
}

/// Parse timing records from any reader. `source` is only used in errors.
pub fn parse_timing_reader<R: Read>(reader: R, source: &Path) -> Result<LongTable> {
    // Field counts are checked by hand so short rows report a line number
    // instead of csv's generic length mismatch.
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut out = LongTable::new();
    for result in rdr.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line());
            ReportError::read(source, line, e)
        })?;
        let lno = record.position().map(|p| p.line());

        if record.len() != FIELDS_PER_RECORD {
            return Err(ReportError::read(
                source,
                lno,
                format!(
                    "expected {} fields (ix, tag, time), found {}",
                    FIELDS_PER_RECORD,
                    record.len()
                ),
            ));
        }

        let row: TimingRecord = record.deserialize(None).map_err(|e| {
            ReportError::read(source, lno, format!("cannot parse {:?}: {}", record, e))
        })?;

        if !row.time.is_finite() {
            return Err(ReportError::read(
                source,
                lno,
                format!("time must be a finite number, got {:?}", row.time),
            ));
        }

        out.push(row);
    }

    debug!(records = out.len(), path = %source.display(), "parsed timing log");
    Ok(out)
}
