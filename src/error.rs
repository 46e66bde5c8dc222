//! Error kinds for the report pipeline.
//!
//! Every failure is terminal: the pipeline stops at the first error and the
//! caller decides how to report it.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Input missing, unreadable, or malformed.
    #[error("read error at {}: {reason}", location(path, *line))]
    Read {
        path: PathBuf,
        line: Option<u64>,
        reason: String,
    },

    /// Pivot cannot produce a well-defined cell.
    #[error("duplicate entry for index {ix}, tag {tag:?} (values {first} and {second})")]
    Reshape {
        ix: i64,
        tag: String,
        first: f64,
        second: f64,
    },

    #[error("render error: {reason}")]
    Render { reason: String },

    /// Output path cannot be created or written.
    #[error("write error at {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

impl ReportError {
    pub(crate) fn read(path: &Path, line: Option<u64>, reason: impl ToString) -> Self {
        ReportError::Read {
            path: path.to_path_buf(),
            line,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn render(reason: impl ToString) -> Self {
        ReportError::Render {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: &Path, reason: impl ToString) -> Self {
        ReportError::Write {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

fn location(path: &Path, line: Option<u64>) -> String {
    match line {
        Some(line) => format!("{}:{}", path.display(), line),
        None => path.display().to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
