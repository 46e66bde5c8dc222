//! Output layer: the boxplot bitmap and the optional JSON summary.

pub mod boxplot;
pub mod font;
pub mod summary;

pub use boxplot::render_boxplot;
pub use summary::write_summary;

use crate::error::{ReportError, Result};
use std::path::Path;

/// Fail early when the directory an output file goes into does not exist.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => Err(ReportError::write(
            path,
            format!("output directory {} does not exist", dir.display()),
        )),
        _ => Ok(()),
    }
}
