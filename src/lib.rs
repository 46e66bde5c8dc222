//! Boxplot report for benchmark timing logs.
//!
//! `generate` runs the whole pipeline: load the long-format CSV the
//! benchmark harness prints, pivot it into one column per tag, summarize
//! each column and draw a box-and-whisker chart to a PNG file.

pub mod config;
pub mod error;
pub mod log;
pub mod model;
pub mod render;

pub use config::{ConflictPolicy, ReportConfig};
pub use error::{ReportError, Result};
pub use model::{BoxStats, WideTable};

use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// What a successful `generate` produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    /// Plotted tags in chart order.
    pub tags: Vec<String>,
    pub y_bound: Option<f64>,
    /// False when no label font was available.
    pub labeled: bool,
    pub boxes: Vec<BoxStats>,
}

/// Load, reshape, render and save.
///
/// Nothing is written unless the input loads and pivots cleanly, and a
/// failed render leaves any existing chart in place.
pub fn generate(config: &ReportConfig) -> Result<ReportOutcome> {
    info!(input = %config.input.display(), "loading timing log");
    let records = log::parse_timing_file(&config.input)?;

    let mut wide = model::pivot(&records, config.on_duplicate)?;
    if let Some(filter) = &config.tag_filter {
        wide = wide.select_tags(filter);
    }
    debug!(
        records = records.len(),
        rows = wide.row_count(),
        columns = wide.column_count(),
        "pivoted timing log"
    );

    let boxes: Vec<BoxStats> = wide
        .tags()
        .filter_map(|tag| BoxStats::from_values(tag, &wide.column(tag)))
        .collect();

    render::ensure_parent_dir(&config.output)?;
    if let Some(summary) = &config.summary {
        render::ensure_parent_dir(summary)?;
    }

    let labeled = render::render_boxplot(&boxes, config, &config.output)?;
    info!(output = %config.output.display(), boxes = boxes.len(), "wrote boxplot");

    let outcome = ReportOutcome {
        input: config.input.clone(),
        output: config.output.clone(),
        rows: wide.row_count(),
        tags: boxes.iter().map(|b| b.tag.clone()).collect(),
        y_bound: config.y_bound(),
        labeled,
        boxes,
    };

    if let Some(summary) = &config.summary {
        render::write_summary(summary, &outcome)?;
        info!(summary = %summary.display(), "wrote summary");
    }

    Ok(outcome)
}
