//! Report configuration.
//!
//! Defaults reproduce the fixed paths and plot constants the benchmark
//! harness expects: `build/test/perf.csv` in, a 5x5 inch chart at 300 DPI
//! out, y-axis capped at 0.5 s.

use clap::ValueEnum;
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "build/test/perf.csv";
pub const DEFAULT_OUTPUT: &str = "build/test/perf.png";

/// Figure size in inches (width, height).
pub const DEFAULT_FIGURE_SIZE: (f64, f64) = (5.0, 5.0);
/// Tick label size in points.
pub const DEFAULT_FONT_SIZE: f64 = 8.0;
pub const DEFAULT_DPI: u32 = 300;
/// Upper y-axis bound in nanoseconds.
pub const DEFAULT_Y_MAX: f64 = 500_000_000.0;

const POINTS_PER_INCH: f64 = 72.0;

/// What the pivot does when the same (index, tag) pair appears twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Fail with a reshape error.
    #[default]
    Reject,
    /// Keep the value that appears first in the file.
    First,
    /// Keep the value that appears last in the file.
    Last,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Optional JSON dump of the per-tag box statistics.
    pub summary: Option<PathBuf>,
    pub figure_size: (f64, f64),
    pub font_size: f64,
    pub dpi: u32,
    pub y_max: f64,
    /// Clamp the y-axis to `0..y_max` instead of fitting it to the data.
    pub bounded: bool,
    pub on_duplicate: ConflictPolicy,
    /// Only plot tags matching this pattern.
    pub tag_filter: Option<Regex>,
    /// TrueType font for tick labels. Probed from the system when unset.
    pub label_font: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            summary: None,
            figure_size: DEFAULT_FIGURE_SIZE,
            font_size: DEFAULT_FONT_SIZE,
            dpi: DEFAULT_DPI,
            y_max: DEFAULT_Y_MAX,
            bounded: true,
            on_duplicate: ConflictPolicy::default(),
            tag_filter: None,
            label_font: None,
        }
    }
}

impl ReportConfig {
    pub fn with_paths(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    /// Bitmap size in pixels. Never smaller than 1x1.
    pub fn pixel_size(&self) -> (u32, u32) {
        let (w, h) = self.figure_size;
        let dpi = f64::from(self.dpi);
        let px = |inches: f64| ((inches * dpi).round() as u32).max(1);
        (px(w), px(h))
    }

    /// Label font size converted from points to pixels.
    pub fn font_px(&self) -> f64 {
        self.font_size * f64::from(self.dpi) / POINTS_PER_INCH
    }

    /// Pixels per typographic point; used to scale line widths.
    pub fn px_per_point(&self) -> f64 {
        f64::from(self.dpi) / POINTS_PER_INCH
    }

    /// The y-axis bound actually applied, if any.
    pub fn y_bound(&self) -> Option<f64> {
        self.bounded.then_some(self.y_max)
    }
}
