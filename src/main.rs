use anyhow::Context;
use clap::Parser;
use perf_report::config::{
    DEFAULT_DPI, DEFAULT_FIGURE_SIZE, DEFAULT_FONT_SIZE, DEFAULT_INPUT, DEFAULT_OUTPUT,
    DEFAULT_Y_MAX,
};
use perf_report::{ConflictPolicy, ReportConfig};
use regex::Regex;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "perf-report")]
#[command(about = "Boxplot report for benchmark timing logs", long_about = None)]
struct Cli {
    /// Timing log: `ix, tag, time` per line, no header.
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Also write per-tag box statistics as JSON.
    #[arg(long)]
    summary: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_DPI, value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// Figure width in inches.
    #[arg(long, default_value_t = DEFAULT_FIGURE_SIZE.0)]
    width: f64,

    /// Figure height in inches.
    #[arg(long, default_value_t = DEFAULT_FIGURE_SIZE.1)]
    height: f64,

    /// Tick label size in points.
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    font_size: f64,

    /// Upper y-axis bound in nanoseconds.
    #[arg(long, default_value_t = DEFAULT_Y_MAX)]
    y_max: f64,

    /// Fit the y-axis to the data instead of clamping it to --y-max.
    #[arg(long)]
    unbounded: bool,

    #[arg(long, value_enum, default_value_t = ConflictPolicy::Reject)]
    on_duplicate: ConflictPolicy,

    /// Only plot tags matching this regex.
    #[arg(long)]
    tags: Option<String>,

    /// TrueType font for tick labels.
    #[arg(long)]
    font: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<ReportConfig> {
        let tag_filter = self
            .tags
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("invalid --tags pattern")?;

        Ok(ReportConfig {
            input: self.input,
            output: self.output,
            summary: self.summary,
            figure_size: (self.width, self.height),
            font_size: self.font_size,
            dpi: self.dpi,
            y_max: self.y_max,
            bounded: !self.unbounded,
            on_duplicate: self.on_duplicate,
            tag_filter,
            label_font: self.font,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_config()?;
    let outcome = perf_report::generate(&config)
        .with_context(|| format!("generate report from {}", config.input.display()))?;

    println!("Wrote {}", outcome.output.display());
    if let Some(summary) = &config.summary {
        println!("Wrote {}", summary.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_arguments_reproduces_harness_defaults() {
        let config = Cli::try_parse_from(["perf-report"]).unwrap().into_config().unwrap();
        let defaults = ReportConfig::default();
        assert_eq!(config.input, defaults.input);
        assert_eq!(config.output, defaults.output);
        assert_eq!(config.pixel_size(), defaults.pixel_size());
        assert_eq!(config.y_bound(), Some(DEFAULT_Y_MAX));
        assert_eq!(config.on_duplicate, ConflictPolicy::Reject);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Cli::try_parse_from([
            "perf-report",
            "--input",
            "a.csv",
            "-o",
            "b.png",
            "--unbounded",
            "--on-duplicate",
            "last",
            "--tags",
            "^load",
            "--dpi",
            "100",
        ])
        .unwrap()
        .into_config()
        .unwrap();
        assert_eq!(config.input, PathBuf::from("a.csv"));
        assert_eq!(config.output, PathBuf::from("b.png"));
        assert_eq!(config.y_bound(), None);
        assert_eq!(config.on_duplicate, ConflictPolicy::Last);
        assert_eq!(config.pixel_size(), (500, 500));
        assert!(config.tag_filter.unwrap().is_match("load_table"));
    }

    #[test]
    fn bad_tag_pattern_is_rejected() {
        let cli = Cli::try_parse_from(["perf-report", "--tags", "("]).unwrap();
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn zero_dpi_is_rejected() {
        assert!(Cli::try_parse_from(["perf-report", "--dpi", "0"]).is_err());
    }
}
