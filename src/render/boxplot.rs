//! Box-and-whisker chart rendered to a PNG bitmap.

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::model::BoxStats;
use crate::render::font;
use plotters::prelude::*;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

const BOX_COLOR: RGBColor = RGBColor(31, 119, 180);
const MEDIAN_COLOR: RGBColor = RGBColor(255, 127, 14);

/// Half widths in x-axis units; boxes sit on integer positions 1..=n.
const BOX_HALF_WIDTH: f64 = 0.25;
const CAP_HALF_WIDTH: f64 = 0.125;

/// Extra room above the tallest sample when the y-axis is fitted.
const HEADROOM: f64 = 0.05;

/// Outlier marker radius in points.
const FLIER_RADIUS_PT: f64 = 3.0;

/// Draw one box per entry of `stats` and save the chart to `output`.
///
/// Returns whether tick labels were drawn (they need a font).
pub fn render_boxplot(stats: &[BoxStats], config: &ReportConfig, output: &Path) -> Result<bool> {
    if stats.is_empty() {
        return Err(ReportError::render("no tag columns to plot"));
    }

    let (y_lo, y_hi) = y_range(stats, config.y_bound())?;
    let family = font::label_family(config.label_font.as_deref())?;

    let (width, height) = config.pixel_size();
    let font_px = config.font_px();
    let line_px = config.px_per_point().round().max(1.0) as u32;
    let flier_px = (FLIER_RADIUS_PT * config.px_per_point()).round().max(1.0) as u32;
    debug!(width, height, y_lo, y_hi, boxes = stats.len(), "rendering boxplot");

    // Drawn into a sibling temp file and moved into place once complete, so
    // a failed render never leaves a partial chart at `output`.
    let staging = staging_file(output)?;
    let root = BitMapBackend::new(staging.path(), (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(ReportError::render)?;

    let n = stats.len();
    let mut builder = ChartBuilder::on(&root);
    builder.margin(font_px.round() as u32);
    if family.is_some() {
        builder
            .x_label_area_size((font_px * 2.5).round() as u32)
            .y_label_area_size((font_px * 5.0).round() as u32);
    }
    let mut chart = builder
        .build_cartesian_2d(0.5..n as f64 + 0.5, y_lo..y_hi)
        .map_err(ReportError::render)?;

    if let Some(family) = family {
        let tag_at = |x: &f64| tag_label(stats, *x);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(n)
            .y_labels(6)
            .x_label_formatter(&tag_at)
            .y_label_formatter(&|y| format_tick(*y))
            .label_style((family, font_px))
            .axis_style(BLACK.stroke_width(line_px))
            .draw()
            .map_err(ReportError::render)?;
    }

    // Frame around the plotting area; drawn even without labels.
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(0.5, y_lo), (n as f64 + 0.5, y_hi)],
            BLACK.stroke_width(line_px),
        )))
        .map_err(ReportError::render)?;

    // Values past the y range are pinned to its edge; data is untouched.
    let clip = |v: f64| v.clamp(y_lo, y_hi);
    let box_style = BOX_COLOR.stroke_width(line_px);

    chart
        .draw_series(stats.iter().zip(1u32..).map(|(s, pos)| {
            let x = f64::from(pos);
            Rectangle::new(
                [(x - BOX_HALF_WIDTH, clip(s.q1)), (x + BOX_HALF_WIDTH, clip(s.q3))],
                box_style,
            )
        }))
        .map_err(ReportError::render)?;

    chart
        .draw_series(stats.iter().zip(1u32..).flat_map(|(s, pos)| {
            let x = f64::from(pos);
            let (q1, q3) = (clip(s.q1), clip(s.q3));
            let (lo, hi) = (clip(s.whisker_low), clip(s.whisker_high));
            [
                PathElement::new(vec![(x, q1), (x, lo)], box_style),
                PathElement::new(vec![(x, q3), (x, hi)], box_style),
                PathElement::new(
                    vec![(x - CAP_HALF_WIDTH, lo), (x + CAP_HALF_WIDTH, lo)],
                    box_style,
                ),
                PathElement::new(
                    vec![(x - CAP_HALF_WIDTH, hi), (x + CAP_HALF_WIDTH, hi)],
                    box_style,
                ),
            ]
        }))
        .map_err(ReportError::render)?;

    chart
        .draw_series(stats.iter().zip(1u32..).map(|(s, pos)| {
            let x = f64::from(pos);
            let m = clip(s.median);
            PathElement::new(
                vec![(x - BOX_HALF_WIDTH, m), (x + BOX_HALF_WIDTH, m)],
                MEDIAN_COLOR.stroke_width(line_px),
            )
        }))
        .map_err(ReportError::render)?;

    // Outliers beyond the bound are not drawn at all.
    chart
        .draw_series(stats.iter().zip(1u32..).flat_map(|(s, pos)| {
            let x = f64::from(pos);
            s.outliers
                .iter()
                .copied()
                .filter(move |v| (y_lo..=y_hi).contains(v))
                .map(move |v| Circle::new((x, v), flier_px, BLACK.stroke_width(line_px)))
        }))
        .map_err(ReportError::render)?;

    root.present().map_err(|e| ReportError::write(output, e))?;
    drop(chart);
    drop(root);
    staging
        .persist(output)
        .map_err(|e| ReportError::write(output, e.error))?;
    Ok(family.is_some())
}

/// Temp file next to `output`; removed on drop unless persisted.
fn staging_file(output: &Path) -> Result<NamedTempFile> {
    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    tempfile::Builder::new()
        .prefix(".perf-report-")
        .suffix(".png")
        .tempfile_in(dir)
        .map_err(|e| ReportError::write(output, e))
}

/// Tag for a box position. Ticks off the integer positions stay blank.
fn tag_label(stats: &[BoxStats], x: f64) -> String {
    let pos = x.round();
    if (x - pos).abs() > 1e-6 || pos < 1.0 {
        return String::new();
    }
    stats
        .get(pos as usize - 1)
        .map(|s| s.tag.clone())
        .unwrap_or_default()
}

/// Y-axis range: `0..bound` when bounded, otherwise fitted to the data.
fn y_range(stats: &[BoxStats], bound: Option<f64>) -> Result<(f64, f64)> {
    if let Some(bound) = bound {
        if !(bound.is_finite() && bound > 0.0) {
            return Err(ReportError::render(format!(
                "y-axis bound must be a positive number, got {}",
                bound
            )));
        }
        return Ok((0.0, bound));
    }

    let lo = stats.iter().map(|s| s.min).fold(0.0, f64::min);
    let hi = stats.iter().map(|s| s.max).fold(f64::MIN, f64::max);
    let span = if hi > lo { hi - lo } else { hi.abs().max(1.0) };
    let pad = span * HEADROOM;
    let lo = if lo < 0.0 { lo - pad } else { lo };
    let hi = hi.max(lo) + pad;
    if !(lo.is_finite() && hi.is_finite()) {
        return Err(ReportError::render(format!(
            "cannot fit y-axis to non-finite range {}..{}",
            lo, hi
        )));
    }
    Ok((lo, hi))
}

/// Timing values are nanoseconds; large ones read better in e-notation.
fn format_tick(y: f64) -> String {
    if y != 0.0 && y.abs() >= 1e6 {
        format!("{:.1e}", y)
    } else {
        format!("{:.0}", y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stats(tag: &str, values: &[f64]) -> BoxStats {
        BoxStats::from_values(tag, values).unwrap()
    }

    #[test]
    fn bounded_range_starts_at_zero() {
        let s = vec![stats("a", &[1.0, 2.0])];
        assert_eq!(y_range(&s, Some(500.0)).unwrap(), (0.0, 500.0));
    }

    #[test]
    fn bounded_range_rejects_non_positive_bound() {
        let s = vec![stats("a", &[1.0])];
        assert!(matches!(y_range(&s, Some(0.0)), Err(ReportError::Render { .. })));
        assert!(matches!(y_range(&s, Some(f64::NAN)), Err(ReportError::Render { .. })));
    }

    #[test]
    fn fitted_range_covers_all_samples_with_headroom() {
        let s = vec![stats("a", &[10.0, 20.0]), stats("b", &[5.0, 100.0])];
        let (lo, hi) = y_range(&s, None).unwrap();
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 105.0);
    }

    #[test]
    fn fitted_range_handles_constant_zero() {
        let s = vec![stats("a", &[0.0, 0.0])];
        let (lo, hi) = y_range(&s, None).unwrap();
        assert!(hi > lo);
    }

    #[test]
    fn fitted_range_pads_negative_values() {
        let s = vec![stats("a", &[-10.0, 10.0])];
        let (lo, hi) = y_range(&s, None).unwrap();
        assert_eq!((lo, hi), (-11.0, 11.0));
    }

    #[test]
    fn fitted_range_rejects_infinite_samples() {
        let s = vec![stats("a", &[1.0, f64::INFINITY])];
        assert!(matches!(y_range(&s, None), Err(ReportError::Render { .. })));
        let s = vec![stats("a", &[f64::NEG_INFINITY, 1.0])];
        assert!(matches!(y_range(&s, None), Err(ReportError::Render { .. })));
    }

    #[test]
    fn tag_labels_only_on_box_positions() {
        let s = vec![stats("load", &[1.0]), stats("query", &[2.0])];
        assert_eq!(tag_label(&s, 1.0), "load");
        assert_eq!(tag_label(&s, 2.0000000001), "query");
        assert_eq!(tag_label(&s, 1.5), "");
        assert_eq!(tag_label(&s, 0.5), "");
        assert_eq!(tag_label(&s, 3.0), "");
    }

    #[test]
    fn ticks_switch_to_exponent_for_nanosecond_scale() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(1500.0), "1500");
        assert_eq!(format_tick(500_000_000.0), "5.0e8");
    }

    #[test]
    fn empty_stats_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.png");
        let err = render_boxplot(&[], &ReportConfig::default(), &out).unwrap_err();
        assert!(matches!(err, ReportError::Render { .. }));
        assert!(!out.exists());
    }
}
