use std::{error::Error, ops::Range, path::Path};

use gwpost_stats::histogram::Histogram;
use plotters::{coord::Shift, prelude::*};

use crate::PlotError;

pub(crate) type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
pub(crate) type DrawResult = Result<(), Box<dyn Error>>;

pub(crate) const DEFAULT_SIZE: (u32, u32) = (800, 600);

/// Colors cycled through when series are not given one explicitly.
pub const SERIES_COLORS: [RGBColor; 6] = [BLUE, RED, GREEN, BLACK, MAGENTA, CYAN];

/// The `index`-th color of [`SERIES_COLORS`], wrapping around.
#[must_use]
pub fn series_color(index: usize) -> RGBColor {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// Renders a figure into an SVG file at `path`.
pub(crate) fn render_svg<F>(path: &Path, size: (u32, u32), draw: F) -> Result<(), PlotError>
where
    F: FnOnce(&Area<'_>) -> DrawResult,
{
    log::debug!("Writing figure {}", path.display());
    let root = SVGBackend::new(path, size).into_drawing_area();
    let result = (|| -> DrawResult {
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
        Ok(())
    })();
    result.map_err(|e| PlotError::Drawing {
        path: path.to_owned(),
        message: e.to_string(),
    })
}

/// Range spanning the finite `values` with a 5% margin on each side.
///
/// A single distinct value is widened to a unit interval around it.
pub(crate) fn padded_range<I>(values: I) -> Option<Range<f64>>
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    if max - min <= f64::EPSILON * max.abs().max(1.0) {
        return Some(min - 0.5..max + 0.5);
    }
    let margin = 0.05 * (max - min);
    Some(min - margin..max + margin)
}

/// Upper bound for a count axis starting at zero.
pub(crate) fn count_axis_max(max_value: f64) -> f64 {
    if max_value.is_finite() && max_value > 0.0 {
        max_value * 1.1
    } else {
        1.0
    }
}

/// Points of a "post" step line: each value holds until the next abscissa.
pub(crate) fn step_post(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(2 * xs.len());
    for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
        points.push((x, y));
        if let Some(&next) = xs.get(i + 1) {
            points.push((next, y));
        }
    }
    points
}

/// Outline of a step histogram with bar `heights`, closed down to zero.
pub(crate) fn histogram_outline(histogram: &Histogram, heights: &[f64]) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(2 * histogram.bins.len() + 2);
    for (bin, &height) in histogram.bins.iter().zip(heights) {
        if points.is_empty() {
            points.push((bin.range.start, 0.0));
        }
        points.push((bin.range.start, height));
        points.push((bin.range.end, height));
    }
    if let Some(bin) = histogram.bins.last() {
        points.push((bin.range.end, 0.0));
    }
    points
}
