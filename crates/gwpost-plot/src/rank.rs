//! Rank distributions of classifier outputs.
//!
//! Both figures have two panels sharing the rank axis `[0, 1]`: the lower
//! panel shows the distribution itself, the upper one its running integral.

use std::path::Path;

use gwpost_stats::{
    histogram::{Histogram, linear_space},
    kde::cumulative_trapezoid,
};
use plotters::prelude::*;

use crate::{
    PlotError,
    figure::{Area, DrawResult, count_axis_max, histogram_outline, render_svg},
};

const FIGURE_SIZE: (u32, u32) = (800, 800);

/// Number of rank samples of the cumulative panel of [`RankHistFigure`].
pub const CUMULATIVE_SAMPLES: usize = 501;

/// Number of rank bins for a total weight of `total` with about `per_bin`
/// events per bin, never fewer than 5.
///
/// ```
/// use gwpost_plot::rank::rank_bin_count;
///
/// assert_eq!(rank_bin_count(12.0, 10.0), 5);
/// assert_eq!(rank_bin_count(237.0, 10.0), 23);
/// ```
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn rank_bin_count(total: f64, per_bin: f64) -> usize {
    let bins = (total / per_bin).floor();
    if bins.is_finite() && bins > 5.0 {
        bins as usize
    } else {
        5
    }
}

/// Total count of events with rank at or below each of `samples`.
///
/// # Panics
///
/// Panics if `ranks` and `counts` differ in length.
#[must_use]
pub fn cumulative_counts(ranks: &[f64], counts: &[f64], samples: &[f64]) -> Vec<f64> {
    assert_eq!(ranks.len(), counts.len(), "ranks must match counts in length");
    samples
        .iter()
        .map(|x| {
            ranks
                .iter()
                .zip(counts)
                .filter(|(r, _)| *r <= x)
                .map(|(_, c)| c)
                .sum()
        })
        .collect()
}

#[derive(Debug, Clone)]
struct Panels {
    lower: Vec<(f64, f64)>,
    upper: Vec<(f64, f64)>,
    color: RGBColor,
    label: Option<String>,
}

fn draw_panels(
    root: &Area<'_>,
    series: &[Panels],
    lower_desc: &str,
    upper_desc: &str,
) -> DrawResult {
    let areas = root.split_evenly((2, 1));
    let lower_max = series
        .iter()
        .flat_map(|s| &s.lower)
        .map(|(_, y)| *y)
        .fold(0.0, f64::max);
    let upper_max = series
        .iter()
        .flat_map(|s| &s.upper)
        .map(|(_, y)| *y)
        .fold(0.0, f64::max);

    let mut upper = ChartBuilder::on(&areas[0])
        .margin(15)
        .x_label_area_size(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..count_axis_max(upper_max))?;
    upper
        .configure_mesh()
        .x_label_formatter(&|_| String::new())
        .y_desc(upper_desc)
        .draw()?;

    let mut lower = ChartBuilder::on(&areas[1])
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..count_axis_max(lower_max))?;
    lower
        .configure_mesh()
        .x_desc("rank")
        .y_desc(lower_desc)
        .draw()?;

    for s in series {
        let color = s.color;
        upper.draw_series(LineSeries::new(s.upper.iter().copied(), color))?;
        let drawn = lower.draw_series(LineSeries::new(s.lower.iter().copied(), color))?;
        if let Some(label) = &s.label {
            drawn
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
    }
    if series.iter().any(|s| s.label.is_some()) {
        lower
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

/// Weighted rank histogram with a cumulative count panel.
#[derive(Debug, Clone)]
pub struct RankHistFigure {
    per_bin: f64,
    series: Vec<Panels>,
}

impl RankHistFigure {
    /// Creates an empty figure aiming at `per_bin` events per histogram bin.
    #[must_use]
    pub fn new(per_bin: f64) -> Self {
        Self {
            per_bin,
            series: Vec::new(),
        }
    }

    /// Adds the events with `ranks`, each standing for `counts` events.
    pub fn add(
        &mut self,
        ranks: &[f64],
        counts: &[f64],
        color: RGBColor,
        label: Option<&str>,
    ) -> Result<&mut Self, PlotError> {
        PlotError::check_lengths(ranks.len(), counts.len())?;
        let total = counts.iter().sum::<f64>();
        let edges = linear_space(0.0, 1.0, rank_bin_count(total, self.per_bin));
        let histogram = Histogram::from_edges(ranks, Some(counts), &edges);

        let samples = linear_space(0.0, 1.0, CUMULATIVE_SAMPLES - 1);
        let cumulative = cumulative_counts(ranks, counts, &samples);

        self.series.push(Panels {
            lower: histogram_outline(&histogram, &histogram.counts()),
            upper: samples.into_iter().zip(cumulative).collect(),
            color,
            label: label.map(str::to_owned),
        });
        Ok(self)
    }

    pub fn save<P>(&self, path: P) -> Result<(), PlotError>
    where
        P: AsRef<Path>,
    {
        if self.series.is_empty() {
            return Err(PlotError::Empty {
                what: "rank histogram",
            });
        }
        render_svg(path.as_ref(), FIGURE_SIZE, |root| {
            draw_panels(root, &self.series, "count", "cumulative count")
        })
    }
}

/// Rank density with a cumulative fraction panel.
#[derive(Debug, Clone, Default)]
pub struct RankKdeFigure {
    series: Vec<Panels>,
}

impl RankKdeFigure {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a density `pdf` sampled at ascending `ranks`.
    pub fn add(
        &mut self,
        ranks: &[f64],
        pdf: &[f64],
        color: RGBColor,
        label: Option<&str>,
    ) -> Result<&mut Self, PlotError> {
        PlotError::check_lengths(ranks.len(), pdf.len())?;
        let cumulative = cumulative_trapezoid(ranks, pdf);
        self.series.push(Panels {
            lower: ranks.iter().copied().zip(pdf.iter().copied()).collect(),
            upper: ranks.iter().copied().zip(cumulative).collect(),
            color,
            label: label.map(str::to_owned),
        });
        Ok(self)
    }

    pub fn save<P>(&self, path: P) -> Result<(), PlotError>
    where
        P: AsRef<Path>,
    {
        if self.series.is_empty() {
            return Err(PlotError::Empty {
                what: "rank density",
            });
        }
        render_svg(path.as_ref(), FIGURE_SIZE, |root| {
            draw_panels(
                root,
                &self.series,
                "p(rank)",
                "cumulative fraction of events",
            )
        })
    }
}
