use std::path::Path;

use gwpost_stats::histogram::{Histogram, linear_space};
use plotters::prelude::*;

use crate::{
    PlotError,
    figure::{
        Area, DEFAULT_SIZE, DrawResult, count_axis_max, histogram_outline, render_svg,
        series_color,
    },
};

/// Stacked step histograms of several samples of one parameter.
///
/// All samples share the same bins: `max(5, min(len / per_bin))` bins over
/// the range of all samples together. Each outline is drawn on top of the
/// previous ones, so the last outline shows the combined count.
#[derive(Debug, Clone)]
pub struct ParamsHistFigure {
    histograms: Vec<Histogram>,
    stacked: Vec<Vec<f64>>,
    labels: Vec<Option<String>>,
    x_label: String,
}

impl ParamsHistFigure {
    pub fn new(
        samples: &[Vec<f64>],
        labels: Option<&[String]>,
        x_label: &str,
        per_bin: usize,
    ) -> Result<Self, PlotError> {
        if let Some(labels) = labels {
            PlotError::check_lengths(samples.len(), labels.len())?;
        }
        let shortest = samples
            .iter()
            .map(Vec::len)
            .min()
            .ok_or(PlotError::Empty {
                what: "parameter histogram",
            })?;
        let values = samples.iter().flatten().copied().filter(|v| v.is_finite());
        let Some((min, max)) = values.fold(None, |acc: Option<(f64, f64)>, v| {
            Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        }) else {
            return Err(PlotError::Empty {
                what: "parameter histogram",
            });
        };
        let (min, max) = if min < max {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };

        let num_bins = (shortest / per_bin.max(1)).max(5);
        let edges = linear_space(min, max, num_bins);
        let histograms = samples
            .iter()
            .map(|s| Histogram::from_edges(s, None, &edges))
            .collect::<Vec<_>>();

        let mut running = vec![0.0; num_bins];
        let stacked = histograms
            .iter()
            .map(|h| {
                for (total, count) in running.iter_mut().zip(h.counts()) {
                    *total += count;
                }
                running.clone()
            })
            .collect();

        Ok(Self {
            histograms,
            stacked,
            labels: labels.map_or_else(
                || vec![None; samples.len()],
                |labels| labels.iter().cloned().map(Some).collect(),
            ),
            x_label: x_label.to_owned(),
        })
    }

    /// Number of shared bins.
    #[must_use]
    pub fn num_bins(&self) -> usize {
        self.histograms.first().map_or(0, |h| h.bins.len())
    }

    /// Cumulative counts of the first `k + 1` samples for every `k`.
    #[must_use]
    pub fn stacked_counts(&self) -> &[Vec<f64>] {
        &self.stacked
    }

    pub fn save<P>(&self, path: P) -> Result<(), PlotError>
    where
        P: AsRef<Path>,
    {
        render_svg(path.as_ref(), DEFAULT_SIZE, |root| self.draw(root))
    }

    fn draw(&self, root: &Area<'_>) -> DrawResult {
        let Some(first) = self.histograms.first() else {
            return Ok(());
        };
        let x_range = first.bins[0].range.start..first.bins[first.bins.len() - 1].range.end;
        let y_max = self
            .stacked
            .last()
            .map_or(0.0, |c| c.iter().copied().fold(0.0, f64::max));

        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, 0.0..count_axis_max(y_max))?;
        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc("count")
            .draw()?;

        for (i, (counts, label)) in self.stacked.iter().zip(&self.labels).enumerate() {
            let color = series_color(i);
            let outline = histogram_outline(first, counts);
            let drawn = chart.draw_series(LineSeries::new(outline, color))?;
            if let Some(label) = label {
                drawn
                    .label(label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
        }
        if self.labels.iter().any(Option::is_some) {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_bins() {
        let a = (0..100).map(f64::from).collect::<Vec<_>>();
        let b = (0..60).map(|i| f64::from(i) + 50.0).collect::<Vec<_>>();
        let figure = ParamsHistFigure::new(&[a, b], None, "mchirp", 10).unwrap();
        assert_eq!(figure.num_bins(), 6);
        let stacked = figure.stacked_counts();
        assert_eq!(stacked[0].iter().sum::<f64>(), 100.0);
        assert_eq!(stacked[1].iter().sum::<f64>(), 160.0);
    }

    #[test]
    fn test_minimum_bins() {
        let figure = ParamsHistFigure::new(&[vec![1.0, 2.0, 3.0]], None, "x", 10).unwrap();
        assert_eq!(figure.num_bins(), 5);
    }

    #[test]
    fn test_rejects_empty_and_mismatched_input() {
        assert!(ParamsHistFigure::new(&[], None, "x", 10).is_err());
        assert!(ParamsHistFigure::new(&[vec![]], None, "x", 10).is_err());
        let labels = ["a".to_owned(), "b".to_owned()];
        assert!(ParamsHistFigure::new(&[vec![1.0]], Some(&labels), "x", 10).is_err());
    }

    #[test]
    fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let labels = ["ctrl".to_owned(), "calibration".to_owned()];
        let figure = ParamsHistFigure::new(
            &[vec![0.1, 0.2, 0.2, 0.4], vec![0.3, 0.35]],
            Some(&labels),
            "eta",
            1,
        )
        .unwrap();
        let path = dir.path().join("params.svg");
        figure.save(&path).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("calibration"));
    }
}
