//! General purpose figures on linear axes.

use std::{ops::Range, path::Path};

use gwpost_stats::histogram::{Histogram, linear_space};
use plotters::prelude::*;

use crate::{
    PlotError,
    figure::{
        Area, DEFAULT_SIZE, DrawResult, count_axis_max, histogram_outline, padded_range,
        render_svg,
    },
};

#[derive(Debug, Clone)]
enum Layer {
    Line {
        points: Vec<(f64, f64)>,
        color: RGBColor,
        label: Option<String>,
    },
    Markers {
        points: Vec<(f64, f64)>,
        color: RGBColor,
        label: Option<String>,
    },
    VerticalLine {
        x: f64,
        color: RGBColor,
    },
}

/// Lines, markers and vertical guide lines sharing one pair of axes.
///
/// The axes span all plotted points with a small margin.
///
/// ```no_run
/// use gwpost_plot::{RGBColor, xy::XyFigure};
///
/// let mut figure = XyFigure::new("Network SNR", "log B");
/// figure
///     .markers(vec![(12.0, 40.5), (9.1, 20.2)], RGBColor(255, 0, 0), Some("BSN_calibration"))
///     .markers(vec![(12.3, 41.0), (9.0, 19.8)], RGBColor(0, 0, 255), Some("BSN_ctrl"));
/// figure.save("BSN_vs_SNR.svg")?;
/// # Ok::<(), gwpost_plot::PlotError>(())
/// ```
#[derive(Debug, Clone)]
pub struct XyFigure {
    title: Option<String>,
    x_label: String,
    y_label: String,
    layers: Vec<Layer>,
}

impl XyFigure {
    #[must_use]
    pub fn new(x_label: &str, y_label: &str) -> Self {
        Self {
            title: None,
            x_label: x_label.to_owned(),
            y_label: y_label.to_owned(),
            layers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_owned());
        self
    }

    /// Adds a polyline through `points`.
    pub fn line(
        &mut self,
        points: Vec<(f64, f64)>,
        color: RGBColor,
        label: Option<&str>,
    ) -> &mut Self {
        self.layers.push(Layer::Line {
            points,
            color,
            label: label.map(str::to_owned),
        });
        self
    }

    /// Adds a scatter of filled circles.
    pub fn markers(
        &mut self,
        points: Vec<(f64, f64)>,
        color: RGBColor,
        label: Option<&str>,
    ) -> &mut Self {
        self.layers.push(Layer::Markers {
            points,
            color,
            label: label.map(str::to_owned),
        });
        self
    }

    /// Adds a vertical line across the whole y range.
    pub fn vline(&mut self, x: f64, color: RGBColor) -> &mut Self {
        self.layers.push(Layer::VerticalLine { x, color });
        self
    }

    fn ranges(&self) -> Option<(Range<f64>, Range<f64>)> {
        let points = || {
            self.layers.iter().flat_map(|layer| match layer {
                Layer::Line { points, .. } | Layer::Markers { points, .. } => points.as_slice(),
                Layer::VerticalLine { .. } => [].as_slice(),
            })
        };
        let vlines = self.layers.iter().filter_map(|layer| match layer {
            Layer::VerticalLine { x, .. } => Some(*x),
            _ => None,
        });
        let x_range = padded_range(points().map(|(x, _)| *x).chain(vlines))?;
        let y_range = padded_range(points().map(|(_, y)| *y))?;
        Some((x_range, y_range))
    }

    pub fn save<P>(&self, path: P) -> Result<(), PlotError>
    where
        P: AsRef<Path>,
    {
        if self.ranges().is_none() {
            return Err(PlotError::Empty { what: "XY figure" });
        }
        render_svg(path.as_ref(), DEFAULT_SIZE, |root| self.draw_on(root))
    }

    fn draw_on(&self, area: &Area<'_>) -> DrawResult {
        let Some((x_range, y_range)) = self.ranges() else {
            return Ok(());
        };
        let mut builder = ChartBuilder::on(area);
        builder
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60);
        if let Some(title) = &self.title {
            builder.caption(title, ("sans-serif", 22));
        }
        let mut chart = builder.build_cartesian_2d(x_range, y_range.clone())?;
        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()?;

        let mut labeled = false;
        for layer in &self.layers {
            match layer {
                Layer::Line {
                    points,
                    color,
                    label,
                } => {
                    let color = *color;
                    let drawn = chart.draw_series(LineSeries::new(
                        points.iter().copied(),
                        color.stroke_width(2),
                    ))?;
                    if let Some(label) = label {
                        labeled = true;
                        drawn
                            .label(label.as_str())
                            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
                    }
                }
                Layer::Markers {
                    points,
                    color,
                    label,
                } => {
                    let color = *color;
                    let drawn = chart.draw_series(
                        points
                            .iter()
                            .map(|p| Circle::new(*p, 4, color.filled())),
                    )?;
                    if let Some(label) = label {
                        labeled = true;
                        drawn
                            .label(label.as_str())
                            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
                    }
                }
                Layer::VerticalLine { x, color } => {
                    chart.draw_series(std::iter::once(PathElement::new(
                        vec![(*x, y_range.start), (*x, y_range.end)],
                        color.stroke_width(2),
                    )))?;
                }
            }
        }
        if labeled {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
        Ok(())
    }
}

/// Several [`XyFigure`]s stacked vertically in one file.
#[derive(Debug, Clone, Default)]
pub struct PanelFigure {
    panels: Vec<XyFigure>,
}

impl PanelFigure {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, panel: XyFigure) -> &mut Self {
        self.panels.push(panel);
        self
    }

    pub fn save<P>(&self, path: P) -> Result<(), PlotError>
    where
        P: AsRef<Path>,
    {
        if self.panels.is_empty() || self.panels.iter().any(|p| p.ranges().is_none()) {
            return Err(PlotError::Empty {
                what: "panel figure",
            });
        }
        let height = 400 * u32::try_from(self.panels.len()).unwrap_or(u32::MAX / 400);
        render_svg(path.as_ref(), (800, height), |root| {
            let areas = root.split_evenly((self.panels.len(), 1));
            for (panel, area) in self.panels.iter().zip(&areas) {
                panel.draw_on(area)?;
            }
            Ok(())
        })
    }
}

/// A normalized histogram with optional vertical guide lines.
///
/// ```
/// use gwpost_plot::xy::HistogramFigure;
///
/// let figure = HistogramFigure::new(&[0.0, 1.0, 1.0, 3.0], 3, "delta_mc").unwrap();
/// assert_eq!(figure.histogram().counts(), vec![1.0, 2.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct HistogramFigure {
    histogram: Histogram,
    x_label: String,
    color: RGBColor,
    vlines: Vec<(f64, RGBColor)>,
}

impl HistogramFigure {
    /// Bins the finite `values` into `num_bins` equal bins over their range.
    pub fn new(values: &[f64], num_bins: usize, x_label: &str) -> Result<Self, PlotError> {
        let finite = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        let min = finite.iter().copied().reduce(f64::min);
        let max = finite.iter().copied().reduce(f64::max);
        let (Some(min), Some(max)) = (min, max) else {
            return Err(PlotError::Empty { what: "histogram" });
        };
        let (min, max) = if min < max {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };
        let edges = linear_space(min, max, num_bins);
        Ok(Self {
            histogram: Histogram::from_edges(&finite, None, &edges),
            x_label: x_label.to_owned(),
            color: BLUE,
            vlines: Vec::new(),
        })
    }

    #[must_use]
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    #[must_use]
    pub fn with_color(mut self, color: RGBColor) -> Self {
        self.color = color;
        self
    }

    pub fn vline(&mut self, x: f64, color: RGBColor) -> &mut Self {
        self.vlines.push((x, color));
        self
    }

    pub fn save<P>(&self, path: P) -> Result<(), PlotError>
    where
        P: AsRef<Path>,
    {
        render_svg(path.as_ref(), (400, 350), |root| self.draw(root))
    }

    fn draw(&self, root: &Area<'_>) -> DrawResult {
        let density = self.histogram.density();
        let y_max = count_axis_max(density.iter().copied().fold(0.0, f64::max));
        let bins = &self.histogram.bins;
        let start = bins.first().map_or(0.0, |b| b.range.start);
        let end = bins.last().map_or(1.0, |b| b.range.end);
        let x_range = padded_range(
            [start, end]
                .into_iter()
                .chain(self.vlines.iter().map(|(x, _)| *x)),
        )
        .unwrap_or(start..end);

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, 0.0..y_max)?;
        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc("density")
            .draw()?;

        let color = self.color;
        chart.draw_series(bins.iter().zip(&density).map(|(bin, d)| {
            Rectangle::new(
                [(bin.range.start, 0.0), (bin.range.end, *d)],
                color.mix(0.3).filled(),
            )
        }))?;
        chart.draw_series(LineSeries::new(
            histogram_outline(&self.histogram, &density),
            color.stroke_width(2),
        ))?;
        for (x, color) in &self.vlines {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(*x, 0.0), (*x, y_max)],
                color.stroke_width(2),
            )))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_include_vertical_lines() {
        let mut figure = XyFigure::new("x", "y");
        figure.line(vec![(1.0, 1.0), (2.0, 3.0)], BLUE, None).vline(0.0, RED);
        let (x, y) = figure.ranges().unwrap();
        assert!(x.start < 0.0 && x.end > 2.0);
        assert!(y.start < 1.0 && y.end > 3.0);
    }

    #[test]
    fn test_empty_figures() {
        let figure = XyFigure::new("x", "y");
        assert!(matches!(
            figure.save("unused.svg"),
            Err(PlotError::Empty { .. })
        ));
        assert!(PanelFigure::new().save("unused.svg").is_err());
        assert!(HistogramFigure::new(&[f64::NAN], 10, "x").is_err());
    }

    #[test]
    fn test_histogram_single_value() {
        let figure = HistogramFigure::new(&[2.0, 2.0], 4, "x").unwrap();
        assert_eq!(figure.histogram().total(), 2.0);
        assert_eq!(figure.histogram().bins[0].range.start, 1.5);
    }

    #[test]
    fn test_save_figures() {
        let dir = tempfile::tempdir().unwrap();

        let mut scatter = XyFigure::new("delta_mc", "sigma_mc").with_title("Injected vs recovered");
        scatter
            .markers(vec![(-0.1, 0.2), (0.05, 0.1)], RED, Some("stdev"))
            .line(vec![(-0.1, 0.2), (0.1, 0.2)], BLACK, None)
            .vline(0.0, BLUE);
        scatter.save(dir.path().join("scatter.svg")).unwrap();

        let mut panels = PanelFigure::new();
        panels.push(scatter.clone()).push(scatter);
        panels.save(dir.path().join("panels.svg")).unwrap();

        let mut histogram = HistogramFigure::new(&[0.1, 0.3, 0.35, 0.9], 20, "effect_mc")
            .unwrap()
            .with_color(RED);
        histogram.vline(0.0, BLUE);
        histogram.save(dir.path().join("hist.svg")).unwrap();

        for name in ["scatter.svg", "panels.svg", "hist.svg"] {
            let svg = std::fs::read_to_string(dir.path().join(name)).unwrap();
            assert!(svg.starts_with("<svg"), "{name}");
        }
    }
}
