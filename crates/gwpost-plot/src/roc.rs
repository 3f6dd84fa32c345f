//! Receiver operating characteristic curves.

use std::path::Path;

use gwpost_stats::confidence::binomial_interval;
use plotters::prelude::*;

use crate::{
    PlotError,
    figure::{Area, DEFAULT_SIZE, DrawResult, render_svg, step_post},
};

/// Smallest false alarm probability shown on the logarithmic axis.
pub const FAP_MIN: f64 = 1e-5;

const CONFIDENCE: f64 = 0.68;

/// One sample point of a ROC curve with its one-sigma binomial bands.
#[derive(Debug, Clone, PartialEq)]
pub struct RocPoint {
    pub fap: f64,
    pub efficiency: f64,
    pub fap_band: (f64, f64),
    pub efficiency_band: (f64, f64),
}

/// Converts cumulative clean and glitch counts into ROC points.
///
/// The last entries are the totals, so the curve ends at `(1, 1)`.
///
/// ```
/// use gwpost_plot::roc::roc_points;
///
/// let points = roc_points(&[0, 2, 4], &[5, 8, 10]).unwrap();
/// assert_eq!(points[1].fap, 0.5);
/// assert_eq!(points[1].efficiency, 0.8);
/// assert_eq!((points[2].fap, points[2].efficiency), (1.0, 1.0));
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn roc_points(clean: &[u64], glitch: &[u64]) -> Result<Vec<RocPoint>, PlotError> {
    PlotError::check_lengths(clean.len(), glitch.len())?;
    let (Some(&n_clean), Some(&n_glitch)) = (clean.last(), glitch.last()) else {
        return Err(PlotError::Empty { what: "ROC curve" });
    };
    if n_clean == 0 || n_glitch == 0 {
        return Err(PlotError::Empty {
            what: "ROC curve without clean or glitch samples",
        });
    }
    let points = clean
        .iter()
        .zip(glitch)
        .map(|(&c, &g)| RocPoint {
            fap: c as f64 / n_clean as f64,
            efficiency: g as f64 / n_glitch as f64,
            fap_band: binomial_interval(c, n_clean, CONFIDENCE),
            efficiency_band: binomial_interval(g, n_glitch, CONFIDENCE),
        })
        .collect();
    Ok(points)
}

#[derive(Debug, Clone)]
struct RocCurve {
    points: Vec<RocPoint>,
    color: RGBColor,
    label: Option<String>,
}

/// Glitch detection efficiency against false alarm probability.
#[derive(Debug, Clone, Default)]
pub struct RocFigure {
    curves: Vec<RocCurve>,
}

impl RocFigure {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the curve of one classifier from its cumulative counts.
    pub fn add_curve(
        &mut self,
        clean: &[u64],
        glitch: &[u64],
        color: RGBColor,
        label: Option<&str>,
    ) -> Result<&mut Self, PlotError> {
        let points = roc_points(clean, glitch)?;
        self.curves.push(RocCurve {
            points,
            color,
            label: label.map(str::to_owned),
        });
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn save<P>(&self, path: P) -> Result<(), PlotError>
    where
        P: AsRef<Path>,
    {
        if self.curves.is_empty() {
            return Err(PlotError::Empty { what: "ROC figure" });
        }
        render_svg(path.as_ref(), DEFAULT_SIZE, |root| self.draw(root))
    }

    fn draw(&self, root: &Area<'_>) -> DrawResult {
        let clamp = |fap: f64| fap.clamp(FAP_MIN, 1.0);
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d((FAP_MIN..1.0).log_scale(), 0.0..1.0)?;
        chart
            .configure_mesh()
            .x_desc("False Alarm Probability")
            .y_desc("Glitch Detection Efficiency")
            .draw()?;

        for curve in &self.curves {
            let color = curve.color;
            chart.draw_series(curve.points.iter().map(|p| {
                Rectangle::new(
                    [
                        (clamp(p.fap_band.0), p.efficiency_band.0),
                        (clamp(p.fap_band.1), p.efficiency_band.1),
                    ],
                    color.mix(0.25).filled(),
                )
            }))?;

            let fap = curve.points.iter().map(|p| p.fap).collect::<Vec<_>>();
            let eff = curve.points.iter().map(|p| p.efficiency).collect::<Vec<_>>();
            let steps = step_post(&fap, &eff).into_iter().map(|(x, y)| (clamp(x), y));
            let series = chart.draw_series(LineSeries::new(steps, color.stroke_width(2)))?;
            if let Some(label) = &curve.label {
                series
                    .label(label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
        }

        if self.curves.iter().any(|c| c.label.is_some()) {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::LowerRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
        Ok(())
    }
}
