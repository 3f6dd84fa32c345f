use std::path::Path;

use plotters::prelude::*;

use crate::{
    PlotError,
    figure::{Area, DEFAULT_SIZE, DrawResult, count_axis_max, padded_range, render_svg},
};

#[derive(Debug, Clone)]
struct RateSeries {
    segments: Vec<((f64, f64), f64)>,
    color: RGBColor,
    label: Option<String>,
}

/// Rates over consecutive strides, one horizontal segment per stride.
#[derive(Debug, Clone)]
pub struct RatesFigure {
    x_label: String,
    y_label: String,
    series: Vec<RateSeries>,
}

impl RatesFigure {
    #[must_use]
    pub fn new(x_label: &str, y_label: &str) -> Self {
        Self {
            x_label: x_label.to_owned(),
            y_label: y_label.to_owned(),
            series: Vec::new(),
        }
    }

    /// Adds a value for each `(start, end)` range.
    pub fn add(
        &mut self,
        ranges: &[(f64, f64)],
        values: &[f64],
        color: RGBColor,
        label: Option<&str>,
    ) -> Result<&mut Self, PlotError> {
        PlotError::check_lengths(ranges.len(), values.len())?;
        self.series.push(RateSeries {
            segments: ranges.iter().copied().zip(values.iter().copied()).collect(),
            color,
            label: label.map(str::to_owned),
        });
        Ok(self)
    }

    pub fn save<P>(&self, path: P) -> Result<(), PlotError>
    where
        P: AsRef<Path>,
    {
        let Some(x_range) = padded_range(
            self.series
                .iter()
                .flat_map(|s| &s.segments)
                .flat_map(|((start, end), _)| [*start, *end]),
        ) else {
            return Err(PlotError::Empty {
                what: "rate figure",
            });
        };
        let y_max = self
            .series
            .iter()
            .flat_map(|s| &s.segments)
            .map(|(_, v)| *v)
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
        render_svg(path.as_ref(), DEFAULT_SIZE, |root| {
            self.draw(root, x_range, count_axis_max(y_max))
        })
    }

    fn draw(&self, root: &Area<'_>, x_range: std::ops::Range<f64>, y_max: f64) -> DrawResult {
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, 0.0..y_max)?;
        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()?;

        for series in &self.series {
            let color = series.color;
            let drawn = chart.draw_series(series.segments.iter().map(|((start, end), v)| {
                PathElement::new(vec![(*start, *v), (*end, *v)], color.stroke_width(2))
            }))?;
            if let Some(label) = &series.label {
                drawn
                    .label(label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
        }
        if self.series.iter().any(|s| s.label.is_some()) {
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
    fn test_save_rates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.svg");
        let mut figure = RatesFigure::new("GPS time", "glitch rate [Hz]");
        figure
            .add(
                &[(0.0, 32.0), (32.0, 64.0), (64.0, 96.0)],
                &[0.1, 0.4, 0.2],
                RED,
                Some("glitch"),
            )
            .unwrap();
        figure.save(&path).unwrap();
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.contains("glitch rate"));
    }

    #[test]
    fn test_invalid_series() {
        let mut figure = RatesFigure::new("t", "r");
        assert!(figure.add(&[(0.0, 1.0)], &[], BLUE, None).is_err());
        assert!(matches!(
            figure.save("unused.svg"),
            Err(PlotError::Empty { .. })
        ));
    }
}
