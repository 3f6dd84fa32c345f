//! Whole-sky maps in the Mollweide projection.
//!
//! Coordinates are longitude and latitude in degrees. The projected plane
//! spans `[-2√2, 2√2] × [-√2, √2]` for a unit sphere.

use std::{
    f64::consts::{FRAC_PI_2, PI, SQRT_2},
    path::Path,
};

use plotters::prelude::*;

use crate::{
    PlotError,
    figure::{Area, DrawResult, render_svg},
};

const FIGURE_SIZE: (u32, u32) = (1000, 620);
const PARALLELS: [f64; 3] = [-45.0, 0.0, 45.0];
const MERIDIAN_COUNT: i32 = 4;
const MERIDIAN_STEP: f64 = 90.0;

/// Projects `(lon, lat)` onto the Mollweide plane centered on `lon0`.
///
/// Longitudes are wrapped into `[lon0 - 180, lon0 + 180)`.
///
/// ```
/// use gwpost_plot::skymap::mollweide;
///
/// let (x, y) = mollweide(180.0, 0.0, 180.0);
/// assert!(x.abs() < 1e-12 && y.abs() < 1e-12);
///
/// let (x, y) = mollweide(42.0, 90.0, 180.0);
/// assert!(x.abs() < 1e-12);
/// assert!((y - std::f64::consts::SQRT_2).abs() < 1e-12);
/// ```
#[must_use]
pub fn mollweide(lon: f64, lat: f64, lon0: f64) -> (f64, f64) {
    let offset = (lon - lon0 + 180.0).rem_euclid(360.0) - 180.0;
    project_offset(offset, lat)
}

/// Projects a longitude offset from the central meridian without wrapping.
fn project_offset(offset: f64, lat: f64) -> (f64, f64) {
    let lambda = offset.to_radians();
    let theta = auxiliary_angle(lat.to_radians());
    (
        2.0 * SQRT_2 / PI * lambda * theta.cos(),
        SQRT_2 * theta.sin(),
    )
}

/// Solves `2θ + sin 2θ = π sin φ` by Newton iteration.
fn auxiliary_angle(phi: f64) -> f64 {
    if (phi.abs() - FRAC_PI_2).abs() < 1e-10 {
        return phi.signum() * FRAC_PI_2;
    }
    let target = PI * phi.sin();
    let mut t = phi;
    for _ in 0..100 {
        let delta = (2.0 * t + (2.0 * t).sin() - target) / (2.0 + 2.0 * (2.0 * t).cos());
        t -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    t
}

#[derive(Debug, Clone)]
struct ScatterGroup {
    points: Vec<(f64, f64)>,
    color: RGBColor,
    label: String,
}

#[derive(Debug, Clone)]
struct Annotation {
    at: (f64, f64),
    text: String,
    color: RGBColor,
}

/// A sky map with point groups, connecting segments and text labels.
#[derive(Debug, Clone)]
pub struct SkyMapFigure {
    title: String,
    lon0: f64,
    groups: Vec<ScatterGroup>,
    links: Vec<((f64, f64), (f64, f64), RGBColor)>,
    annotations: Vec<Annotation>,
}

impl SkyMapFigure {
    /// Creates an empty map centered on longitude `lon0`.
    #[must_use]
    pub fn new(title: &str, lon0: f64) -> Self {
        Self {
            title: title.to_owned(),
            lon0,
            groups: Vec::new(),
            links: Vec::new(),
            annotations: Vec::new(),
        }
    }

    fn project(&self, (lon, lat): (f64, f64)) -> (f64, f64) {
        mollweide(lon, lat, self.lon0)
    }

    /// Adds a labeled group of `(lon, lat)` points.
    pub fn scatter(&mut self, points: &[(f64, f64)], color: RGBColor, label: &str) -> &mut Self {
        let points = points.iter().map(|p| self.project(*p)).collect();
        self.groups.push(ScatterGroup {
            points,
            color,
            label: label.to_owned(),
        });
        self
    }

    /// Joins two positions with a straight segment on the map.
    pub fn connect(&mut self, from: (f64, f64), to: (f64, f64), color: RGBColor) -> &mut Self {
        let link = (self.project(from), self.project(to), color);
        self.links.push(link);
        self
    }

    /// Writes `text` next to a position.
    pub fn annotate(&mut self, at: (f64, f64), text: &str, color: RGBColor) -> &mut Self {
        let annotation = Annotation {
            at: self.project(at),
            text: text.to_owned(),
            color,
        };
        self.annotations.push(annotation);
        self
    }

    pub fn save<P>(&self, path: P) -> Result<(), PlotError>
    where
        P: AsRef<Path>,
    {
        render_svg(path.as_ref(), FIGURE_SIZE, |root| self.draw(root))
    }

    fn draw(&self, root: &Area<'_>) -> DrawResult {
        let x_max = 2.0 * SQRT_2 * 1.04;
        let y_max = SQRT_2 * 1.08;
        let mut chart = ChartBuilder::on(root)
            .caption(self.title.as_str(), ("sans-serif", 24))
            .margin(15)
            .build_cartesian_2d(-x_max..x_max, -y_max..y_max)?;

        let latitudes = (0..=180).map(|i| -90.0 + f64::from(i)).collect::<Vec<_>>();
        let mut meridian = |offset: f64, style: ShapeStyle| {
            let path = latitudes
                .iter()
                .map(|lat| project_offset(offset, *lat))
                .collect::<Vec<_>>();
            chart
                .draw_series(std::iter::once(PathElement::new(path, style)))
                .map(|_| ())
        };
        meridian(-180.0, BLACK.stroke_width(2))?;
        meridian(180.0, BLACK.stroke_width(2))?;
        for k in 1..MERIDIAN_COUNT {
            meridian(-180.0 + f64::from(k) * MERIDIAN_STEP, BLACK.mix(0.3).into())?;
        }

        let label_font = ("sans-serif", 14).into_font().color(&BLACK);
        for lat in PARALLELS {
            let path = (0..=360)
                .map(|i| project_offset(-180.0 + f64::from(i), lat))
                .collect::<Vec<_>>();
            chart.draw_series(std::iter::once(PathElement::new(path, BLACK.mix(0.3))))?;
            let (x, y) = project_offset(-180.0, lat);
            chart.draw_series(std::iter::once(Text::new(
                format!("{lat:+.0}°"),
                (x - 0.25, y),
                label_font.clone(),
            )))?;
        }
        for k in 0..MERIDIAN_COUNT {
            let offset = -180.0 + f64::from(k) * MERIDIAN_STEP;
            let lon = (self.lon0 + offset).rem_euclid(360.0);
            let (x, y) = project_offset(offset, 0.0);
            chart.draw_series(std::iter::once(Text::new(
                format!("{lon:.0}°"),
                (x + 0.03, y - 0.05),
                label_font.clone(),
            )))?;
        }

        for (from, to, color) in &self.links {
            chart.draw_series(std::iter::once(PathElement::new(vec![*from, *to], *color)))?;
        }
        for group in &self.groups {
            let color = group.color;
            chart
                .draw_series(
                    group
                        .points
                        .iter()
                        .map(|p| Circle::new(*p, 3, color.filled())),
                )?
                .label(group.label.as_str())
                .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
        }
        for annotation in &self.annotations {
            let (x, y) = annotation.at;
            chart.draw_series(std::iter::once(Text::new(
                annotation.text.clone(),
                (x + 0.02, y + 0.02),
                ("sans-serif", 13).into_font().color(&annotation.color.mix(0.8)),
            )))?;
        }
        if !self.groups.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::LowerLeft)
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
    fn test_projection_poles_and_equator() {
        let (x, y) = mollweide(0.0, -90.0, 180.0);
        assert!(x.abs() < 1e-12);
        assert!((y + SQRT_2).abs() < 1e-12);

        // the equator edge lies at 2√2 from the center
        let (x, y) = project_offset(180.0, 0.0);
        assert!((x - 2.0 * SQRT_2).abs() < 1e-12);
        assert!(y.abs() < 1e-12);
    }

    #[test]
    fn test_projection_wraps_longitude() {
        let a = mollweide(10.0, 30.0, 180.0);
        let b = mollweide(370.0, 30.0, 180.0);
        assert!((a.0 - b.0).abs() < 1e-12 && (a.1 - b.1).abs() < 1e-12);
        // east of the central meridian is to the right
        assert!(mollweide(200.0, 0.0, 180.0).0 > 0.0);
    }

    #[test]
    fn test_auxiliary_angle_equation() {
        for lat in [-80.0_f64, -30.0, 0.0, 10.0, 60.0, 89.9] {
            let phi = lat.to_radians();
            let theta = auxiliary_angle(phi);
            let residual = 2.0 * theta + (2.0 * theta).sin() - PI * phi.sin();
            assert!(residual.abs() < 1e-9, "lat {lat}: {residual}");
        }
    }

    #[test]
    fn test_northern_hemisphere_above_equator() {
        let (_, y) = mollweide(180.0, 30.0, 180.0);
        assert!(y > 0.0 && y < SQRT_2);
    }

    #[test]
    fn test_save_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skymap.svg");
        let mut figure = SkyMapFigure::new("Injected vs recovered positions", 180.0);
        figure
            .scatter(&[(120.0, -20.0), (300.0, 45.0)], BLACK, "Injected")
            .scatter(&[(121.0, -19.0)], RED, "Recovered_cal")
            .connect((120.0, -20.0), (121.0, -19.0), GREEN)
            .annotate((120.0, -20.0), "0", BLACK);
        figure.save(&path).unwrap();
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.contains("Recovered_cal"));
    }
}
