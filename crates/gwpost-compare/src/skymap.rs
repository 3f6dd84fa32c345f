//! Injected against recovered sky positions.

use std::path::{Path, PathBuf};

use gwpost_plot::{BLACK, BLUE, GREEN, RED, YELLOW, skymap::SkyMapFigure};

use crate::{CompareError, plots::RunComparison, summary::SummaryRow, util::ensure_dir};

/// Injections drawn on one map.
pub const MAX_INJECTIONS_PER_MAP: usize = 25;
/// Events whose perturbed-run BSN exceeds this value are linked and labeled.
pub const LINK_BSN_THRESHOLD: f64 = 4.0;
/// The maps are centered on this longitude.
const CENTRAL_LONGITUDE: f64 = 180.0;
const TITLE: &str = "Injected vs recovered positions";

/// Equatorial position in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPosition {
    pub ra: f64,
    pub dec: f64,
}

impl SkyPosition {
    /// Map longitude and latitude in degrees, with right ascension growing
    /// to the left.
    ///
    /// ```
    /// use std::f64::consts::FRAC_PI_2;
    /// use gwpost_compare::skymap::SkyPosition;
    ///
    /// let (lon, lat) = SkyPosition { ra: FRAC_PI_2, dec: 0.0 }.map_coordinates();
    /// assert!((lon - 270.0).abs() < 1e-12);
    /// assert_eq!(lat, 0.0);
    /// ```
    #[must_use]
    pub fn map_coordinates(self) -> (f64, f64) {
        (
            (360.0 - self.ra.to_degrees()).rem_euclid(360.0),
            self.dec.to_degrees(),
        )
    }

    fn recovered(row: &SummaryRow) -> Option<Self> {
        Some(Self {
            ra: row.posterior.get("ra")?.mean,
            dec: row.posterior.get("dec")?.mean,
        })
    }

    fn injected(row: &SummaryRow) -> Option<Self> {
        Some(Self {
            ra: row.posterior.get("ra")?.injected?,
            dec: row.posterior.get("dec")?.injected?,
        })
    }
}

/// One event placed on the sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyEvent {
    /// Row of the event in the run summaries.
    pub label: usize,
    pub injected: SkyPosition,
    pub control: SkyPosition,
    pub perturbed: SkyPosition,
    pub perturbed_bsn: f64,
}

/// Events with a sky position in both runs and an injected position.
#[must_use]
pub fn sky_events(comparison: &RunComparison<'_>) -> Vec<SkyEvent> {
    comparison
        .control()
        .rows()
        .iter()
        .zip(comparison.perturbed().rows())
        .enumerate()
        .filter_map(|(label, (control, perturbed))| {
            Some(SkyEvent {
                label,
                injected: SkyPosition::injected(control)?,
                control: SkyPosition::recovered(control)?,
                perturbed: SkyPosition::recovered(perturbed)?,
                perturbed_bsn: perturbed.bsn,
            })
        })
        .collect()
}

#[must_use]
pub fn sky_map_file(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("injected_skymap_{index}.svg"))
}

/// Number of maps needed for `count` events.
///
/// ```
/// use gwpost_compare::skymap::map_count;
///
/// assert_eq!(map_count(0), 0);
/// assert_eq!(map_count(25), 1);
/// assert_eq!(map_count(26), 2);
/// ```
#[must_use]
pub fn map_count(count: usize) -> usize {
    count.div_ceil(MAX_INJECTIONS_PER_MAP)
}

fn draw_map(events: &[SkyEvent], path: &Path) -> Result<(), CompareError> {
    let mut figure = SkyMapFigure::new(TITLE, CENTRAL_LONGITUDE);
    for event in events.iter().filter(|e| e.perturbed_bsn > LINK_BSN_THRESHOLD) {
        let injected = event.injected.map_coordinates();
        let control = event.control.map_coordinates();
        let perturbed = event.perturbed.map_coordinates();
        let label = event.label.to_string();
        figure
            .connect(injected, perturbed, GREEN)
            .connect(control, injected, YELLOW)
            .annotate(injected, &label, BLACK)
            .annotate(perturbed, &label, RED)
            .annotate(control, &label, BLUE);
    }
    let points = |position: fn(&SkyEvent) -> SkyPosition| {
        events
            .iter()
            .map(|e| position(e).map_coordinates())
            .collect::<Vec<_>>()
    };
    figure
        .scatter(&points(|e| e.injected), BLACK, "Injected")
        .scatter(&points(|e| e.perturbed), RED, "Recovered_cal")
        .scatter(&points(|e| e.control), BLUE, "Recovered_ctrl");
    figure.save(path)?;
    Ok(())
}

/// Draws `injected_skymap_{k}` maps of at most [`MAX_INJECTIONS_PER_MAP`]
/// events each and returns how many were written.
pub fn write_sky_maps(dir: &Path, events: &[SkyEvent]) -> Result<usize, CompareError> {
    if events.is_empty() {
        return Ok(0);
    }
    ensure_dir(dir)?;
    for (index, chunk) in events.chunks(MAX_INJECTIONS_PER_MAP).enumerate() {
        let path = sky_map_file(dir, index);
        log::debug!("Drawing sky map {}", path.display());
        draw_map(chunk, &path)?;
    }
    Ok(map_count(events.len()))
}

#[cfg(test)]
mod tests {
    use gwpost_table::{Header, NumericTable};

    use super::*;
    use crate::{gps::GpsTime, posterior::PosteriorSummary, snr::SnrValues, summary::RunSummary};

    fn sky_run(run: usize, count: usize, with_injection: bool) -> RunSummary {
        let rows = (0..count)
            .map(|i| {
                #[expect(clippy::cast_precision_loss)]
                let ra = 0.2 * i as f64;
                let text = format!("ra dec logl\n{ra} 0.1 0\n{ra} 0.3 0\n");
                let table = NumericTable::parse(&text, Header::FirstLine).unwrap();
                let injected = |name: &str| {
                    let value = if name == "ra" { ra } else { 0.2 };
                    with_injection.then_some(value)
                };
                SummaryRow {
                    time: GpsTime::new(1000 + i64::try_from(i).unwrap(), 0),
                    event: i,
                    posterior: PosteriorSummary::from_table(&table, injected).unwrap(),
                    bsn: if i % 2 == 0 { 10.0 } else { 1.0 },
                    snr: SnrValues::from_detectors(vec![("H1".into(), 10.0)]),
                }
            })
            .collect();
        RunSummary::new(run, rows)
    }

    #[test]
    fn test_sky_events_need_positions() {
        let control = sky_run(0, 3, true);
        let perturbed = sky_run(1, 3, true);
        let comparison = RunComparison::new(&control, &perturbed).unwrap();
        let events = sky_events(&comparison);
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].label, 2);
        assert!((events[1].control.dec - 0.2).abs() < 1e-12);
        assert_eq!(events[1].perturbed_bsn, 1.0);

        let control = sky_run(0, 3, false);
        let comparison = RunComparison::new(&control, &perturbed).unwrap();
        assert!(sky_events(&comparison).is_empty());
    }

    #[test]
    fn test_maps_are_paged() {
        let dir = tempfile::tempdir().unwrap();
        let control = sky_run(0, 30, true);
        let perturbed = sky_run(1, 30, true);
        let comparison = RunComparison::new(&control, &perturbed).unwrap();
        let written = write_sky_maps(dir.path(), &sky_events(&comparison)).unwrap();
        assert_eq!(written, 2);
        assert!(sky_map_file(dir.path(), 0).is_file());
        assert!(sky_map_file(dir.path(), 1).is_file());
        assert!(!sky_map_file(dir.path(), 2).exists());
    }

    #[test]
    fn test_ra_wraps_into_map() {
        let (lon, _) = SkyPosition { ra: 0.0, dec: 0.0 }.map_coordinates();
        assert_eq!(lon, 0.0);
    }
}
