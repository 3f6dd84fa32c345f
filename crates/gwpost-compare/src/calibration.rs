//! Calibration-error curves.
//!
//! `calerr_{IFO}_{time}.0.dat` holds three columns: frequency in Hz, the
//! amplitude ratio of the perturbed run over the control run, and their
//! phase difference in radians.

use std::{
    f64::consts::PI,
    ops::Range,
    path::{Path, PathBuf},
};

use gwpost_table::{Header, NumericTable, TableError};

use crate::{CompareError, gps::GpsTime};

/// Lower edge of the plotted band.
pub const F_LOW: f64 = 20.0;
/// Upper edge of the plotted band, excluded.
pub const F_UP: f64 = 500.0;
/// Tolerance when locating a band edge among the sampled frequencies.
pub const FREQUENCY_TOLERANCE: f64 = 1e-4;

#[must_use]
pub fn calibration_file(dir: &Path, ifo: &str, time: GpsTime) -> PathBuf {
    dir.join(format!("calerr_{ifo}_{time}.0.dat"))
}

/// Wraps a phase difference into `[-1.5π, π]`.
///
/// ```
/// use std::f64::consts::PI;
/// use gwpost_compare::calibration::normalize_phase;
///
/// assert_eq!(normalize_phase(0.5), 0.5);
/// assert!((normalize_phase(1.5 * PI) + 0.5 * PI).abs() < 1e-12);
/// assert!((normalize_phase(-1.75 * PI) - 0.25 * PI).abs() < 1e-12);
/// ```
#[must_use]
pub fn normalize_phase(phase: f64) -> f64 {
    if phase < -1.5 * PI {
        phase + 2.0 * PI
    } else if phase > PI {
        phase - 2.0 * PI
    } else {
        phase
    }
}

/// Index range of `frequencies` from `f_low` up to, but excluding, `f_up`.
///
/// Both edges must be sampled within [`FREQUENCY_TOLERANCE`]; when several
/// samples are that close to an edge the last one wins. The error names the
/// first edge that is not sampled.
pub fn frequency_window(frequencies: &[f64], f_low: f64, f_up: f64) -> Result<Range<usize>, f64> {
    let locate = |target: f64| {
        frequencies
            .iter()
            .rposition(|f| (f - target).abs() < FREQUENCY_TOLERANCE)
            .ok_or(target)
    };
    let start = locate(f_low)?;
    let end = locate(f_up)?;
    Ok(start..end.max(start))
}

/// One detector's calibration-error curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationCurve {
    pub ifo: String,
    pub frequency: Vec<f64>,
    pub amplitude: Vec<f64>,
    /// Phase difference, already normalized.
    pub phase: Vec<f64>,
}

impl CalibrationCurve {
    pub fn from_table(ifo: &str, table: &NumericTable) -> Result<Self, TableError> {
        if table.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self {
            ifo: ifo.to_owned(),
            frequency: table.column_at(0)?,
            amplitude: table.column_at(1)?,
            phase: table
                .column_at(2)?
                .into_iter()
                .map(normalize_phase)
                .collect(),
        })
    }

    pub fn read(dir: &Path, ifo: &str, time: GpsTime) -> Result<Self, CompareError> {
        let path = calibration_file(dir, ifo, time);
        log::debug!("Reading calibration errors from {}", path.display());
        NumericTable::read(&path, Header::None)
            .and_then(|table| Self::from_table(ifo, &table))
            .map_err(CompareError::table(&path))
    }

    /// Restricts the curve to `[F_LOW, F_UP)`.
    pub fn in_band(&self, path: &Path) -> Result<Self, CompareError> {
        let window = frequency_window(&self.frequency, F_LOW, F_UP).map_err(|frequency| {
            CompareError::FrequencyNotFound {
                path: path.to_owned(),
                frequency,
            }
        })?;
        Ok(Self {
            ifo: self.ifo.clone(),
            frequency: self.frequency[window.clone()].to_vec(),
            amplitude: self.amplitude[window.clone()].to_vec(),
            phase: self.phase[window].to_vec(),
        })
    }

    #[must_use]
    pub fn amplitude_points(&self) -> Vec<(f64, f64)> {
        self.frequency.iter().copied().zip(self.amplitude.iter().copied()).collect()
    }

    #[must_use]
    pub fn phase_points(&self) -> Vec<(f64, f64)> {
        self.frequency.iter().copied().zip(self.phase.iter().copied()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_is_wrapped_once() {
        assert_eq!(normalize_phase(PI), PI);
        assert_eq!(normalize_phase(-1.5 * PI), -1.5 * PI);
        assert!((normalize_phase(-1.6 * PI) - 0.4 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_frequency_window() {
        let frequencies = [10.0, 20.00001, 100.0, 499.99995, 600.0];
        assert_eq!(frequency_window(&frequencies, F_LOW, F_UP), Ok(1..3));
        assert_eq!(frequency_window(&[10.0, 20.0], F_LOW, F_UP), Err(F_UP));
        assert_eq!(frequency_window(&[20.1, 500.0], F_LOW, F_UP), Err(F_LOW));
        // the first sample may be the lower edge
        assert_eq!(frequency_window(&[20.0, 500.0], F_LOW, F_UP), Ok(0..1));
    }

    #[test]
    fn test_frequency_window_takes_last_close_sample() {
        let frequencies = [10.0, 19.99995, 20.00005, 100.0, 499.99995, 500.00005, 600.0];
        assert_eq!(frequency_window(&frequencies, F_LOW, F_UP), Ok(2..5));
    }

    #[test]
    fn test_read_and_band() {
        let dir = tempfile::tempdir().unwrap();
        let time = GpsTime::new(966_384_015, 0);
        let path = calibration_file(dir.path(), "H1", time);
        std::fs::write(
            &path,
            "10 1.0 0.0\n20 1.1 4.0\n100 1.2 -5.0\n500 1.3 0.1\n1000 1.4 0.2\n",
        )
        .unwrap();
        let curve = CalibrationCurve::read(dir.path(), "H1", time).unwrap();
        let band = curve.in_band(&path).unwrap();
        assert_eq!(band.frequency, vec![20.0, 100.0]);
        assert_eq!(band.amplitude_points(), vec![(20.0, 1.1), (100.0, 1.2)]);
        assert!((band.phase[0] - (4.0 - 2.0 * PI)).abs() < 1e-12);
        assert!((band.phase[1] - (-5.0 + 2.0 * PI)).abs() < 1e-12);

        std::fs::write(&path, "10 1.0 0.0\n").unwrap();
        let curve = CalibrationCurve::read(dir.path(), "H1", time).unwrap();
        assert!(matches!(
            curve.in_band(&path),
            Err(CompareError::FrequencyNotFound { frequency, .. }) if frequency == F_LOW
        ));
    }
}
