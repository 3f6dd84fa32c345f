//! Signal-to-noise ratios of a recovered event.
//!
//! Each detector's SNR lives in `snr_{IFO}_{time}.0.dat` as a single
//! `IFO: value` line. Some pipelines instead write one file for the whole
//! network, `snr_{IFOS}_{time}.0.dat`, with one such line per detector and
//! usually a final `Network: value` line.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{CompareError, gps::GpsTime};

pub const NETWORK: &str = "Network";

/// Per-detector SNRs and their network combination.
#[derive(Debug, Clone, PartialEq)]
pub struct SnrValues {
    pub detectors: Vec<(String, f64)>,
    pub network: f64,
}

impl SnrValues {
    /// Combines per-detector SNRs into the root-sum-square network SNR.
    ///
    /// ```
    /// use gwpost_compare::snr::SnrValues;
    ///
    /// let snr = SnrValues::from_detectors(vec![("H1".into(), 3.0), ("L1".into(), 4.0)]);
    /// assert_eq!(snr.network, 5.0);
    /// ```
    #[must_use]
    pub fn from_detectors(detectors: Vec<(String, f64)>) -> Self {
        let network = detectors.iter().map(|(_, snr)| snr * snr).sum::<f64>().sqrt();
        Self { detectors, network }
    }

    /// Column names matching [`SnrValues::values`].
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        self.detectors
            .iter()
            .map(|(ifo, _)| ifo.as_str())
            .chain([NETWORK])
            .map(|name| format!("SNR_{name}"))
            .collect()
    }

    /// Detector SNRs in order followed by the network SNR.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.detectors
            .iter()
            .map(|(_, snr)| *snr)
            .chain([self.network])
            .collect()
    }

    #[must_use]
    pub fn get(&self, ifo: &str) -> Option<f64> {
        if ifo == NETWORK {
            return Some(self.network);
        }
        self.detectors
            .iter()
            .find(|(name, _)| name == ifo)
            .map(|(_, snr)| *snr)
    }
}

#[must_use]
pub fn snr_file(dir: &Path, ifo: &str, time: GpsTime) -> PathBuf {
    dir.join(format!("snr_{ifo}_{time}.0.dat"))
}

/// Parses a `NAME: value` (or `NAME value`) line.
///
/// ```
/// use gwpost_compare::snr::parse_snr_line;
///
/// assert_eq!(parse_snr_line("H1: 10.5"), Some(("H1".to_owned(), 10.5)));
/// assert_eq!(parse_snr_line("Network 7"), Some(("Network".to_owned(), 7.0)));
/// assert_eq!(parse_snr_line("garbage"), None);
/// ```
#[must_use]
pub fn parse_snr_line(line: &str) -> Option<(String, f64)> {
    let line = line.trim();
    let (name, value) = line
        .split_once(':')
        .or_else(|| line.split_once(char::is_whitespace))?;
    let value = value.trim().parse().ok()?;
    Some((name.trim().to_owned(), value))
}

fn read_lines(path: &Path) -> Result<Vec<(String, f64)>, CompareError> {
    let text = fs::read_to_string(path).map_err(CompareError::io(path))?;
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            parse_snr_line(line).ok_or_else(|| CompareError::InvalidValue {
                path: path.to_owned(),
                text: line.to_owned(),
            })
        })
        .collect()
}

/// Reads the SNRs of the event at `time` for `ifos` from `dir`.
///
/// Per-detector files are used when all of them exist, otherwise the
/// network file. A network file without a `Network` line gets the
/// root-sum-square of its detectors.
pub fn read_snr(dir: &Path, time: GpsTime, ifos: &[String]) -> Result<SnrValues, CompareError> {
    let single_files = ifos
        .iter()
        .map(|ifo| snr_file(dir, ifo, time))
        .collect::<Vec<_>>();
    if !single_files.is_empty() && single_files.iter().all(|path| path.is_file()) {
        let mut detectors = Vec::with_capacity(ifos.len());
        for (ifo, path) in ifos.iter().zip(&single_files) {
            log::debug!("Reading SNR from {}", path.display());
            let snr = read_lines(path)?
                .into_iter()
                .find(|(name, _)| name == ifo)
                .ok_or_else(|| CompareError::MissingDetector {
                    path: path.clone(),
                    ifo: ifo.clone(),
                })?;
            detectors.push(snr);
        }
        return Ok(SnrValues::from_detectors(detectors));
    }

    let network_file = snr_file(dir, &ifos.concat(), time);
    if !network_file.is_file() {
        return Err(CompareError::MissingSnr {
            dir: dir.to_owned(),
            time,
        });
    }
    log::debug!("Reading SNRs from {}", network_file.display());
    let lines = read_lines(&network_file)?;
    let lookup = |name: &str| {
        lines
            .iter()
            .find(|(ifo, _)| ifo == name)
            .map(|(_, snr)| *snr)
    };
    let detectors = ifos
        .iter()
        .map(|ifo| {
            lookup(ifo)
                .map(|snr| (ifo.clone(), snr))
                .ok_or_else(|| CompareError::MissingDetector {
                    path: network_file.clone(),
                    ifo: ifo.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let mut values = SnrValues::from_detectors(detectors);
    if let Some(network) = lookup(NETWORK) {
        values.network = network;
    }
    Ok(values)
}
