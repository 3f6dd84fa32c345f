//! Per-run summary tables.
//!
//! Every run gets `summary_ctrl.dat` (run 0) or `summary_{run}.dat`: one
//! tab-separated row per event holding the injection time, the mean and
//! standard deviation of each parameter, the BSN and the SNRs. The column
//! names go to `headers_{run}.dat`.

use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use crate::{
    CompareError,
    gps::GpsTime,
    posterior::{ParameterSummary, PosteriorSummary},
    snr::SnrValues,
};

/// Everything recovered for one event in one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub time: GpsTime,
    /// Row of the event in the injection table.
    pub event: usize,
    pub posterior: PosteriorSummary,
    pub bsn: f64,
    pub snr: SnrValues,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    run: usize,
    rows: Vec<SummaryRow>,
}

impl RunSummary {
    /// Run 0 is the control run.
    #[must_use]
    pub fn new(run: usize, rows: Vec<SummaryRow>) -> Self {
        Self { run, rows }
    }

    #[must_use]
    pub fn run(&self) -> usize {
        self.run
    }

    #[must_use]
    pub fn is_control(&self) -> bool {
        self.run == 0
    }

    #[must_use]
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    /// Parameter names of the first event.
    #[must_use]
    pub fn parameters(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.posterior.names().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Column names of the summary file.
    ///
    /// ```
    /// use gwpost_compare::{
    ///     gps::GpsTime, posterior::PosteriorSummary, snr::SnrValues,
    ///     summary::{RunSummary, SummaryRow},
    /// };
    /// use gwpost_table::{Header, NumericTable};
    ///
    /// let table = NumericTable::parse("mc logl\n1.0 -3\n", Header::FirstLine)?;
    /// let row = SummaryRow {
    ///     time: GpsTime::new(100, 0),
    ///     event: 0,
    ///     posterior: PosteriorSummary::from_table(&table, |_| None)?,
    ///     bsn: 10.0,
    ///     snr: SnrValues::from_detectors(vec![("H1".into(), 9.0)]),
    /// };
    /// let summary = RunSummary::new(1, vec![row]);
    /// assert_eq!(
    ///     summary.headers(),
    ///     ["injTime", "mean_mc", "stdev_mc", "BSN", "SNR_H1", "SNR_Network"],
    /// );
    /// # Ok::<(), gwpost_table::TableError>(())
    /// ```
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec!["injTime".to_owned()];
        let Some(first) = self.rows.first() else {
            return headers;
        };
        for name in first.posterior.names() {
            headers.push(format!("mean_{name}"));
            headers.push(format!("stdev_{name}"));
        }
        headers.push("BSN".to_owned());
        headers.extend(first.snr.headers());
        headers
    }

    #[must_use]
    pub fn times(&self) -> Vec<GpsTime> {
        self.rows.iter().map(|row| row.time).collect()
    }

    /// Posterior means of `parameter`, NaN where an event lacks it.
    #[must_use]
    pub fn means(&self, parameter: &str) -> Vec<f64> {
        self.parameter_values(parameter, |p| p.mean)
    }

    /// Posterior standard deviations of `parameter`.
    #[must_use]
    pub fn stdevs(&self, parameter: &str) -> Vec<f64> {
        self.parameter_values(parameter, |p| p.stdev)
    }

    fn parameter_values<F>(&self, parameter: &str, field: F) -> Vec<f64>
    where
        F: Fn(&ParameterSummary) -> f64,
    {
        self.rows
            .iter()
            .map(|row| row.posterior.get(parameter).map_or(f64::NAN, &field))
            .collect()
    }

    #[must_use]
    pub fn bsn(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.bsn).collect()
    }

    #[must_use]
    pub fn network_snr(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.snr.network).collect()
    }

    #[must_use]
    pub fn summary_file(&self, outdir: &Path) -> PathBuf {
        if self.is_control() {
            outdir.join("summary_ctrl.dat")
        } else {
            outdir.join(format!("summary_{}.dat", self.run))
        }
    }

    #[must_use]
    pub fn headers_file(&self, outdir: &Path) -> PathBuf {
        outdir.join(format!("headers_{}.dat", self.run))
    }

    /// Writes the summary and header files into `outdir`.
    pub fn write(&self, outdir: &Path) -> Result<(), CompareError> {
        let path = self.summary_file(outdir);
        log::info!("Writing {}", path.display());
        let mut writer = File::create(&path)
            .map(BufWriter::new)
            .map_err(CompareError::io(&path))?;
        for row in &self.rows {
            let mut cells = vec![row.time.to_string()];
            for parameter in row.posterior.parameters() {
                cells.push(parameter.mean.to_string());
                cells.push(parameter.stdev.to_string());
            }
            cells.push(row.bsn.to_string());
            cells.extend(row.snr.values().iter().map(f64::to_string));
            writeln!(writer, "{}", cells.join("\t")).map_err(CompareError::io(&path))?;
        }
        writer.flush().map_err(CompareError::io(&path))?;

        let path = self.headers_file(outdir);
        std::fs::write(&path, format!("{}\n", self.headers().join("\t")))
            .map_err(CompareError::io(&path))
    }
}

#[cfg(test)]
mod tests {
    use gwpost_table::{Header, NumericTable};

    use super::*;

    fn row(seconds: i64, samples: &str, bsn: f64) -> SummaryRow {
        let table = NumericTable::parse(samples, Header::FirstLine).unwrap();
        SummaryRow {
            time: GpsTime::new(seconds, 0),
            event: 0,
            posterior: PosteriorSummary::from_table(&table, |_| None).unwrap(),
            bsn,
            snr: SnrValues::from_detectors(vec![("H1".into(), 6.0), ("L1".into(), 8.0)]),
        }
    }

    #[test]
    fn test_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let summary = RunSummary::new(
            0,
            vec![
                row(100, "mc eta logl\n1.0 0.2 0\n3.0 0.2 0\n", 4.5),
                row(200, "mc eta logl\n2.0 0.25 0\n", 8.0),
            ],
        );
        summary.write(dir.path()).unwrap();

        let text = std::fs::read_to_string(dir.path().join("summary_ctrl.dat")).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "100\t2\t1\t0.2\t0\t4.5\t6\t8\t10");
        assert_eq!(lines[1], "200\t2\t0\t0.25\t0\t8\t6\t8\t10");

        let headers = std::fs::read_to_string(dir.path().join("headers_0.dat")).unwrap();
        assert_eq!(
            headers,
            "injTime\tmean_mc\tstdev_mc\tmean_eta\tstdev_eta\tBSN\tSNR_H1\tSNR_L1\tSNR_Network\n"
        );
    }

    #[test]
    fn test_columns() {
        let summary = RunSummary::new(
            2,
            vec![
                row(100, "mc logl\n1.0 0\n3.0 0\n", 4.5),
                row(200, "eta logl\n0.2 0\n", 8.0),
            ],
        );
        assert!(!summary.is_control());
        assert_eq!(summary.parameters(), ["mc"]);
        assert_eq!(summary.means("mc")[0], 2.0);
        assert!(summary.stdevs("mc")[1].is_nan());
        assert_eq!(summary.bsn(), vec![4.5, 8.0]);
        assert_eq!(summary.network_snr(), vec![10.0, 10.0]);
        assert!(summary.summary_file(Path::new("out")).ends_with("summary_2.dat"));
    }
}
