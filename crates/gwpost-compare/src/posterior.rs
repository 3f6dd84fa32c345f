//! Per-event posterior summaries.
//!
//! A posterior file `posterior_samples_{time}.000` is a whitespace table with
//! one column per parameter and one row per sample. The log-likelihood column
//! is not a physical parameter and is left out of the summary.

use std::path::{Path, PathBuf};

use gwpost_stats::descriptive::{mean, std_dev};
use gwpost_table::{Header, NumericTable, TableError};

use crate::{CompareError, gps::GpsTime};

const LOG_LIKELIHOOD_COLUMN: &str = "logl";

/// Location of the posterior samples of the event at `time`.
#[must_use]
pub fn posterior_file(dir: &Path, time: GpsTime) -> PathBuf {
    dir.join(format!("posterior_samples_{time}.000"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSummary {
    pub name: String,
    pub mean: f64,
    /// Population standard deviation of the samples.
    pub stdev: f64,
    pub injected: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PosteriorSummary {
    parameters: Vec<ParameterSummary>,
}

impl PosteriorSummary {
    /// Summarizes every column but `logl`, in column order.
    ///
    /// Column names are lowercased. `injected` looks up the injected value of
    /// a parameter by name.
    ///
    /// ```
    /// use gwpost_compare::posterior::PosteriorSummary;
    /// use gwpost_table::{Header, NumericTable};
    ///
    /// let table = NumericTable::parse("mc logL\n1.0 -3\n3.0 -2\n", Header::FirstLine)?;
    /// let summary = PosteriorSummary::from_table(&table, |_| None)?;
    /// assert_eq!(summary.names().collect::<Vec<_>>(), ["mc"]);
    /// assert_eq!(summary.get("mc").map(|p| (p.mean, p.stdev)), Some((2.0, 1.0)));
    /// # Ok::<(), gwpost_table::TableError>(())
    /// ```
    pub fn from_table<F>(table: &NumericTable, injected: F) -> Result<Self, TableError>
    where
        F: Fn(&str) -> Option<f64>,
    {
        if table.is_empty() {
            return Err(TableError::Empty);
        }
        let names = table.names().unwrap_or_default();
        let mut parameters = Vec::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            let name = name.to_lowercase();
            if name == LOG_LIKELIHOOD_COLUMN {
                continue;
            }
            let samples = table.column_at(index)?;
            let mean = mean(&samples);
            parameters.push(ParameterSummary {
                injected: injected(&name),
                stdev: std_dev(&samples, mean),
                mean,
                name,
            });
        }
        Ok(Self { parameters })
    }

    pub fn read<P, F>(path: P, injected: F) -> Result<Self, CompareError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<f64>,
    {
        let path = path.as_ref();
        log::debug!("Reading posterior samples from {}", path.display());
        NumericTable::read(path, Header::FirstLine)
            .and_then(|table| Self::from_table(&table, injected))
            .map_err(CompareError::table(path))
    }

    #[must_use]
    pub fn parameters(&self) -> &[ParameterSummary] {
        &self.parameters
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterSummary> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_skips_logl() {
        let table = NumericTable::parse(
            "# samples\nlogl ra dec\n-10 1.0 0.1\n-11 2.0 0.3\n-12 3.0 0.2\n",
            Header::FirstLine,
        )
        .unwrap();
        let summary =
            PosteriorSummary::from_table(&table, |name| (name == "ra").then_some(1.5)).unwrap();
        assert_eq!(summary.names().collect::<Vec<_>>(), ["ra", "dec"]);
        let ra = summary.get("ra").unwrap();
        assert!((ra.mean - 2.0).abs() < 1e-12);
        assert!((ra.stdev - (2.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(ra.injected, Some(1.5));
        assert_eq!(summary.get("dec").unwrap().injected, None);
    }

    #[test]
    fn test_missing_posterior_names_path_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = posterior_file(dir.path(), GpsTime::new(1000, 0));
        let err = PosteriorSummary::read(&path, |_| None).unwrap_err();
        let mut chain = vec![err.to_string()];
        let mut source = std::error::Error::source(&err);
        while let Some(err) = source {
            chain.push(err.to_string());
            source = err.source();
        }
        let rendered = chain.join(": ");
        assert_eq!(rendered.matches("posterior_samples_1000.000").count(), 1);
    }

    #[test]
    fn test_empty_posterior() {
        let dir = tempfile::tempdir().unwrap();
        let time = GpsTime::new(966_384_015, 0);
        let path = posterior_file(dir.path(), time);
        assert!(path.ends_with("posterior_samples_966384015.000"));
        std::fs::write(&path, "mc logl\n").unwrap();
        assert!(matches!(
            PosteriorSummary::read(&path, |_| None),
            Err(CompareError::Table {
                source: TableError::Empty,
                ..
            })
        ));
    }
}
