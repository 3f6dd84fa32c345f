use std::{io, path::PathBuf};

use gwpost_plot::PlotError;
use gwpost_table::TableError;

use crate::gps::GpsTime;

/// Errors raised while building a run-comparison report.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CompareError {
    #[display("Failed to access {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("Failed to read table {}", path.display())]
    Table { path: PathBuf, source: TableError },
    #[display("Failed to render plot")]
    #[from]
    Plot(PlotError),
    #[display("Failed to write JSON to {}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("Invalid event specification {spec:?}: {reason}")]
    InvalidEvents { spec: String, reason: String },
    #[display("Event {index} out of range: the injection table has {count} rows")]
    EventOutOfRange { index: usize, count: usize },
    #[display("Invalid run layout: {reason}")]
    InvalidRuns { reason: String },
    #[display("No posteriors found for the events requested")]
    NoPosteriors,
    #[display("{}: cannot parse {text:?}", path.display())]
    InvalidValue { path: PathBuf, text: String },
    #[display("No SNR file for {time} in {}", dir.display())]
    MissingSnr { dir: PathBuf, time: GpsTime },
    #[display("{}: no SNR for {ifo}", path.display())]
    MissingDetector { path: PathBuf, ifo: String },
    #[display("{}: parameters differ from the other posteriors being compared", path.display())]
    ParameterMismatch { path: PathBuf },
    #[display("{}: no sample at {frequency:.2} Hz", path.display())]
    FrequencyNotFound { path: PathBuf, frequency: f64 },
}

impl CompareError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn table(path: impl Into<PathBuf>) -> impl FnOnce(TableError) -> Self {
        let path = path.into();
        move |source| Self::Table { path, source }
    }
}
