use std::path::PathBuf;

/// Errors raised while building or rendering a figure.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PlotError {
    #[display("Failed to draw {}: {message}", path.display())]
    Drawing { path: PathBuf, message: String },
    #[display("Nothing to plot: {what}")]
    Empty { what: &'static str },
    #[display("Series length mismatch: expected {expected} values, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[display("Too many series: at most {limit} are supported")]
    TooManySeries { limit: usize },
}

impl PlotError {
    pub(crate) fn check_lengths(expected: usize, found: usize) -> Result<(), Self> {
        if expected == found {
            Ok(())
        } else {
            Err(Self::LengthMismatch { expected, found })
        }
    }
}
