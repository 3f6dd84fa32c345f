//! Standard file names of the per-stride summary figures.
//!
//! ```
//! use std::path::Path;
//! use gwpost_plot::naming::FigureNames;
//!
//! let names = FigureNames {
//!     directory: Path::new("summary"),
//!     ifo: "L1",
//!     tag: "_test",
//!     gps_start: 1_000_000_000,
//!     stride: 300,
//! };
//! assert_eq!(
//!     names.roc_figure("ovl", "svg"),
//!     Path::new("summary/L1_ovl_test_ROC-1000000000-300.svg"),
//! );
//! ```

use std::path::{Path, PathBuf};

/// The parts shared by every figure name of one stride.
#[derive(Debug, Clone, Copy)]
pub struct FigureNames<'a> {
    pub directory: &'a Path,
    pub ifo: &'a str,
    /// User tag appended to the classifier name, usually starting with `_`.
    pub tag: &'a str,
    pub gps_start: i64,
    pub stride: i64,
}

impl FigureNames<'_> {
    fn classifier_file(&self, classifier: &str, kind: &str, extension: &str) -> PathBuf {
        self.directory.join(format!(
            "{}_{classifier}{}_{kind}-{}-{}.{extension}",
            self.ifo, self.tag, self.gps_start, self.stride
        ))
    }

    /// ROC curve figure of one classifier.
    #[must_use]
    pub fn roc_figure(&self, classifier: &str, figtype: &str) -> PathBuf {
        self.classifier_file(classifier, "ROC", figtype)
    }

    /// Rank histogram figure of one classifier.
    #[must_use]
    pub fn hist_figure(&self, classifier: &str, figtype: &str) -> PathBuf {
        self.classifier_file(classifier, "HIST", figtype)
    }

    /// Rank density figure of one classifier.
    #[must_use]
    pub fn kde_figure(&self, classifier: &str, figtype: &str) -> PathBuf {
        self.classifier_file(classifier, "KDE", figtype)
    }

    /// Compressed array file holding the rank density of one classifier.
    #[must_use]
    pub fn kde_name(&self, classifier: &str) -> PathBuf {
        self.classifier_file(classifier, "KDE", "npy.gz")
    }

    /// Stacked histogram of one extra output column of a classifier.
    #[must_use]
    pub fn params_figure(&self, classifier: &str, column: &str, figtype: &str) -> PathBuf {
        self.classifier_file(classifier, &format!("PARAMS_{column}"), figtype)
    }

    fn combined_file(&self, kind: &str, extension: &str) -> PathBuf {
        self.directory.join(format!(
            "{}{}_{kind}-{}-{}.{extension}",
            self.ifo, self.tag, self.gps_start, self.stride
        ))
    }

    /// Bit-word figure combining all classifiers.
    #[must_use]
    pub fn bitword_figure(&self, figtype: &str) -> PathBuf {
        self.combined_file("BITWORD", figtype)
    }

    /// Glitch rate figure combining all classifiers.
    #[must_use]
    pub fn rates_figure(&self, figtype: &str) -> PathBuf {
        self.combined_file("RATES", figtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> FigureNames<'static> {
        FigureNames {
            directory: Path::new("/data/idq"),
            ifo: "H1",
            tag: "",
            gps_start: 966_384_000,
            stride: 32,
        }
    }

    #[test]
    fn test_classifier_figures() {
        let names = names();
        assert_eq!(
            names.hist_figure("mvsc", "png"),
            Path::new("/data/idq/H1_mvsc_HIST-966384000-32.png")
        );
        assert_eq!(
            names.kde_figure("mvsc", "svg"),
            Path::new("/data/idq/H1_mvsc_KDE-966384000-32.svg")
        );
        assert_eq!(
            names.kde_name("mvsc"),
            Path::new("/data/idq/H1_mvsc_KDE-966384000-32.npy.gz")
        );
    }

    #[test]
    fn test_bitword_figure() {
        let names = FigureNames {
            tag: "_run2",
            ..names()
        };
        assert_eq!(
            names.bitword_figure("svg"),
            Path::new("/data/idq/H1_run2_BITWORD-966384000-32.svg")
        );
        assert_eq!(
            names.rates_figure("svg"),
            Path::new("/data/idq/H1_run2_RATES-966384000-32.svg")
        );
        assert_eq!(
            names.params_figure("ovl", "signif", "svg"),
            Path::new("/data/idq/H1_ovl_run2_PARAMS_signif-966384000-32.svg")
        );
    }
}
