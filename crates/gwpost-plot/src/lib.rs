//! Static figures for data-quality and parameter-estimation reports.
//!
//! Every figure type follows the same pattern: construct it, add one or more
//! series to it, then render it to an SVG file with `save`. Adding series to
//! an existing figure is how several classifiers (or runs) are overlaid on
//! the same axes.
//!
//! ```no_run
//! use gwpost_plot::{BLUE, roc::RocFigure};
//!
//! let mut figure = RocFigure::new();
//! figure.add_curve(&[1, 5, 100], &[10, 40, 50], BLUE, Some("ovl"))?;
//! figure.save("L1_ovl_ROC-1000-32.svg")?;
//! # Ok::<(), gwpost_plot::PlotError>(())
//! ```

pub use plotters::style::{BLACK, BLUE, CYAN, GREEN, RED, RGBColor, YELLOW};

pub use self::{
    error::PlotError,
    figure::{SERIES_COLORS, series_color},
};

pub mod bitword;
mod error;
mod figure;
pub mod naming;
pub mod params;
pub mod rank;
pub mod rates;
pub mod roc;
pub mod skymap;
pub mod xy;
