//! Comparison of parameter-estimation runs on the same injections.
//!
//! A control run and one or more perturbed runs (for example with
//! calibration errors applied) analyse the same set of simulated signals.
//! For every event found in all runs this crate summarizes the posteriors,
//! then measures how far each perturbed run moved every parameter, in units
//! of the control run's posterior width.
//!
//! The entry point is [`runs::compare_runs`], which writes the summary
//! tables, the figures and two HTML pages per perturbed run:
//!
//! ```text
//! outpath/
//!   summary_ctrl.dat  summary_1.dat  headers_0.dat  headers_1.dat
//!   1/
//!     posposplots.html  summary.html  effect_summary.json
//!     ParametersPlots/  SNRPlots/  BSNPlots/  ErrorPlots/  SkyPlots/
//! ```

pub use self::error::CompareError;

pub mod bsn;
pub mod calibration;
mod error;
pub mod events;
pub mod gps;
pub mod html;
pub mod injection;
pub mod pages;
pub mod paths;
pub mod plots;
pub mod posterior;
pub mod runs;
pub mod skymap;
pub mod snr;
pub mod summary;
mod util;
