//! Numeric summaries used by the gwpost plotting and report tools.
//!
//! This crate provides the small set of statistics the reports are built on:
//!
//! - **Descriptive statistics**: mean, population standard deviation, skewness, kurtosis
//! - **Percentiles**: linearly interpolated scores at percentile points
//! - **Histograms**: linearly spaced bin edges, weighted counts and densities
//! - **Kernel density estimates**: Gaussian KDE with fixed or point-wise bandwidth
//! - **Confidence regions**: Wilson score intervals for binomial proportions
//! - **Comparison summaries**: distribution summary of a paired-run effect size
//!
//! # Modules
//!
//! - [`descriptive`]: Moments of a sample
//! - [`percentiles`]: Interpolated scores at percentile points
//! - [`histogram`]: Bin edges and histogram construction
//! - [`kde`]: Kernel density estimation and cumulative integration
//! - [`confidence`]: Binomial confidence intervals
//! - [`comparison`]: Effect-size summaries for run comparisons
//!
//! # Examples
//!
//! ## Moments of a sample
//!
//! ```
//! use gwpost_stats::descriptive::DescriptiveStats;
//!
//! let snr = [8.0, 9.0, 10.0, 11.0, 12.0];
//! let stats = DescriptiveStats::new(snr).unwrap();
//! assert_eq!(stats.mean, 10.0);
//! assert_eq!(stats.std_dev, 2.0_f64.sqrt());
//! ```
//!
//! ## Percentile scores
//!
//! ```
//! use gwpost_stats::percentiles::Percentiles;
//!
//! let snr = [8.0, 9.0, 10.0, 11.0, 12.0];
//! let percentiles = Percentiles::new(&snr, &[5.0, 50.0, 95.0]);
//! assert_eq!(percentiles.get(50.0), Some(10.0));
//! ```
//!
//! ## Histograms
//!
//! ```
//! use gwpost_stats::histogram::Histogram;
//!
//! let values = [0.1, 0.2, 0.25, 0.7, 0.9];
//! let histogram = Histogram::uniform(&values, 0.0, 1.0, 4);
//! assert_eq!(histogram.counts(), vec![2.0, 1.0, 1.0, 1.0]);
//! ```

pub mod comparison;
pub mod confidence;
pub mod descriptive;
pub mod histogram;
pub mod kde;
pub mod percentiles;
