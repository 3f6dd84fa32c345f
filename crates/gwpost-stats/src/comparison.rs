use serde::Serialize;

use crate::{descriptive::DescriptiveStats, percentiles::Percentiles};

/// Distribution summary of a paired-run comparison quantity.
///
/// Combines the moments and the percentile points reported for the shift
/// of a parameter between a perturbed run and its control run. Only finite
/// values are summarized; the others are counted in `dropped`.
///
/// # Examples
///
/// ```
/// use gwpost_stats::comparison::EffectSummary;
///
/// let summary = EffectSummary::new(&[-1.0, 0.0, 1.0]).unwrap();
/// assert_eq!(summary.mean, 0.0);
/// assert_eq!(summary.median, 0.0);
/// assert!(summary.p5 < summary.p50 && summary.p50 < summary.p95);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectSummary {
    /// Number of values summarized.
    pub count: usize,
    /// Number of NaN or infinite values left out.
    pub dropped: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Median value.
    pub median: f64,
    /// 5th percentile.
    pub p5: f64,
    /// 50th percentile (equal to the median).
    pub p50: f64,
    /// 95th percentile.
    pub p95: f64,
    /// Third standardized moment.
    pub skewness: f64,
    /// Fourth standardized moment.
    pub kurtosis: f64,
}

impl EffectSummary {
    /// Summarizes the finite `values`, returning `None` when there are none.
    #[must_use]
    pub fn new(values: &[f64]) -> Option<Self> {
        let mut sorted = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        let stats = DescriptiveStats::from_sorted(&sorted)?;
        let percentiles = Percentiles::from_sorted(&sorted, &[5.0, 50.0, 95.0]);
        Some(Self {
            count: stats.count,
            dropped: values.len() - stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            median: stats.median,
            p5: percentiles.get(5.0)?,
            p50: percentiles.get(50.0)?,
            p95: percentiles.get(95.0)?,
            skewness: stats.skewness,
            kurtosis: stats.kurtosis,
        })
    }
}

/// Element-wise shift `perturbed - control`.
///
/// # Panics
///
/// Panics if the slices differ in length.
#[must_use]
pub fn deltas(perturbed: &[f64], control: &[f64]) -> Vec<f64> {
    assert_eq!(perturbed.len(), control.len(), "paired samples must align");
    perturbed.iter().zip(control).map(|(p, c)| p - c).collect()
}

/// Element-wise effect size `(perturbed - control) / control_sigma`.
///
/// A zero `control_sigma` yields an infinite effect, or NaN when the means
/// agree. [`EffectSummary::new`] leaves such values out and counts them.
///
/// ```
/// use gwpost_stats::comparison::effect_sizes;
///
/// assert_eq!(effect_sizes(&[3.0, 1.0], &[1.0, 1.0], &[2.0, 0.5]), vec![1.0, 0.0]);
/// ```
///
/// # Panics
///
/// Panics if the slices differ in length.
#[must_use]
pub fn effect_sizes(perturbed: &[f64], control: &[f64], control_sigma: &[f64]) -> Vec<f64> {
    assert_eq!(
        control.len(),
        control_sigma.len(),
        "paired samples must align"
    );
    deltas(perturbed, control)
        .into_iter()
        .zip(control_sigma)
        .map(|(d, s)| d / s)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        assert!(EffectSummary::new(&[]).is_none());
    }

    #[test]
    fn test_summary_percentiles() {
        let values = (0..=100).map(f64::from).collect::<Vec<_>>();
        let summary = EffectSummary::new(&values).unwrap();
        assert_eq!(summary.count, 101);
        assert_eq!(summary.p5, 5.0);
        assert_eq!(summary.p50, 50.0);
        assert_eq!(summary.p95, 95.0);
        assert_eq!(summary.median, summary.p50);
        assert!(summary.skewness.abs() < 1e-12);
    }

    #[test]
    fn test_effect_sizes_zero_sigma() {
        let effects = effect_sizes(&[2.0], &[1.0], &[0.0]);
        assert!(effects[0].is_infinite());
    }

    #[test]
    fn test_summary_skips_non_finite() {
        let summary = EffectSummary::new(&[f64::NAN, 1.0, f64::INFINITY, 3.0]).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.dropped, 2);
        assert_eq!(summary.mean, 2.0);
        assert_eq!(summary.p50, 2.0);
        assert!(summary.p95.is_finite());
    }

    #[test]
    fn test_summary_of_pinned_parameter() {
        // unchanged means over a zero control sigma
        let effects = effect_sizes(&[0.5, 0.5], &[0.5, 0.5], &[0.0, 0.0]);
        assert!(effects.iter().all(|e| e.is_nan()));
        assert!(EffectSummary::new(&effects).is_none());
        let summary = EffectSummary::new(&deltas(&[0.5, 0.5], &[0.5, 0.5])).unwrap();
        assert_eq!((summary.mean, summary.dropped), (0.0, 0));
    }

    #[test]
    #[should_panic(expected = "paired samples must align")]
    fn test_misaligned_deltas() {
        let _ = deltas(&[1.0], &[1.0, 2.0]);
    }
}
