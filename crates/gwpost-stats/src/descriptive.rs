/// Descriptive statistics summarizing a dataset.
///
/// Dispersion and shape measures use population (divide-by-`n`) moments,
/// and kurtosis is the plain fourth standardized moment (3 for a normal
/// distribution, not the excess kurtosis).
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// The number of values in the dataset.
    pub count: usize,
    pub min: f64,
    pub max: f64,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The median value of the dataset (average of the two central values for even counts).
    pub median: f64,
    /// The population variance of the dataset.
    pub variance: f64,
    /// The population standard deviation of the dataset.
    pub std_dev: f64,
    /// The third standardized moment.
    pub skewness: f64,
    /// The fourth standardized moment.
    pub kurtosis: f64,
}

impl DescriptiveStats {
    /// Summarizes the finite values among `values`, `None` when there are
    /// none. NaN and infinite values are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gwpost_stats::descriptive::DescriptiveStats;
    /// let snr = [12.0, 9.0, 10.0, 8.0, 11.0];
    /// let stats = DescriptiveStats::new(snr).unwrap();
    /// assert_eq!((stats.min, stats.max), (8.0, 12.0));
    /// assert_eq!(stats.mean, 10.0);
    /// assert_eq!(stats.median, 10.0);
    /// assert_eq!(stats.skewness, 0.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Same as [`DescriptiveStats::new`] for values already in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order, which
    /// includes holding a NaN.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let n = sorted_values.len();
        let mean = mean(sorted_values);
        let median = if n % 2 == 1 {
            sorted_values[n / 2]
        } else {
            0.5 * (sorted_values[n / 2 - 1] + sorted_values[n / 2])
        };
        let std_dev = std_dev(sorted_values, mean);

        Some(Self {
            count: n,
            min,
            max,
            mean,
            median,
            variance: std_dev * std_dev,
            std_dev,
            skewness: skewness(sorted_values, mean, std_dev),
            kurtosis: kurtosis(sorted_values, mean, std_dev),
        })
    }
}

/// Arithmetic mean. Returns NaN for an empty slice.
///
/// ```
/// # use gwpost_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
/// assert!(mean(&[]).is_nan());
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around a precomputed mean.
///
/// ```
/// # use gwpost_stats::descriptive::std_dev;
/// let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert_eq!(std_dev(&values, 5.0), 2.0);
/// ```
#[must_use]
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    central_moment(values, mean, 2).sqrt()
}

/// Third standardized moment: `Σ(x - μ)³ / (n σ³)`.
///
/// Returns NaN when `std_dev` is zero.
#[must_use]
pub fn skewness(values: &[f64], mean: f64, std_dev: f64) -> f64 {
    standardized_moment(values, mean, std_dev, 3)
}

/// Fourth standardized moment: `Σ(x - μ)⁴ / (n σ⁴)`.
///
/// Returns NaN when `std_dev` is zero.
#[must_use]
pub fn kurtosis(values: &[f64], mean: f64, std_dev: f64) -> f64 {
    standardized_moment(values, mean, std_dev, 4)
}

#[expect(clippy::cast_precision_loss)]
fn central_moment(values: &[f64], mean: f64, order: i32) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().map(|x| (x - mean).powi(order)).sum::<f64>() / values.len() as f64
}

fn standardized_moment(values: &[f64], mean: f64, std_dev: f64, order: i32) -> f64 {
    if std_dev == 0.0 {
        return f64::NAN;
    }
    central_moment(values, mean, order) / std_dev.powi(order)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_distr::{Distribution as _, Exp, Normal};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual} (tolerance {tol})"
        );
    }

    #[test]
    fn test_empty_values() {
        assert!(DescriptiveStats::new(Vec::<f64>::new()).is_none());
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([4.2]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 4.2);
        assert_eq!(stats.median, 4.2);
        assert_eq!(stats.std_dev, 0.0);
        assert!(stats.skewness.is_nan());
        assert!(stats.kurtosis.is_nan());
    }

    #[test]
    fn test_matches_closed_form() {
        let values = [1.0, 2.0, 3.0, 4.0, 10.0];
        let stats = DescriptiveStats::new(values).unwrap();

        let m = 4.0;
        let deviations = [-3.0_f64, -2.0, -1.0, 0.0, 6.0];
        let m2 = deviations.iter().map(|d| d.powi(2)).sum::<f64>() / 5.0;
        let m3 = deviations.iter().map(|d| d.powi(3)).sum::<f64>() / 5.0;
        let m4 = deviations.iter().map(|d| d.powi(4)).sum::<f64>() / 5.0;

        assert_close(stats.mean, m, 1e-12);
        assert_close(stats.variance, m2, 1e-12);
        assert_close(stats.std_dev, m2.sqrt(), 1e-12);
        assert_close(stats.skewness, m3 / m2.powf(1.5), 1e-12);
        assert_close(stats.kurtosis, m4 / (m2 * m2), 1e-12);
        assert!(stats.skewness > 0.0);
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let stats = DescriptiveStats::new([2.0, f64::NAN, 4.0, f64::INFINITY, 6.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!((stats.min, stats.max), (2.0, 6.0));
        assert_eq!(stats.mean, 4.0);
        assert!(DescriptiveStats::new([f64::NAN, f64::NEG_INFINITY]).is_none());
    }

    #[test]
    #[should_panic(expected = "values must be sorted in ascending order")]
    fn test_from_sorted_rejects_nan() {
        let _ = DescriptiveStats::from_sorted(&[1.0, f64::NAN]);
    }

    #[test]
    fn test_even_count_median() {
        let stats = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn test_normal_sample_shape() {
        let mut rng = Pcg64Mcg::seed_from_u64(0x5eed);
        let normal = Normal::new(3.0, 2.0).unwrap();
        let values = (0..50_000).map(|_| normal.sample(&mut rng)).collect::<Vec<f64>>();
        let stats = DescriptiveStats::new(values).unwrap();

        assert_close(stats.mean, 3.0, 0.05);
        assert_close(stats.std_dev, 2.0, 0.05);
        assert_close(stats.skewness, 0.0, 0.05);
        assert_close(stats.kurtosis, 3.0, 0.1);
    }

    #[test]
    fn test_exponential_sample_is_right_skewed() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        let exp = Exp::new(1.0).unwrap();
        let values = (0..50_000).map(|_| exp.sample(&mut rng)).collect::<Vec<f64>>();
        let stats = DescriptiveStats::new(values).unwrap();

        // Exponential(1): skewness 2, kurtosis 9
        assert_close(stats.skewness, 2.0, 0.2);
        assert!(stats.kurtosis > 6.0);
    }
}
