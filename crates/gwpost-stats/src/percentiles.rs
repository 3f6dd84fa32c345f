/// Scores of a sample at a fixed set of percentile points.
///
/// ```
/// use gwpost_stats::percentiles::Percentiles;
///
/// let effect = [0.4, -0.2, 1.1, 0.0, 0.7];
/// let percentiles = Percentiles::new(&effect, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(0.4));
/// assert_eq!(percentiles.get(75.0), Some(0.7));
/// assert_eq!(percentiles.get(95.0), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Percentiles {
    /// `(percentile, score)` in request order, percentiles in `[0, 100]`.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Scores `sorted_values`, which must be in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .map(|&p| (p, score_at_percentile(sorted_values, p)))
            .collect();
        Self { values }
    }

    /// Sorts a copy of `values` without its NaNs and scores it.
    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Self {
        let mut sorted = values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Score at `percentile`, `None` unless it was one of the requested points.
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values
            .iter()
            .find(|(p, _)| (*p - percentile).abs() < 1e-9)
            .map(|(_, value)| *value)
    }

    /// All `(percentile, score)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }
}

/// Score of ascending `sorted_values` at one percentile.
///
/// The score is linearly interpolated between the two closest ranks: for `n`
/// values the fractional index is `(n - 1) * percentile / 100`. Percentiles
/// outside `[0, 100]` are clamped.
///
/// Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use gwpost_stats::percentiles::score_at_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(score_at_percentile(&values, 50.0), 2.5);
/// assert_eq!(score_at_percentile(&values, 0.0), 1.0);
/// assert_eq!(score_at_percentile(&values, 100.0), 4.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn score_at_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let position = (sorted_values.len() - 1) as f64 * percentile.clamp(0.0, 100.0) / 100.0;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - position.floor();
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_nan() {
        assert!(score_at_percentile(&[], 50.0).is_nan());
        let percentiles = Percentiles::new(&[], &[50.0]);
        assert!(percentiles.get(50.0).unwrap().is_nan());
    }

    #[test]
    fn test_single_value() {
        for p in [0.0, 5.0, 50.0, 95.0, 100.0] {
            assert_eq!(score_at_percentile(&[7.0], p), 7.0);
        }
    }

    #[test]
    fn test_interpolation() {
        let values = (0..=10).map(f64::from).collect::<Vec<_>>();
        assert!((score_at_percentile(&values, 5.0) - 0.5).abs() < 1e-12);
        assert!((score_at_percentile(&values, 95.0) - 9.5).abs() < 1e-12);
        assert_eq!(score_at_percentile(&values, 50.0), 5.0);
    }

    #[test]
    fn test_clamped_out_of_range() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(score_at_percentile(&values, -10.0), 1.0);
        assert_eq!(score_at_percentile(&values, 120.0), 3.0);
    }

    #[test]
    fn test_unsorted_input_and_lookup() {
        let percentiles = Percentiles::new(&[9.0, 1.0, 5.0], &[0.0, 50.0, 100.0]);
        assert_eq!(
            percentiles.iter().collect::<Vec<_>>(),
            vec![(0.0, 1.0), (50.0, 5.0), (100.0, 9.0)]
        );
        assert_eq!(percentiles.get(25.0), None);
    }

    #[test]
    fn test_nan_is_skipped() {
        let percentiles = Percentiles::new(&[f64::NAN, 4.0, 2.0, f64::INFINITY], &[0.0, 50.0]);
        assert_eq!(percentiles.get(0.0), Some(2.0));
        assert_eq!(percentiles.get(50.0), Some(4.0));
    }
}
