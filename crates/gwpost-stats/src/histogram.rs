use std::ops::Range;

/// A histogram over explicit bin edges.
///
/// Bins are half-open `[start, end)` except the last one, which also contains
/// its upper edge. Values outside the outermost edges are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// The range of values covered by this bin.
    pub range: Range<f64>,
    /// The (possibly weighted) number of values falling within this bin.
    pub count: f64,
}

impl HistogramBin {
    /// Width of the bin.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.range.end - self.range.start
    }

    /// Center of the bin.
    #[must_use]
    pub fn center(&self) -> f64 {
        0.5 * (self.range.start + self.range.end)
    }
}

impl Histogram {
    /// Creates a histogram with `num_bins` equal-width bins spanning `[min, max]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gwpost_stats::histogram::Histogram;
    /// let histogram = Histogram::uniform(&[0.0, 0.5, 1.0, 2.0], 0.0, 1.0, 2);
    /// assert_eq!(histogram.counts(), vec![1.0, 2.0]);
    /// ```
    #[must_use]
    pub fn uniform(values: &[f64], min: f64, max: f64, num_bins: usize) -> Self {
        Self::from_edges(values, None, &linear_space(min, max, num_bins))
    }

    /// Creates a histogram from explicit, ascending bin edges.
    ///
    /// # Arguments
    ///
    /// * `values` - The data points to count
    /// * `weights` - Optional per-value weights; must have the same length as `values`
    /// * `edges` - Bin edges; `n + 1` edges define `n` bins
    ///
    /// # Panics
    ///
    /// Panics if `weights` is given with a different length than `values`, or
    /// if `edges` is not sorted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gwpost_stats::histogram::Histogram;
    /// let histogram = Histogram::from_edges(&[0.1, 0.6, 0.7], Some(&[2.0, 1.0, 1.0]), &[0.0, 0.5, 1.0]);
    /// assert_eq!(histogram.counts(), vec![2.0, 2.0]);
    /// assert_eq!(histogram.total(), 4.0);
    /// ```
    #[must_use]
    pub fn from_edges(values: &[f64], weights: Option<&[f64]>, edges: &[f64]) -> Self {
        assert!(
            edges.is_sorted_by(|a, b| a <= b),
            "bin edges must be sorted in ascending order"
        );
        if let Some(weights) = weights {
            assert_eq!(
                weights.len(),
                values.len(),
                "weights must match values in length"
            );
        }

        let mut bins = edges
            .windows(2)
            .map(|w| HistogramBin {
                range: w[0]..w[1],
                count: 0.0,
            })
            .collect::<Vec<_>>();
        if bins.is_empty() {
            return Self { bins };
        }

        let lo = edges[0];
        let hi = edges[edges.len() - 1];
        for (i, &value) in values.iter().enumerate() {
            if !(lo..=hi).contains(&value) {
                continue;
            }
            // The last edge is inclusive.
            let idx = edges
                .partition_point(|e| *e <= value)
                .saturating_sub(1)
                .min(bins.len() - 1);
            bins[idx].count += weights.map_or(1.0, |w| w[i]);
        }

        Self { bins }
    }

    /// Bin counts in order.
    #[must_use]
    pub fn counts(&self) -> Vec<f64> {
        self.bins.iter().map(|bin| bin.count).collect()
    }

    /// Sum of all bin counts.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Largest bin count, 0 for an empty histogram.
    #[must_use]
    pub fn max_count(&self) -> f64 {
        self.bins.iter().map(|bin| bin.count).fold(0.0, f64::max)
    }

    /// Probability densities of each bin, so that `Σ density·width == 1`.
    ///
    /// All densities are zero when the histogram is empty.
    #[must_use]
    pub fn density(&self) -> Vec<f64> {
        let total = self.total();
        self.bins
            .iter()
            .map(|bin| {
                if total == 0.0 || bin.width() == 0.0 {
                    0.0
                } else {
                    bin.count / (total * bin.width())
                }
            })
            .collect()
    }
}

/// Returns `count + 1` evenly spaced points from `start` to `end`.
///
/// Both end points are exact, so the result can be used directly as bin edges.
/// A `count` of zero yields just `[start, end]`.
///
/// # Examples
///
/// ```
/// # use gwpost_stats::histogram::linear_space;
/// assert_eq!(linear_space(0.0, 1.0, 4), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn linear_space(start: f64, end: f64, count: usize) -> Vec<f64> {
    let count = count.max(1);
    let delta = (end - start) / count as f64;
    let mut points = Vec::with_capacity(count + 1);
    points.push(start);
    points.extend((1..count).map(|i| start + delta * i as f64));
    points.push(end);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_space_endpoints() {
        let points = linear_space(-3.2, 7.9, 20);
        assert_eq!(points.len(), 21);
        assert_eq!(points[0], -3.2);
        assert_eq!(points[20], 7.9);
        assert!(points.is_sorted());
    }

    #[test]
    fn test_linear_space_degenerate() {
        assert_eq!(linear_space(1.0, 1.0, 3), vec![1.0, 1.0, 1.0, 1.0]);
        assert_eq!(linear_space(0.0, 2.0, 0), vec![0.0, 2.0]);
    }

    #[test]
    fn test_counts_preserved() {
        let values = (0..100).map(|i| f64::from(i) / 10.0).collect::<Vec<_>>();
        let histogram = Histogram::uniform(&values, 0.0, 9.9, 7);
        assert_eq!(histogram.bins.len(), 7);
        assert_eq!(histogram.total(), 100.0);
    }

    #[test]
    fn test_last_edge_inclusive_outliers_dropped() {
        let histogram = Histogram::uniform(&[-1.0, 0.0, 1.0, 1.5], 0.0, 1.0, 2);
        assert_eq!(histogram.counts(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_density_integrates_to_one() {
        let values = [0.1, 0.2, 0.2, 0.5, 0.9, 1.3, 2.7];
        let histogram = Histogram::uniform(&values, 0.0, 3.0, 6);
        let area = histogram
            .density()
            .iter()
            .zip(&histogram.bins)
            .map(|(d, bin)| d * bin.width())
            .sum::<f64>();
        assert!((area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_histogram() {
        let histogram = Histogram::uniform(&[], 0.0, 1.0, 5);
        assert_eq!(histogram.total(), 0.0);
        assert_eq!(histogram.max_count(), 0.0);
        assert!(histogram.density().iter().all(|d| *d == 0.0));
    }

    #[test]
    fn test_bin_geometry() {
        let histogram = Histogram::uniform(&[], 2.0, 4.0, 2);
        assert_eq!(histogram.bins[0].width(), 1.0);
        assert_eq!(histogram.bins[1].center(), 3.5);
    }
}
