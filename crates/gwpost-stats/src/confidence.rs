//! Binomial confidence regions.
//!
//! Used to draw uncertainty bands on ROC curves, where both the false alarm
//! probability and the efficiency are fractions of finite counts.

/// Wilson score interval for `successes` out of `total` trials.
///
/// `confidence` is the two-sided coverage, e.g. `0.68` for a one-sigma band.
/// With no trials the interval is the whole `[0, 1]` range.
///
/// # Examples
///
/// ```
/// use gwpost_stats::confidence::binomial_interval;
///
/// let (lo, hi) = binomial_interval(80, 100, 0.95);
/// assert!(lo < 0.8 && 0.8 < hi);
/// assert!((lo - 0.711).abs() < 1e-3);
/// assert!((hi - 0.867).abs() < 1e-3);
///
/// assert_eq!(binomial_interval(0, 0, 0.68), (0.0, 1.0));
/// ```
///
/// # Panics
///
/// Panics if `confidence` is not strictly between 0 and 1.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn binomial_interval(successes: u64, total: u64, confidence: f64) -> (f64, f64) {
    assert!(
        confidence > 0.0 && confidence < 1.0,
        "confidence must be in (0, 1)"
    );
    if total == 0 {
        return (0.0, 1.0);
    }
    let n = total as f64;
    let p = successes as f64 / n;
    let z = two_sided_z(confidence);
    let z2 = z * z;

    let denominator = 1.0 + z2 / n;
    let center = p + z2 / (2.0 * n);
    let margin = z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt();

    let lower = ((center - margin) / denominator).max(0.0);
    let upper = ((center + margin) / denominator).min(1.0);
    (lower, upper)
}

/// Standard normal quantile `z` such that `P(|Z| < z) = confidence`.
///
/// ```
/// use gwpost_stats::confidence::two_sided_z;
///
/// assert!((two_sided_z(0.95) - 1.959964).abs() < 1e-4);
/// assert!((two_sided_z(0.6827) - 1.0).abs() < 1e-3);
/// ```
#[must_use]
pub fn two_sided_z(confidence: f64) -> f64 {
    let target = 0.5 + 0.5 * confidence;
    // normal_cdf is monotone, so bisection converges on any bracket
    let (mut lo, mut hi) = (0.0_f64, 10.0_f64);
    for _ in 0..100 {
        let mid = 0.5 * (lo + hi);
        if normal_cdf(mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Standard normal CDF.
#[must_use]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Error function (Abramowitz and Stegun 7.1.26, |error| < 1.5e-7).
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = x.signum();
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_cdf_symmetry() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
        for x in [0.3, 1.0, 2.5] {
            assert!((normal_cdf(x) + normal_cdf(-x) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_interval_contains_estimate() {
        for (k, n) in [(0, 10), (3, 10), (10, 10), (1, 1000)] {
            let (lo, hi) = binomial_interval(k, n, 0.68);
            #[expect(clippy::cast_precision_loss)]
            let p = k as f64 / n as f64;
            assert!(lo <= p && p <= hi, "{k}/{n}: [{lo}, {hi}]");
            assert!((0.0..=1.0).contains(&lo));
            assert!((0.0..=1.0).contains(&hi));
        }
    }

    #[test]
    fn test_interval_shrinks_with_trials() {
        let (lo_small, hi_small) = binomial_interval(5, 10, 0.68);
        let (lo_large, hi_large) = binomial_interval(500, 1000, 0.68);
        assert!(hi_large - lo_large < hi_small - lo_small);
    }

    #[test]
    fn test_wider_for_higher_confidence() {
        let (lo68, hi68) = binomial_interval(20, 50, 0.68);
        let (lo95, hi95) = binomial_interval(20, 50, 0.95);
        assert!(lo95 < lo68 && hi68 < hi95);
    }
}
