//! Gaussian kernel density estimation.
//!
//! Two estimators are provided:
//!
//! - [`GaussianKde`]: a single bandwidth shared by all observations, either
//!   given explicitly or chosen by Scott's rule
//! - [`point_wise_gaussian_kde`]: every observation gets its own bandwidth
//!   `scale * |x| + s`, so the estimate widens away from zero
//!
//! Both accept optional observation weights, which replaces expanding
//! repeated observations into a flat list.

use std::f64::consts::PI;

/// A Gaussian kernel density estimate with a fixed bandwidth.
///
/// # Examples
///
/// ```
/// use gwpost_stats::kde::GaussianKde;
///
/// let kde = GaussianKde::new(&[0.0], None, Some(1.0)).unwrap();
/// let peak = kde.evaluate_at(0.0);
/// assert!((peak - 1.0 / (2.0 * std::f64::consts::PI).sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct GaussianKde {
    observations: Vec<f64>,
    weights: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Builds an estimator.
    ///
    /// Returns `None` when there are no observations, when the total weight
    /// is not positive, or when Scott's rule yields a zero bandwidth
    /// (all observations identical and no explicit bandwidth).
    ///
    /// # Panics
    ///
    /// Panics if `weights` has a different length than `observations`.
    #[must_use]
    pub fn new(observations: &[f64], weights: Option<&[f64]>, bandwidth: Option<f64>) -> Option<Self> {
        let weights = normalized_weights(observations, weights)?;
        let bandwidth = match bandwidth {
            Some(h) => h,
            None => scott_bandwidth(observations, &weights),
        };
        if bandwidth.is_nan() || bandwidth <= 0.0 {
            return None;
        }
        Some(Self {
            observations: observations.to_vec(),
            weights,
            bandwidth,
        })
    }

    /// The kernel bandwidth in use.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Evaluates the density at a single point.
    #[must_use]
    pub fn evaluate_at(&self, x: f64) -> f64 {
        self.observations
            .iter()
            .zip(&self.weights)
            .map(|(obs, w)| w * gaussian(x, *obs, self.bandwidth))
            .sum()
    }

    /// Evaluates the density at every point of `eval`.
    #[must_use]
    pub fn evaluate(&self, eval: &[f64]) -> Vec<f64> {
        eval.iter().map(|x| self.evaluate_at(*x)).collect()
    }
}

/// Point-wise Gaussian KDE evaluated on `eval`.
///
/// Each observation `x` contributes a normalized Gaussian of width
/// `scale * |x| + s`. When there are no observations (or all weights are zero)
/// the result is a flat array of ones, i.e. an uninformative estimate.
///
/// # Examples
///
/// ```
/// use gwpost_stats::kde::point_wise_gaussian_kde;
///
/// let eval = [0.0, 0.5, 1.0];
/// assert_eq!(point_wise_gaussian_kde(&eval, &[], None, 0.1, 0.1), vec![1.0; 3]);
///
/// let pdf = point_wise_gaussian_kde(&eval, &[0.5], None, 0.1, 0.1);
/// assert!(pdf[1] > pdf[0] && pdf[1] > pdf[2]);
/// ```
///
/// # Panics
///
/// Panics if `weights` has a different length than `observations`.
#[must_use]
pub fn point_wise_gaussian_kde(
    eval: &[f64],
    observations: &[f64],
    weights: Option<&[f64]>,
    scale: f64,
    s: f64,
) -> Vec<f64> {
    let Some(weights) = normalized_weights(observations, weights) else {
        return vec![1.0; eval.len()];
    };
    eval.iter()
        .map(|x| {
            observations
                .iter()
                .zip(&weights)
                .map(|(obs, w)| w * gaussian(*x, *obs, scale * obs.abs() + s))
                .sum()
        })
        .collect()
}

/// Running trapezoid integral of `y` over `x`, starting from zero.
///
/// The output has the same length as the inputs; element `i` is the integral
/// from `x[0]` to `x[i]`.
///
/// # Examples
///
/// ```
/// use gwpost_stats::kde::cumulative_trapezoid;
///
/// let x = [0.0, 1.0, 2.0];
/// let y = [1.0, 1.0, 3.0];
/// assert_eq!(cumulative_trapezoid(&x, &y), vec![0.0, 1.0, 3.0]);
/// ```
///
/// # Panics
///
/// Panics if `x` and `y` differ in length.
#[must_use]
pub fn cumulative_trapezoid(x: &[f64], y: &[f64]) -> Vec<f64> {
    assert_eq!(x.len(), y.len(), "x and y must have the same length");
    let mut total = 0.0;
    let mut out = Vec::with_capacity(x.len());
    for i in 0..x.len() {
        if i > 0 {
            total += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
        }
        out.push(total);
    }
    out
}

fn gaussian(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp() / (sigma * (2.0 * PI).sqrt())
}

fn normalized_weights(observations: &[f64], weights: Option<&[f64]>) -> Option<Vec<f64>> {
    if let Some(weights) = weights {
        assert_eq!(
            weights.len(),
            observations.len(),
            "weights must match observations in length"
        );
    }
    if observations.is_empty() {
        return None;
    }
    let raw = weights.map_or_else(|| vec![1.0; observations.len()], <[f64]>::to_vec);
    let total = raw.iter().sum::<f64>();
    if total.is_nan() || total <= 0.0 {
        return None;
    }
    Some(raw.into_iter().map(|w| w / total).collect())
}

/// Scott's rule with the effective sample size of the weights.
fn scott_bandwidth(observations: &[f64], weights: &[f64]) -> f64 {
    let mean = observations
        .iter()
        .zip(weights)
        .map(|(x, w)| x * w)
        .sum::<f64>();
    let variance = observations
        .iter()
        .zip(weights)
        .map(|(x, w)| w * (x - mean).powi(2))
        .sum::<f64>();
    let n_eff = 1.0 / weights.iter().map(|w| w * w).sum::<f64>();
    variance.sqrt() * n_eff.powf(-0.2)
}
