//! Figures comparing one perturbed run against the control run.
//!
//! Figures go under `{outdir}/{run}/` in one directory per kind:
//! `ParametersPlots`, `SNRPlots`, `BSNPlots` and `ErrorPlots`.

use std::path::{Path, PathBuf};

use gwpost_plot::{
    BLACK, BLUE, CYAN, PlotError, RED, RGBColor, YELLOW, series_color,
    xy::{HistogramFigure, PanelFigure, XyFigure},
};
use gwpost_stats::{
    comparison::{EffectSummary, deltas, effect_sizes},
    histogram::linear_space,
};
use serde::Serialize;

use crate::{
    CompareError,
    calibration::{CalibrationCurve, calibration_file},
    gps::GpsTime,
    summary::RunSummary,
    util::ensure_dir,
};

/// Events whose network SNR in the perturbed run is at or below this value
/// are left out of the parameter and SNR plots.
pub const SNR_THRESHOLD: f64 = 8.0;
/// Effect sizes above this value are reported as outliers.
pub const OUTLIER_EFFECT: f64 = 3.0;
pub const HISTOGRAM_BINS: usize = 20;

const DETECTOR_COLORS: [RGBColor; 3] = [RED, BLUE, BLACK];

pub const PARAMETERS_PLOTS: &str = "ParametersPlots";
pub const SNR_PLOTS: &str = "SNRPlots";
pub const BSN_PLOTS: &str = "BSNPlots";
pub const ERROR_PLOTS: &str = "ErrorPlots";
pub const SKY_PLOTS: &str = "SkyPlots";

/// An event whose parameter moved by more than [`OUTLIER_EFFECT`] control
/// standard deviations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlier {
    pub time: GpsTime,
    pub perturbed_mean: f64,
    pub control_mean: f64,
    pub control_stdev: f64,
    pub effect: f64,
}

/// Distribution of the shift of one parameter over the selected events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterEffect {
    pub delta: Option<EffectSummary>,
    pub effect: Option<EffectSummary>,
    pub outliers: Vec<Outlier>,
}

/// A perturbed run paired event by event with the control run.
#[derive(Debug, Clone, Copy)]
pub struct RunComparison<'a> {
    control: &'a RunSummary,
    perturbed: &'a RunSummary,
}

impl<'a> RunComparison<'a> {
    /// Pairs two summaries built from the same event list.
    pub fn new(control: &'a RunSummary, perturbed: &'a RunSummary) -> Result<Self, CompareError> {
        if control.times() != perturbed.times() {
            return Err(CompareError::InvalidRuns {
                reason: format!(
                    "run {} and the control run cover different events",
                    perturbed.run()
                ),
            });
        }
        Ok(Self { control, perturbed })
    }

    #[must_use]
    pub fn control(&self) -> &'a RunSummary {
        self.control
    }

    #[must_use]
    pub fn perturbed(&self) -> &'a RunSummary {
        self.perturbed
    }

    /// Row indices of events loud enough in the perturbed run.
    #[must_use]
    pub fn selected(&self) -> Vec<usize> {
        self.perturbed
            .network_snr()
            .iter()
            .enumerate()
            .filter(|(_, snr)| **snr > SNR_THRESHOLD)
            .map(|(i, _)| i)
            .collect()
    }

    fn select(&self, values: &[f64]) -> Vec<f64> {
        self.selected().into_iter().map(|i| values[i]).collect()
    }

    /// Mean shifts of `parameter` over the selected events.
    #[must_use]
    pub fn deltas(&self, parameter: &str) -> Vec<f64> {
        deltas(
            &self.select(&self.perturbed.means(parameter)),
            &self.select(&self.control.means(parameter)),
        )
    }

    /// Mean shifts in units of the control standard deviation.
    #[must_use]
    pub fn effect_sizes(&self, parameter: &str) -> Vec<f64> {
        effect_sizes(
            &self.select(&self.perturbed.means(parameter)),
            &self.select(&self.control.means(parameter)),
            &self.select(&self.control.stdevs(parameter)),
        )
    }

    /// Control standard deviations over the selected events.
    #[must_use]
    pub fn control_stdevs(&self, parameter: &str) -> Vec<f64> {
        self.select(&self.control.stdevs(parameter))
    }

    /// Every event, selected or not, whose effect size exceeds
    /// [`OUTLIER_EFFECT`].
    #[must_use]
    pub fn outliers(&self, parameter: &str) -> Vec<Outlier> {
        let perturbed = self.perturbed.means(parameter);
        let control = self.control.means(parameter);
        let sigma = self.control.stdevs(parameter);
        let effects = effect_sizes(&perturbed, &control, &sigma);
        self.control
            .times()
            .into_iter()
            .enumerate()
            .filter(|(i, _)| effects[*i] > OUTLIER_EFFECT)
            .map(|(i, time)| Outlier {
                time,
                perturbed_mean: perturbed[i],
                control_mean: control[i],
                control_stdev: sigma[i],
                effect: effects[i],
            })
            .collect()
    }

    /// Directory for figures of `kind` belonging to the perturbed run.
    #[must_use]
    pub fn plot_dir(&self, outdir: &Path, kind: &str) -> PathBuf {
        outdir.join(self.perturbed.run().to_string()).join(kind)
    }
}

fn abs_guide(xs: &[f64], factor: f64) -> Vec<(f64, f64)> {
    xs.iter().map(|x| (*x, x.abs() * factor)).collect()
}

/// Saves `figure` to `path`, or skips it with a warning when it has no
/// finite value to bin.
fn save_histogram<F>(
    path: &Path,
    figure: Result<HistogramFigure, PlotError>,
    decorate: F,
) -> Result<(), CompareError>
where
    F: FnOnce(&mut HistogramFigure) -> &mut HistogramFigure,
{
    match figure {
        Ok(mut hist) => {
            decorate(&mut hist);
            hist.save(path)?;
        }
        Err(PlotError::Empty { .. }) => {
            log::warn!("No finite value to plot; skipping {}", path.display());
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Draws `delta_{p}`, `effect_{p}` and `delta_sigma_{p}` and summarizes the
/// shift of `parameter`.
pub fn parameter_plots(
    outdir: &Path,
    comparison: &RunComparison<'_>,
    parameter: &str,
) -> Result<ParameterEffect, CompareError> {
    let run = comparison.perturbed().run();
    let deltas = comparison.deltas(parameter);
    let effects = comparison.effect_sizes(parameter);
    let outliers = comparison.outliers(parameter);
    for outlier in &outliers {
        log::warn!(
            "Outlier in {parameter} (run {run}) at {}: {} vs {} ± {}, effect {:.3}",
            outlier.time,
            outlier.perturbed_mean,
            outlier.control_mean,
            outlier.control_stdev,
            outlier.effect,
        );
    }
    let summary = ParameterEffect {
        delta: EffectSummary::new(&deltas),
        effect: EffectSummary::new(&effects),
        outliers,
    };
    if comparison.selected().is_empty() {
        log::warn!("No event above SNR {SNR_THRESHOLD} in run {run}; skipping {parameter} plots");
        return Ok(summary);
    }
    match &summary.effect {
        Some(effect) => {
            log::info!(
                "Effect size of {parameter} in run {run}: mean {:e}, std dev {:e}, median {:e}, \
                 5% {:e}, 50% {:e}, 95% {:e}, skewness {:e}, kurtosis {:e}",
                effect.mean,
                effect.std_dev,
                effect.median,
                effect.p5,
                effect.p50,
                effect.p95,
                effect.skewness,
                effect.kurtosis,
            );
            if effect.dropped > 0 {
                log::warn!(
                    "{} effect sizes of {parameter} in run {run} are not finite; \
                     the control posterior has zero spread",
                    effect.dropped,
                );
            }
        }
        None => log::warn!(
            "No finite effect size of {parameter} in run {run}; \
             the control posteriors have zero spread"
        ),
    }

    let dir = ensure_dir(&comparison.plot_dir(outdir, PARAMETERS_PLOTS))?;
    let sigmas = comparison.control_stdevs(parameter);
    let finite_deltas = deltas.iter().copied().filter(|d| d.is_finite());
    let lo = finite_deltas.clone().fold(f64::INFINITY, f64::min);
    let hi = finite_deltas.fold(f64::NEG_INFINITY, f64::max);
    let mut scatter = XyFigure::new(&format!("delta_{parameter}"), &format!("sigma_{parameter}"));
    scatter
        .markers(
            deltas.iter().copied().zip(sigmas).collect(),
            RED,
            Some("stdev"),
        )
        .vline(0.0, BLUE);
    if lo <= hi {
        let guide_xs = linear_space(lo, hi, deltas.len());
        scatter
            .line(abs_guide(&guide_xs, 2.0), BLACK, Some("0.5 σ"))
            .line(abs_guide(&guide_xs, 1.0), YELLOW, Some("σ"))
            .line(abs_guide(&guide_xs, 0.5), CYAN, Some("2 σ"));
    }
    scatter.save(dir.join(format!("delta_sigma_{parameter}.svg")))?;

    save_histogram(
        &dir.join(format!("delta_{parameter}.svg")),
        HistogramFigure::new(&deltas, HISTOGRAM_BINS, &format!("Δ{parameter}")),
        |hist| hist.vline(0.0, RED),
    )?;
    save_histogram(
        &dir.join(format!("effect_{parameter}.svg")),
        HistogramFigure::new(&effects, HISTOGRAM_BINS, &format!("effect_{parameter}"))
            .map(|hist| hist.with_color(RED)),
        |hist| hist.vline(0.0, BLUE),
    )?;

    Ok(summary)
}

/// Draws `SNR_vs_{p}`: the effect size against network SNR and against BSN.
pub fn snr_plots(
    outdir: &Path,
    comparison: &RunComparison<'_>,
    parameter: &str,
    keyword: &str,
) -> Result<(), CompareError> {
    let selected = comparison.selected();
    if selected.is_empty() {
        return Ok(());
    }
    let effects = comparison.effect_sizes(parameter);
    let snr = comparison.perturbed().network_snr();
    let bsn = comparison.perturbed().bsn();
    let y_label = format!("effect_{parameter}");

    let mut vs_snr = XyFigure::new(&format!("Network SNR {keyword}"), &y_label);
    vs_snr.markers(
        selected.iter().map(|i| snr[*i]).zip(effects.iter().copied()).collect(),
        BLUE,
        Some("EffectVsSNR"),
    );
    let mut vs_bsn = XyFigure::new(&format!("BSN {keyword}"), &y_label);
    vs_bsn.markers(
        selected.iter().map(|i| bsn[*i]).zip(effects.iter().copied()).collect(),
        RED,
        Some("EffectVsBSN"),
    );

    let dir = ensure_dir(&comparison.plot_dir(outdir, SNR_PLOTS))?;
    let mut figure = PanelFigure::new();
    figure.push(vs_snr).push(vs_bsn);
    figure.save(dir.join(format!("SNR_vs_{parameter}.svg")))?;
    Ok(())
}

/// Draws `BSN_vs_SNR` for the perturbed and the control run.
pub fn bsn_plot(
    outdir: &Path,
    comparison: &RunComparison<'_>,
    keyword: &str,
) -> Result<(), CompareError> {
    let points = |summary: &RunSummary| {
        summary
            .network_snr()
            .into_iter()
            .zip(summary.bsn())
            .collect::<Vec<_>>()
    };
    let dir = ensure_dir(&comparison.plot_dir(outdir, BSN_PLOTS))?;
    let mut figure = XyFigure::new(&format!("Network SNR {keyword}"), "log B");
    figure
        .markers(
            points(comparison.perturbed()),
            RED,
            Some(format!("BSN_{keyword}").as_str()),
        )
        .markers(points(comparison.control()), BLUE, Some("BSN_ctrl"));
    figure.save(dir.join("BSN_vs_SNR.svg"))?;
    Ok(())
}

/// Draws `amp_{time}` and `pha_{time}` from the calibration errors of the
/// event at `time`, restricted to the plotted frequency band.
pub fn error_plots(
    outdir: &Path,
    comparison: &RunComparison<'_>,
    calerr_dir: &Path,
    ifos: &[String],
    time: GpsTime,
    keyword: &str,
) -> Result<(), CompareError> {
    let mut amplitude = XyFigure::new("f [Hz]", &format!("Amp_{keyword}/Amp_ctrl"));
    let mut phase = XyFigure::new("f [Hz]", &format!("Pha_{keyword} - Pha_ctrl [rad]"));
    for (i, ifo) in ifos.iter().enumerate() {
        let curve = CalibrationCurve::read(calerr_dir, ifo, time)?;
        let path = calibration_file(calerr_dir, ifo, time);
        let band = curve.in_band(&path)?;
        let color = DETECTOR_COLORS.get(i).copied().unwrap_or_else(|| series_color(i));
        amplitude.line(band.amplitude_points(), color, Some(ifo.as_str()));
        phase.line(band.phase_points(), color, Some(ifo.as_str()));
    }
    let dir = ensure_dir(&comparison.plot_dir(outdir, ERROR_PLOTS))?;
    amplitude.save(dir.join(format!("amp_{time}.svg")))?;
    phase.save(dir.join(format!("pha_{time}.svg")))?;
    Ok(())
}
