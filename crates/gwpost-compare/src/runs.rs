//! End-to-end comparison of parameter-estimation runs.
//!
//! Run 0 is the control run; every other run is compared against it.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    CompareError,
    bsn::{bayes_factor_file, read_bsn},
    events::parse_events,
    gps::GpsTime,
    injection::InjectionTable,
    pages::{SummaryPage, write_pages},
    plots::{
        ParameterEffect, RunComparison, SKY_PLOTS, bsn_plot, error_plots, parameter_plots,
        snr_plots,
    },
    posterior::{PosteriorSummary, posterior_file},
    skymap::{sky_events, write_sky_maps},
    snr::read_snr,
    summary::{RunSummary, SummaryRow},
    util::{ensure_dir, save_json},
};

pub const EFFECT_SUMMARY_FILE: &str = "effect_summary.json";

/// Inputs of a comparison. The `i`-th entry of `data`, `snr` and
/// `result_pages` belongs to run `i`; `calerr[i - 1]` to perturbed run `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareRunsOptions {
    pub outpath: PathBuf,
    /// Directories holding posterior samples and Bayes factors.
    pub data: Vec<PathBuf>,
    pub snr: Vec<PathBuf>,
    pub result_pages: Vec<PathBuf>,
    pub injections: PathBuf,
    pub calerr: Vec<PathBuf>,
    pub events: String,
    pub ifos: Vec<String>,
    pub keyword: String,
}

impl CompareRunsOptions {
    fn validate(&self) -> Result<(), CompareError> {
        let invalid = |reason: String| Err(CompareError::InvalidRuns { reason });
        let runs = self.data.len();
        if runs < 2 {
            return invalid(format!("need a control run and at least one other, got {runs}"));
        }
        if self.snr.len() != runs {
            return invalid(format!("{} SNR directories for {runs} runs", self.snr.len()));
        }
        if !self.result_pages.is_empty() && self.result_pages.len() != runs {
            return invalid(format!(
                "{} result-page directories for {runs} runs",
                self.result_pages.len()
            ));
        }
        if !self.calerr.is_empty() && self.calerr.len() < runs - 1 {
            return invalid(format!(
                "{} calibration-error directories for {} perturbed runs",
                self.calerr.len(),
                runs - 1
            ));
        }
        if self.ifos.is_empty() {
            return invalid("no detectors given".to_owned());
        }
        Ok(())
    }
}

/// What was produced for one perturbed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run: usize,
    pub keyword: String,
    /// Events above the SNR threshold.
    pub selected_events: usize,
    pub sky_maps: usize,
    pub parameters: BTreeMap<String, ParameterEffect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareReport {
    pub times: Vec<GpsTime>,
    pub runs: Vec<RunReport>,
}

/// Injection times of the requested events whose posteriors exist in every
/// run, paired with their injection-table rows.
fn available_events(
    options: &CompareRunsOptions,
    injections: &InjectionTable,
) -> Result<Vec<(usize, GpsTime)>, CompareError> {
    let mut available = Vec::new();
    for event in parse_events(&options.events, injections.len())? {
        let Some(time) = injections.end_time(event) else {
            continue;
        };
        let missing = options
            .data
            .iter()
            .map(|dir| posterior_file(dir, time))
            .find(|path| !path.is_file());
        match missing {
            Some(path) => log::warn!("Skipping event {event}: {} not found", path.display()),
            None => available.push((event, time)),
        }
    }
    if available.is_empty() {
        return Err(CompareError::NoPosteriors);
    }
    Ok(available)
}

fn summarize_run(
    options: &CompareRunsOptions,
    run: usize,
    injections: &InjectionTable,
    events: &[(usize, GpsTime)],
) -> Result<RunSummary, CompareError> {
    let data_dir = &options.data[run];
    let mut rows: Vec<SummaryRow> = Vec::with_capacity(events.len());
    for &(event, time) in events {
        let path = posterior_file(data_dir, time);
        let posterior =
            PosteriorSummary::read(&path, |name| injections.injected_value(event, name))?;
        let consistent = rows
            .first()
            .is_none_or(|first| first.posterior.names().eq(posterior.names()));
        if !consistent {
            return Err(CompareError::ParameterMismatch { path });
        }
        rows.push(SummaryRow {
            time,
            event,
            posterior,
            bsn: read_bsn(bayes_factor_file(data_dir, time))?,
            snr: read_snr(&options.snr[run], time, &options.ifos)?,
        });
    }
    Ok(RunSummary::new(run, rows))
}

/// Fails unless `perturbed` estimates the same parameters as `control`.
fn check_parameters(
    options: &CompareRunsOptions,
    control: &RunSummary,
    perturbed: &RunSummary,
) -> Result<(), CompareError> {
    let (Some(expected), Some(found)) = (control.rows().first(), perturbed.rows().first()) else {
        return Ok(());
    };
    if expected.posterior.names().eq(found.posterior.names()) {
        return Ok(());
    }
    Err(CompareError::ParameterMismatch {
        path: posterior_file(&options.data[perturbed.run()], found.time),
    })
}

fn absolute(path: &Path) -> Result<PathBuf, CompareError> {
    std::path::absolute(path).map_err(CompareError::io(path))
}

fn report_run(
    options: &CompareRunsOptions,
    control: &RunSummary,
    perturbed: &RunSummary,
) -> Result<RunReport, CompareError> {
    let outdir = &options.outpath;
    let run = perturbed.run();
    let keyword = options.keyword.as_str();
    log::info!("Comparing run {run} ({keyword}) with the control run");
    let comparison = RunComparison::new(control, perturbed)?;
    let run_dir = ensure_dir(&outdir.join(run.to_string()))?;

    let parameter_names = control.parameters();
    let mut parameters = BTreeMap::new();
    for parameter in &parameter_names {
        let effect = parameter_plots(outdir, &comparison, parameter)?;
        snr_plots(outdir, &comparison, parameter, keyword)?;
        parameters.insert(parameter.clone(), effect);
    }
    bsn_plot(outdir, &comparison, keyword)?;
    if let (Some(calerr), Some(first)) = (options.calerr.get(run - 1), control.rows().first()) {
        error_plots(outdir, &comparison, calerr, &options.ifos, first.time, keyword)?;
    }
    let sky_maps = write_sky_maps(&run_dir.join(SKY_PLOTS), &sky_events(&comparison))?;

    let absolute_run_dir = absolute(&run_dir)?;
    let result_pages = match options.result_pages.as_slice() {
        [] => None,
        pages => Some((absolute(&pages[0])?, absolute(&pages[run])?)),
    };
    let summary_page = SummaryPage {
        control,
        perturbed,
        ifos: &options.ifos,
        keyword,
        sky_maps,
        result_pages: result_pages
            .as_ref()
            .map(|(control, perturbed)| (control.as_path(), perturbed.as_path())),
    };
    write_pages(&absolute_run_dir, &parameter_names, &summary_page)?;

    let report = RunReport {
        run,
        keyword: keyword.to_owned(),
        selected_events: comparison.selected().len(),
        sky_maps,
        parameters,
    };
    save_json(&report, &run_dir.join(EFFECT_SUMMARY_FILE))?;
    Ok(report)
}

/// Builds the whole report under `options.outpath`.
pub fn compare_runs(options: &CompareRunsOptions) -> Result<CompareReport, CompareError> {
    options.validate()?;
    ensure_dir(&options.outpath)?;

    let injections = InjectionTable::read(&options.injections)?;
    log::info!(
        "Read {} injections from {}",
        injections.len(),
        options.injections.display()
    );
    let events = available_events(options, &injections)?;
    log::info!("Comparing {} events across {} runs", events.len(), options.data.len());

    let summaries = (0..options.data.len())
        .map(|run| summarize_run(options, run, &injections, &events))
        .collect::<Result<Vec<_>, _>>()?;
    let (control, perturbed) = summaries
        .split_first()
        .ok_or(CompareError::NoPosteriors)?;
    for summary in perturbed {
        check_parameters(options, control, summary)?;
    }
    for summary in &summaries {
        summary.write(&options.outpath)?;
    }

    let runs = perturbed
        .iter()
        .map(|summary| report_run(options, control, summary))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompareReport {
        times: events.into_iter().map(|(_, time)| time).collect(),
        runs,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::snr::snr_file;

    const IFOS: [&str; 2] = ["H1", "L1"];

    fn write_run(data: &Path, snr: &Path, times: &[i64], shift: f64) {
        fs::create_dir_all(data).unwrap();
        fs::create_dir_all(snr).unwrap();
        for (i, time) in times.iter().enumerate() {
            #[expect(clippy::cast_precision_loss)]
            let mc = 1.0 + i as f64 * 0.1 + shift;
            fs::write(
                data.join(format!("posterior_samples_{time}.000")),
                format!(
                    "logl mc ra dec\n-1 {} 1.0 0.1\n-2 {} 1.2 0.3\n",
                    mc - 0.05,
                    mc + 0.05
                ),
            )
            .unwrap();
            fs::write(data.join(format!("bayesfactor_{time}.000.txt")), "12.5\n").unwrap();
            for (ifo, value) in IFOS.iter().zip([6.0, 8.0]) {
                fs::write(
                    snr_file(snr, ifo, GpsTime::new(*time, 0)),
                    format!("{ifo}: {value}\n"),
                )
                .unwrap();
            }
        }
    }

    fn options(root: &Path) -> CompareRunsOptions {
        let injections = root.join("injections.txt");
        fs::write(
            &injections,
            "geocent_end_time geocent_end_time_ns longitude latitude\n\
             1000 0 1.1 0.2\n1010 0 2.0 -0.5\n1020 0 3.0 0.7\n",
        )
        .unwrap();
        CompareRunsOptions {
            outpath: root.join("out"),
            data: vec![root.join("ctrl"), root.join("cal")],
            snr: vec![root.join("ctrl_snr"), root.join("cal_snr")],
            result_pages: vec![root.join("pages/ctrl"), root.join("pages/cal")],
            injections,
            calerr: vec![],
            events: "[0:2]".to_owned(),
            ifos: IFOS.map(str::to_owned).to_vec(),
            keyword: "calibration".to_owned(),
        }
    }

    #[test]
    fn test_compare_runs_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let options = options(root);
        // the last event has no posterior in the perturbed run
        write_run(&root.join("ctrl"), &root.join("ctrl_snr"), &[1000, 1010, 1020], 0.0);
        write_run(&root.join("cal"), &root.join("cal_snr"), &[1000, 1010], 0.02);

        let report = compare_runs(&options).unwrap();
        assert_eq!(report.times, vec![GpsTime::new(1000, 0), GpsTime::new(1010, 0)]);
        assert_eq!(report.runs.len(), 1);
        let run = &report.runs[0];
        assert_eq!(run.selected_events, 2);
        assert_eq!(run.sky_maps, 1);
        assert_eq!(
            run.parameters.keys().collect::<Vec<_>>(),
            ["dec", "mc", "ra"]
        );

        let out = root.join("out");
        for file in [
            "summary_ctrl.dat",
            "summary_1.dat",
            "headers_0.dat",
            "headers_1.dat",
            "1/posposplots.html",
            "1/summary.html",
            "1/effect_summary.json",
            "1/SkyPlots/injected_skymap_0.svg",
            "1/ParametersPlots/effect_mc.svg",
            "1/BSNPlots/BSN_vs_SNR.svg",
        ] {
            assert!(out.join(file).is_file(), "{file} missing");
        }
        let headers = fs::read_to_string(out.join("headers_1.dat")).unwrap();
        assert!(headers.starts_with("injTime\tmean_mc\tstdev_mc\tmean_ra"));
        let summary = fs::read_to_string(out.join("1/summary.html")).unwrap();
        assert!(summary.contains("../../pages/cal/1010/posplots.html"));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("1/effect_summary.json")).unwrap())
                .unwrap();
        assert_eq!(json["parameters"]["mc"]["effect"]["count"], 2);
    }

    #[test]
    fn test_no_posteriors() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path());
        assert!(matches!(
            compare_runs(&options),
            Err(CompareError::NoPosteriors)
        ));
        assert!(dir.path().join("out").is_dir());
    }

    #[test]
    fn test_run_layout_is_checked() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options(dir.path());
        options.snr.pop();
        assert!(matches!(
            compare_runs(&options),
            Err(CompareError::InvalidRuns { .. })
        ));
        let mut options = self::options(dir.path());
        options.data.truncate(1);
        assert!(matches!(
            compare_runs(&options),
            Err(CompareError::InvalidRuns { .. })
        ));
    }

    #[test]
    fn test_parameter_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let options = options(root);
        write_run(&root.join("ctrl"), &root.join("ctrl_snr"), &[1000, 1010], 0.0);
        write_run(&root.join("cal"), &root.join("cal_snr"), &[1000, 1010], 0.0);
        fs::write(
            root.join("cal/posterior_samples_1010.000"),
            "logl mc\n-1 1.0\n",
        )
        .unwrap();
        assert!(matches!(
            compare_runs(&options),
            Err(CompareError::ParameterMismatch { .. })
        ));
    }

    #[test]
    fn test_runs_estimate_different_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let options = options(root);
        write_run(&root.join("ctrl"), &root.join("ctrl_snr"), &[1000, 1010], 0.0);
        write_run(&root.join("cal"), &root.join("cal_snr"), &[1000, 1010], 0.0);
        for time in [1000, 1010] {
            fs::write(
                root.join(format!("cal/posterior_samples_{time}.000")),
                "logl mchirp ra dec
-1 0.95 1.0 0.1
-2 1.05 1.2 0.3
",
            )
            .unwrap();
        }
        let Err(CompareError::ParameterMismatch { path }) = compare_runs(&options) else {
            panic!("expected a parameter mismatch");
        };
        assert_eq!(path, root.join("cal/posterior_samples_1000.000"));
        assert!(!root.join("out/summary_ctrl.dat").exists());
    }

    #[test]
    fn test_fixed_parameter_in_both_runs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let options = options(root);
        for (run, shift) in [("ctrl", 0.0), ("cal", 0.02)] {
            write_run(&root.join(run), &root.join(format!("{run}_snr")), &[1000, 1010], shift);
            for time in [1000, 1010] {
                let path = root.join(format!("{run}/posterior_samples_{time}.000"));
                let text = fs::read_to_string(&path).unwrap();
                fs::write(&path, text.replace(" 0.1\n", " 0.5\n").replace(" 0.3\n", " 0.5\n"))
                    .unwrap();
            }
        }

        let report = compare_runs(&options).unwrap();
        let dec = &report.runs[0].parameters["dec"];
        assert!(dec.effect.is_none());
        assert_eq!(dec.delta.as_ref().map(|d| d.mean), Some(0.0));
        assert_eq!(report.runs[0].parameters["mc"].effect.as_ref().map(|e| e.count), Some(2));

        let plots = root.join("out/1/ParametersPlots");
        assert!(plots.join("delta_dec.svg").is_file());
        assert!(!plots.join("effect_dec.svg").exists());
        assert!(plots.join("effect_mc.svg").is_file());
    }
}
