use std::path::PathBuf;

use anyhow::Context as _;
use gwpost_compare::runs::{CompareRunsOptions, compare_runs};

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CompareRunsArg {
    /// Directory to write summaries, plots and pages into
    #[arg(short, long, value_name = "DIR")]
    outpath: PathBuf,
    /// Posterior directory of each run, the control run first
    #[arg(short, long, value_name = "DIR", num_args = 1.., required = true)]
    data: Vec<PathBuf>,
    /// SNR directory of each run, in the same order as --data
    #[arg(short, long, value_name = "DIR", num_args = 1.., required = true)]
    snr: Vec<PathBuf>,
    /// Result pages of each run, in the same order as --data
    #[arg(short = 'r', long, value_name = "DIR", num_args = 1..)]
    result_pages_path: Vec<PathBuf>,
    /// Injection table
    #[arg(short, long, value_name = "FILE")]
    inj: PathBuf,
    /// Calibration-error directory of each non-control run
    #[arg(short = 'e', long, value_name = "DIR", num_args = 1..)]
    calerr: Vec<PathBuf>,
    /// Injections to compare, e.g. `[0:10,15]` or `all`
    #[arg(short = 'E', long, value_name = "SPEC")]
    events: String,
    /// Detectors of the network
    #[arg(short = 'I', long, value_name = "IFO", num_args = 1.., required = true)]
    ifos: Vec<String>,
    /// What the non-control runs change
    #[arg(short, long, default_value = "calibration")]
    keyword: String,
    /// Also write the comparison report as JSON to FILE (`-` for stdout)
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

impl CompareRunsArg {
    fn options(&self) -> CompareRunsOptions {
        CompareRunsOptions {
            outpath: self.outpath.clone(),
            data: self.data.clone(),
            snr: self.snr.clone(),
            result_pages: self.result_pages_path.clone(),
            injections: self.inj.clone(),
            calerr: self.calerr.clone(),
            events: self.events.clone(),
            ifos: self.ifos.clone(),
            keyword: self.keyword.clone(),
        }
    }
}

pub(crate) fn run(arg: &CompareRunsArg) -> anyhow::Result<()> {
    let report = compare_runs(&arg.options())
        .with_context(|| format!("Failed to compare runs into {}", arg.outpath.display()))?;
    for run in &report.runs {
        log::info!(
            "Run {} ({}): {} events above threshold, {} sky maps",
            run.run,
            run.keyword,
            run.selected_events,
            run.sky_maps
        );
    }
    if let Some(path) = &arg.report {
        Output::create(path)?.write_json(&report)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use crate::command::CommandArgs;

    use super::*;

    fn parse(args: &[&str]) -> CompareRunsArg {
        let args = ["gwpost", "compare-runs"]
            .into_iter()
            .chain(args.iter().copied());
        let args = CommandArgs::try_parse_from(args).unwrap();
        match args.mode {
            crate::command::Mode::CompareRuns(arg) => arg,
            mode => panic!("unexpected mode {mode:?}"),
        }
    }

    #[test]
    fn test_short_options() {
        let arg = parse(&[
            "-o", "out", "-d", "ctrl", "cal", "-s", "snr0", "snr1", "-i", "inj.dat", "-E",
            "[0:3]", "-I", "H1", "L1", "-e", "calerr1",
        ]);
        let options = arg.options();
        assert_eq!(options.outpath, PathBuf::from("out"));
        assert_eq!(options.data, [PathBuf::from("ctrl"), PathBuf::from("cal")]);
        assert_eq!(options.snr.len(), 2);
        assert!(options.result_pages.is_empty());
        assert_eq!(options.calerr, [PathBuf::from("calerr1")]);
        assert_eq!(options.events, "[0:3]");
        assert_eq!(options.ifos, ["H1", "L1"]);
        assert_eq!(options.keyword, "calibration");
        assert_eq!(arg.report, None);
    }

    #[test]
    fn test_long_options() {
        let arg = parse(&[
            "--outpath",
            "out",
            "--data",
            "a",
            "b",
            "--snr",
            "a",
            "b",
            "--result-pages-path",
            "pa",
            "pb",
            "--inj",
            "inj.dat",
            "--events",
            "all",
            "--ifos",
            "V1",
            "--keyword",
            "waveform",
            "--report",
            "-",
        ]);
        assert_eq!(arg.result_pages_path.len(), 2);
        assert_eq!(arg.keyword, "waveform");
        assert_eq!(arg.report, Some(PathBuf::from("-")));
    }

    #[test]
    fn test_missing_required() {
        let result = CommandArgs::try_parse_from(["gwpost", "compare-runs", "-o", "out"]);
        assert!(result.is_err());
    }
}
