use std::{path::PathBuf, process::ExitStatus};

use anyhow::Context as _;
use gwpost_idq::{
    config::IdqConfig,
    gdb::{GdbTask, GlitchTablesRequest, GpsArgument, TimeseriesRequest},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GdbTaskArg {
    /// iDQ configuration file
    #[arg(long, value_name = "FILE")]
    config: PathBuf,
    /// Start of the analyzed span
    #[arg(short = 's', long)]
    gps_start: GpsArgument,
    /// End of the analyzed span
    #[arg(short = 'e', long)]
    gps_end: GpsArgument,
    /// GraceDB event id
    #[arg(short = 'g', long)]
    gracedb_id: String,
    #[arg(long)]
    ifo: String,
    #[arg(short = 'c', long)]
    classifier: String,
    /// Directory holding the realtime classifier output
    #[arg(short = 'i', long, value_name = "DIR")]
    input_dir: PathBuf,
    #[arg(short = 't', long, default_value = "")]
    usertag: String,
}

impl GdbTaskArg {
    fn task(&self) -> GdbTask {
        GdbTask {
            gps_start: self.gps_start.clone(),
            gps_end: self.gps_end.clone(),
            gracedb_id: self.gracedb_id.clone(),
            ifo: self.ifo.clone(),
            classifier: self.classifier.clone(),
            input_dir: self.input_dir.clone(),
            usertag: self.usertag.clone(),
        }
    }

    fn load_config(&self) -> anyhow::Result<IdqConfig> {
        IdqConfig::load(&self.config)
            .with_context(|| format!("Failed to load iDQ config: {}", self.config.display()))
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GdbTimeseriesArg {
    #[clap(flatten)]
    task: GdbTaskArg,
    /// Helper executable to run
    #[arg(long, default_value = "idq-gdb-timeseries")]
    executable: PathBuf,
    /// GPS time of the event
    #[arg(long)]
    gps: GpsArgument,
    /// Glitch tables to plot
    #[arg(long, value_name = "FILE")]
    gch_xml: Vec<PathBuf>,
    /// Clean tables to plot
    #[arg(long, value_name = "FILE")]
    cln_xml: Vec<PathBuf>,
    #[arg(long)]
    plotting_gps_start: Option<GpsArgument>,
    #[arg(long)]
    plotting_gps_end: Option<GpsArgument>,
}

impl GdbTimeseriesArg {
    fn request(&self) -> TimeseriesRequest {
        TimeseriesRequest {
            task: self.task.task(),
            gps: self.gps.clone(),
            gch_xml: self.gch_xml.clone(),
            cln_xml: self.cln_xml.clone(),
            plotting_gps_start: self.plotting_gps_start.clone(),
            plotting_gps_end: self.plotting_gps_end.clone(),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GdbGlitchTablesArg {
    #[clap(flatten)]
    task: GdbTaskArg,
    /// Helper executable to run
    #[arg(long, default_value = "idq-gdb-glitch-tables")]
    executable: PathBuf,
}

pub(crate) fn run_timeseries(arg: &GdbTimeseriesArg) -> anyhow::Result<()> {
    let config = arg.task.load_config()?;
    let status = arg
        .request()
        .execute(arg.executable.clone(), &config)
        .context("Failed to run the time-series task")?;
    exit_on_failure(status);
    Ok(())
}

pub(crate) fn run_glitch_tables(arg: &GdbGlitchTablesArg) -> anyhow::Result<()> {
    let config = arg.task.load_config()?;
    let request = GlitchTablesRequest {
        task: arg.task.task(),
    };
    let status = request
        .execute(arg.executable.clone(), &config)
        .context("Failed to run the glitch-tables task")?;
    exit_on_failure(status);
    Ok(())
}

/// Ends the process with the helper's exit code unless it succeeded.
fn exit_on_failure(status: ExitStatus) {
    if status.success() {
        return;
    }
    log::error!("Helper exited with {status}");
    std::process::exit(status.code().unwrap_or(1));
}
