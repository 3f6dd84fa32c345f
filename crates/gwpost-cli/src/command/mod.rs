use clap::{Parser, Subcommand};

use self::{
    compare_runs::CompareRunsArg,
    gdb::{GdbGlitchTablesArg, GdbTimeseriesArg},
    idq_summary::IdqSummaryArg,
};

mod compare_runs;
mod gdb;
mod idq_summary;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What task to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compare parameter-estimation runs against a control run
    CompareRuns(#[clap(flatten)] CompareRunsArg),
    /// Run idq-gdb-timeseries for a GraceDB event
    GdbTimeseries(#[clap(flatten)] GdbTimeseriesArg),
    /// Run idq-gdb-glitch-tables for a GraceDB event
    GdbGlitchTables(#[clap(flatten)] GdbGlitchTablesArg),
    /// Plot summary figures of iDQ classifier outputs
    IdqSummary(#[clap(flatten)] IdqSummaryArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::CompareRuns(arg) => compare_runs::run(&arg)?,
        Mode::GdbTimeseries(arg) => gdb::run_timeseries(&arg)?,
        Mode::GdbGlitchTables(arg) => gdb::run_glitch_tables(&arg)?,
        Mode::IdqSummary(arg) => idq_summary::run(&arg)?,
    }
    Ok(())
}
