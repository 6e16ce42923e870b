mod cell_detection;
mod chart;
mod error;
mod loader;
mod parameters;
mod processing;
mod timer;
mod writer;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use parameters::{Calibration, Mode, PipelineSettings, RunInfo};
use spcell_common::{init_tracer, tracer::TracerOptions};
use std::path::PathBuf;
use timer::TimerSuite;
use tracing::{error, info};
use writer::{OutputDirectory, RunParameters};

// cargo run --bin cell-counter -- ./export ./results/run_ --ds 2100 --dt 0.1 single --it 9550
// cargo run --bin cell-counter -- ./export ./results/run_ dual --ct 85000 --it 9550 --charts

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Directory holding the raw export: SAMPLE TIME.csv, SAMPLE Y.csv, BLANK TIME.csv and BLANK Y.csv.
    input: PathBuf,

    /// Output directory prefix. The run's timestamp is appended to it.
    output: PathBuf,

    #[clap(flatten)]
    calibration: Calibration,

    #[clap(flatten)]
    run_info: RunInfo,

    #[command(subcommand)]
    mode: Mode,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let _tracer = init_tracer!(TracerOptions::default());

    run(&args).inspect_err(|e| error!("{e:#}"))
}

fn run(args: &Cli) -> Result<()> {
    let mut timers = TimerSuite::default();
    timers.full.record();

    let settings = PipelineSettings::new(&args.calibration, &args.mode);
    settings.validate()?;
    tracing::debug!("Settings: {settings:?}");

    info!("Loading data from {}", args.input.display());
    timers.load.record();
    let export = loader::load_export(&args.input)?;
    timers.load.end();

    info!("Processing...");
    timers.processing.record();
    let output = processing::process(&export.sample, &export.blank, &settings)?;
    timers.processing.end();

    // Created only once processing succeeded, so a failed run leaves nothing behind.
    let directory = OutputDirectory::create(&args.output, Local::now())?;
    info!("Writing result into directory {}", directory.path().display());
    timers.write.record();
    let parameters = RunParameters {
        input: &args.input,
        settings: &settings,
        run_info: &args.run_info,
    };
    let written = writer::write_run(&directory, &export.blank, &output, &parameters).and_then(|_| {
        match (&output.histograms, args.mode.charts()) {
            (Some(histograms), true) => chart::save_mass_charts(&directory, histograms),
            _ => Ok(()),
        }
    });
    if let Err(e) = written {
        directory.remove();
        return Err(e.into());
    }
    timers.write.end();

    timers.full.end();
    timers.print();
    Ok(())
}
