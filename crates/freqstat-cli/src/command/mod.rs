use std::{io, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use freqstat_stats::{
    engine::{Engine, EngineConfig},
    mode::BoundaryPolicy,
};
use tracing::Level;

use crate::util;

use self::{batch::BatchArg, compute::ComputeArg};

mod batch;
mod compute;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to an engine configuration JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Policy for a modal class at either end of a grouped table (zero-frequency or reject)
    #[arg(long, global = true)]
    boundary_policy: Option<BoundaryPolicy>,

    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compute one statistic for a JSON payload
    Compute(#[clap(flatten)] ComputeArg),
    /// Answer a JSON Lines stream of requests
    Batch(#[clap(flatten)] BatchArg),
}

impl CommandArgs {
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<EngineConfig, _>("engine config", path)?,
            None => EngineConfig::default(),
        };
        if let Some(policy) = self.boundary_policy {
            config.boundary_policy = policy;
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<ExitCode> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);

    let config = args.engine_config()?;
    tracing::info!(boundary_policy = ?config.boundary_policy, "engine configured");
    let engine = Engine::new(config);

    let code = match &args.mode {
        Mode::Compute(arg) => compute::run(&engine, arg)?,
        Mode::Batch(arg) => batch::run(&engine, arg)?,
    };
    Ok(code)
}
