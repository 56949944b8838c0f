use std::{
    io::BufRead as _,
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use freqstat_stats::engine::{Engine, OK};

use crate::{
    schema::request::BatchResponse,
    util::{Input, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BatchArg {
    /// Path to a JSON Lines file of `{"statistic": ..., "data": ...}` requests (reads stdin when omitted)
    input: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(engine: &Engine, arg: &BatchArg) -> anyhow::Result<ExitCode> {
    let BatchArg { input, output } = arg;
    let input = Input::from_input_path(input.clone())?;
    let input_path = input.display_path();
    let mut output = Output::from_output_path(output.clone())?;

    let mut answered = 0_usize;
    let mut rejected = 0_usize;
    for (idx, line) in input.lines().enumerate() {
        let line =
            line.with_context(|| format!("Failed to read line {} of {input_path}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let response = BatchResponse::answer(engine, idx + 1, &line);
        answered += 1;
        if response.status != OK {
            rejected += 1;
        }
        output.write_json_line(&response)?;
    }
    output.finish()?;

    tracing::info!(answered, rejected, input = %input_path, "batch finished");
    Ok(ExitCode::SUCCESS)
}
