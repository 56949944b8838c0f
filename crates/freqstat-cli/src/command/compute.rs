use std::{path::PathBuf, process::ExitCode};

use freqstat_stats::engine::Engine;
use serde_json::Value;

use crate::util::{Input, Output};

/// Exit status reported when the engine answers with a 400 body.
const REJECTED_EXIT_CODE: u8 = 2;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ComputeArg {
    /// Statistic to compute: mean, median or mode
    statistic: String,
    /// Path to the JSON payload (reads stdin when omitted)
    input: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(engine: &Engine, arg: &ComputeArg) -> anyhow::Result<ExitCode> {
    let ComputeArg {
        statistic,
        input,
        output,
    } = arg;

    let mut input = Input::from_input_path(input.clone())?;
    tracing::info!(
        statistic = statistic.as_str(),
        input = %input.display_path(),
        "reading payload"
    );
    let payload = input.read_json::<Value>()?;

    let response = engine.respond(statistic, &payload);
    let mut output = Output::from_output_path(output.clone())?;
    output.write_json_line(&response)?;
    output.finish()?;
    tracing::info!(
        status = response.status(),
        output = %output.display_path(),
        "response written"
    );

    if response.is_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(REJECTED_EXIT_CODE))
    }
}
