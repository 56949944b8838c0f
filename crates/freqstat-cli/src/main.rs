use std::process::ExitCode;

mod command;
mod schema;
mod util;

fn main() -> anyhow::Result<ExitCode> {
    command::run()
}
