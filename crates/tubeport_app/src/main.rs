mod app;
mod config;
mod effects;
mod ui;

use std::process::ExitCode;

use clap::Parser;
use client_logging::client_error;

fn main() -> anyhow::Result<ExitCode> {
    let cli = config::Cli::parse();
    config::init_logging(&cli);
    app::run(cli).inspect_err(|err| client_error!("tubeport stopped: {err:#}"))
}
