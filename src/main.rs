use clap::Parser;
use scooper::cli::{self, Cli, Command};
use scooper::config::Config;
use scooper::lifecycle::setup_tracing;
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    let config = args.apply(Config::from_env());

    setup_tracing(config.log_format);
    debug!(?config, "Configuration loaded");

    let command = args.command.unwrap_or(Command::Serve);
    ExitCode::from(cli::run(command, config).await)
}
