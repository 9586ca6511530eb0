use anyhow::Context;
use clap::Parser;
use git_tidy_rust::{app, cli::Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let printer = cli.config().printer();

    let result = std::env::current_dir()
        .context("Failed to get current directory")
        .and_then(|cwd| app::run(&cli, &cwd).map_err(anyhow::Error::from));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            printer.error(format_args!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
