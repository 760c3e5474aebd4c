//! Lingo - Command-line text translator
//! 
//! Loads the configuration, picks an engine by proxy availability (or by
//! `--engine`), translates the query and prints the result.

use clap::Parser;
use std::process::ExitCode;

use lingo::app;
use lingo::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    let outcome = app::run(&args).await;
    ExitCode::from(outcome.exit_code())
}
