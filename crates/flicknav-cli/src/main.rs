//! Flicknav CLI
//!
//! ## Usage
//!
//! ```bash
//! flicknav simulate --target item19               # Click a row of a simulated list
//! flicknav compare-perf renderTime a.qml b.qml    # Compare scene render times
//! ```

use clap::Parser;
use flicknav_cli::{
    handlers::{execute_compare_perf, execute_simulate},
    logging, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    logging::init(&config);

    match cli.command {
        Commands::ComparePerf(args) => execute_compare_perf(&config, &args),
        Commands::Simulate(args) => execute_simulate(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
        .with_log_json(cli.log_json)
}
