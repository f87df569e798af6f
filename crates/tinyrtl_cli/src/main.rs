//! tinyrtl CLI: run and check circuit descriptions.
//!
//! `tinyrtl run` loads a `circuit.toml`, simulates it, and prints per-wire
//! histories. `tinyrtl check` validates a description and summarizes it.

#![warn(missing_docs)]

mod check;
mod run;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// tinyrtl, a cycle-stepped RTL simulator.
#[derive(Parser, Debug)]
#[command(name = "tinyrtl", version, about = "Tiny RTL simulator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate a circuit description and print wire histories.
    Run(RunArgs),
    /// Validate a circuit description.
    Check(CheckArgs),
}

/// Arguments for the `tinyrtl run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the circuit description.
    pub circuit: PathBuf,

    /// Override `[sim].cycles`. Negative values run zero cycles.
    #[arg(long, allow_negative_numbers = true)]
    pub cycles: Option<i64>,

    /// Leave the advanced state committed instead of restoring it.
    #[arg(long)]
    pub no_restore: bool,

    /// Output format for histories.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print every simulated wire, not just the targets.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the `tinyrtl check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the circuit description.
    pub circuit: PathBuf,
}

/// History output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `name: v0, v1, ...` line per wire.
    Text,
    /// The serialized history as JSON.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `-v` and `-q` take precedence over
/// `RUST_LOG`, which otherwise defaults to `warn`.
fn init_tracing(quiet: bool, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
