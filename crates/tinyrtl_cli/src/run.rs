//! `tinyrtl run`: simulate a circuit description and print histories.

use std::collections::HashSet;

use tinyrtl_sim::History;
use tracing::info;

use crate::{GlobalArgs, OutputFormat, RunArgs};

/// Runs the `tinyrtl run` command.
///
/// Loads and builds the description, applies `--cycles`/`--no-restore`,
/// simulates, and prints the histories of the requested targets (or of the
/// whole dependency closure with `--all`). Returns exit code 0 on success.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = tinyrtl_config::load_config(&args.circuit)?;
    let mut built = tinyrtl_config::build_circuit(&config)?;

    if let Some(cycles) = args.cycles {
        built.sim.cycles = usize::try_from(cycles).unwrap_or(0);
    }
    if args.no_restore {
        built.sim.restore_state = false;
    }

    let targets: HashSet<String> = built
        .sim
        .targets
        .iter()
        .map(|&id| built.circuit.name_of(id).to_string())
        .collect();

    if !global.quiet {
        eprintln!(
            "   Simulating {} ({} cycles)",
            args.circuit.display(),
            built.sim.cycles
        );
    }

    let mut history = tinyrtl_sim::simulate(&mut built.circuit, &built.sim)?;
    info!(wires = history.len(), cycles = history.cycles(), "run complete");
    if global.verbose {
        eprintln!("   Recorded {} wire(s)", history.len());
    }
    if !args.all {
        history.retain(|name| targets.contains(name));
    }

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&history)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&history)?),
    }

    if !built.sim.restore_state && !global.quiet {
        for &id in &built.sim.targets {
            eprintln!(
                "   {} = {}",
                built.circuit.name_of(id),
                built.circuit.value_of(id)
            );
        }
    }

    Ok(0)
}

/// Formats a history as one `name: v0, v1, ...` line per wire.
fn render_text(history: &History) -> String {
    let mut out = String::new();
    for (name, values) in history.iter() {
        let values: Vec<String> = values.iter().map(i64::to_string).collect();
        out.push_str(name);
        out.push(':');
        if !values.is_empty() {
            out.push(' ');
            out.push_str(&values.join(", "));
        }
        out.push('\n');
    }
    out
}
