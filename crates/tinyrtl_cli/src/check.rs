//! `tinyrtl check`: validate a circuit description and summarize it.

use tinyrtl_ir::Circuit;

use crate::{CheckArgs, GlobalArgs};

/// Runs the `tinyrtl check` command.
///
/// Loads, validates and builds the description, then prints one line per
/// wire with its initial value and expressions. Returns exit code 0 if the
/// description is valid.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = tinyrtl_config::load_config(&args.circuit)?;
    let built = tinyrtl_config::build_circuit(&config)?;

    if !global.quiet {
        print!("{}", summarize(&built.circuit));
        println!(
            "ok: {} wire(s), {} target(s), {} cycle(s)",
            built.circuit.len(),
            built.sim.targets.len(),
            built.sim.cycles
        );
    }
    Ok(0)
}

fn summarize(circuit: &Circuit) -> String {
    let mut out = String::new();
    for wire in circuit.wires() {
        let name = circuit.name_of(wire.id);
        out.push_str(&format!("{name} = {}", wire.committed));
        if let Some(comb) = &wire.comb {
            out.push_str(&format!(", comb {}", circuit.render_expr(comb)));
        }
        if let Some(next) = &wire.next {
            out.push_str(&format!(", next {}", circuit.render_expr(next)));
        }
        out.push('\n');
    }
    out
}
