//! `circuit.toml` descriptions run end to end, compared against the
//! construction API where both can express the same circuit.

use std::io::Write;

use tinyrtl_conformance::{accumulator, build_description, run_description};
use tinyrtl_config::ConfigError;
use tinyrtl_sim::Simulate;

const ACCUMULATOR: &str = r#"
[sim]
cycles = 6
targets = ["acc"]

[[wires]]
name = "a"
init = 1

[[wires]]
name = "b"
init = 2

[[wires]]
name = "sum"
comb = { add = ["a", "b"] }

[[wires]]
name = "acc"
next = { add = ["acc", "sum"] }
"#;

#[test]
fn description_matches_construction_api() {
    let (_, from_file) = run_description(ACCUMULATOR).unwrap();
    let mut acc = accumulator();
    let from_api = acc.circuit.simulate_one(acc.acc, 6, true).unwrap();
    assert_eq!(from_file, from_api);
    assert_eq!(from_file.get("acc"), Some(&[0, 3, 6, 9, 12, 15][..]));
}

#[test]
fn restore_state_false_leaves_registers_advanced() {
    let toml = ACCUMULATOR.replace("cycles = 6", "cycles = 6\nrestore_state = false");
    let (built, _) = run_description(&toml).unwrap();
    let acc = built.circuit.wire_by_name("acc").unwrap();
    assert_eq!(built.circuit.value_of(acc), 18);
}

#[test]
fn restore_state_default_restores() {
    let (built, _) = run_description(ACCUMULATOR).unwrap();
    let acc = built.circuit.wire_by_name("acc").unwrap();
    assert_eq!(built.circuit.value_of(acc), 0);
}

#[test]
fn select_and_comparisons() {
    let (_, history) = run_description(
        r#"
[sim]
cycles = 4
targets = ["m"]

[[wires]]
name = "m"
comb = { select = [{ gt = ["a", "b"] }, "a", "b"] }

[[wires]]
name = "a"
init = 1
next = { add = ["a", 1] }

[[wires]]
name = "b"
init = 2
"#,
    )
    .unwrap();
    assert_eq!(history.get("m"), Some(&[2, 2, 3, 4][..]));
}

#[test]
fn division_by_zero_in_description() {
    let (_, history) = run_description(
        r#"
[sim]
cycles = 2

[[wires]]
name = "q"
comb = { div = [5, 0] }

[[wires]]
name = "r"
comb = { mod = [5, 0] }
"#,
    )
    .unwrap();
    assert_eq!(history.get("q"), Some(&[0, 0][..]));
    assert_eq!(history.get("r"), Some(&[0, 0][..]));
}

#[test]
fn logic_operators_yield_zero_or_one() {
    let (_, history) = run_description(
        r#"
[sim]
cycles = 1

[[wires]]
name = "x"
init = 7

[[wires]]
name = "both"
comb = { logic_and = ["x", 3] }

[[wires]]
name = "either"
comb = { logic_or = [0, "x"] }

[[wires]]
name = "none"
comb = { logic_not = "x" }
"#,
    )
    .unwrap();
    assert_eq!(history.get("both"), Some(&[1][..]));
    assert_eq!(history.get("either"), Some(&[1][..]));
    assert_eq!(history.get("none"), Some(&[0][..]));
}

#[test]
fn negative_cycle_count_runs_nothing() {
    let toml = ACCUMULATOR.replace("cycles = 6", "cycles = -2");
    let (_, history) = run_description(&toml).unwrap();
    assert_eq!(history.cycles(), 0);
    assert_eq!(history.get("acc"), Some(&[][..]));
}

#[test]
fn empty_targets_simulate_every_wire() {
    let toml = ACCUMULATOR.replace("targets = [\"acc\"]\n", "");
    let (_, history) = run_description(&toml).unwrap();
    assert_eq!(history.names().collect::<Vec<_>>(), vec!["a", "acc", "b", "sum"]);
}

#[test]
fn undeclared_reference_is_rejected() {
    let err = build_description(
        r#"
[[wires]]
name = "sum"
comb = { add = ["a", "c"] }

[[wires]]
name = "a"
"#,
    )
    .err()
    .unwrap();
    let err = err.downcast::<ConfigError>().unwrap();
    assert!(matches!(*err, ConfigError::UnknownWire { ref name, .. } if name == "c"));
}

#[test]
fn load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("circuit.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(ACCUMULATOR.as_bytes()).unwrap();
    drop(file);

    let config = tinyrtl_config::load_config(&path).unwrap();
    let mut built = tinyrtl_config::build_circuit(&config).unwrap();
    let history = tinyrtl_sim::simulate(&mut built.circuit, &built.sim).unwrap();
    assert_eq!(history.get("acc"), Some(&[0, 3, 6, 9, 12, 15][..]));
}
