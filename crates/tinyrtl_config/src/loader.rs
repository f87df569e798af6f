//! Circuit description loading and validation.

use std::collections::HashSet;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::CircuitConfig;

/// Loads and validates a circuit description from a file.
pub fn load_config(path: &Path) -> Result<CircuitConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a circuit description from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<CircuitConfig, ConfigError> {
    let config: CircuitConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that every wire has a unique, non-empty name and that every name
/// used in an expression or in `[sim].targets` is declared.
fn validate_config(config: &CircuitConfig) -> Result<(), ConfigError> {
    let mut declared: HashSet<&str> = HashSet::with_capacity(config.wires.len());
    for (i, decl) in config.wires.iter().enumerate() {
        if decl.name.is_empty() {
            return Err(ConfigError::MissingField(format!("wires[{i}].name")));
        }
        if !declared.insert(decl.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate wire name '{}'",
                decl.name
            )));
        }
    }

    for decl in &config.wires {
        let mut missing: Option<&str> = None;
        for expr in decl.exprs() {
            expr.for_each_wire(&mut |name| {
                if missing.is_none() && !declared.contains(name) {
                    missing = Some(name);
                }
            });
        }
        if let Some(name) = missing {
            return Err(ConfigError::UnknownWire {
                wire: decl.name.clone(),
                name: name.to_string(),
            });
        }
    }

    if let Some(target) = config
        .sim
        .targets
        .iter()
        .find(|t| !declared.contains(t.as_str()))
    {
        return Err(ConfigError::UnknownTarget(target.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

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
    fn parse_accumulator() {
        let config = load_config_from_str(ACCUMULATOR).unwrap();
        assert_eq!(config.sim.cycles, 6);
        assert!(config.sim.restore_state);
        assert_eq!(config.sim.targets, vec!["acc"]);
        assert_eq!(config.wires.len(), 4);
        assert_eq!(config.wires[0].init, 1);
        assert!(config.wires[2].comb.is_some());
        assert!(config.wires[3].next.is_some());
    }

    #[test]
    fn empty_description_is_valid() {
        let config = load_config_from_str("").unwrap();
        assert!(config.wires.is_empty());
        assert_eq!(config.sim.cycle_count(), 0);
    }

    #[test]
    fn empty_name_errors() {
        let toml = r#"
[[wires]]
name = "a"

[[wires]]
name = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "wires[1].name"));
    }

    #[test]
    fn duplicate_name_errors() {
        let toml = r#"
[[wires]]
name = "a"

[[wires]]
name = "a"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn undeclared_reference_errors() {
        let toml = r#"
[[wires]]
name = "sum"
comb = { add = ["a", "c"] }

[[wires]]
name = "a"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        match err {
            ConfigError::UnknownWire { wire, name } => {
                assert_eq!(wire, "sum");
                assert_eq!(name, "c");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn forward_references_are_allowed() {
        let toml = r#"
[[wires]]
name = "x"
comb = "y"

[[wires]]
name = "y"
init = 4
"#;
        assert!(load_config_from_str(toml).is_ok());
    }

    #[test]
    fn undeclared_target_errors() {
        let toml = r#"
[sim]
targets = ["ghost"]

[[wires]]
name = "a"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTarget(ref t) if t == "ghost"));
    }

    #[test]
    fn invalid_toml_errors() {
        let toml = "this is not valid toml {{{}}}";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_top_level_key_errors() {
        let err = load_config_from_str("[project]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ACCUMULATOR.as_bytes()).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.wires.len(), 4);
    }

    #[test]
    fn missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("circuit.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
