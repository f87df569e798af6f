//! Lowering a validated [`CircuitConfig`] into a [`Circuit`].

use std::collections::HashMap;

use tinyrtl_ir::{BinaryOp, Circuit, Expr, UnaryOp, WireId};
use tinyrtl_sim::SimConfig;

use crate::error::ConfigError;
use crate::types::{CircuitConfig, ExprSpec, OpSpec};

/// A circuit built from a description, with the run its `[sim]` table asks for.
#[derive(Debug)]
pub struct BuiltCircuit {
    /// The constructed circuit.
    pub circuit: Circuit,
    /// Targets, cycle count, and restore flag from `[sim]`.
    pub sim: SimConfig,
}

/// Builds a [`Circuit`] from `config`.
///
/// Wires are created in declaration order first, so expressions may refer to
/// wires declared later in the file. An empty `[sim].targets` list selects
/// every declared wire.
pub fn build_circuit(config: &CircuitConfig) -> Result<BuiltCircuit, ConfigError> {
    let mut circuit = Circuit::new();
    let mut ids: HashMap<&str, WireId> = HashMap::with_capacity(config.wires.len());
    let mut order: Vec<WireId> = Vec::with_capacity(config.wires.len());
    for decl in &config.wires {
        let id = circuit.add_wire(&decl.name, decl.init);
        order.push(id);
        if ids.insert(decl.name.as_str(), id).is_some() {
            return Err(ConfigError::ValidationError(format!(
                "duplicate wire name '{}'",
                decl.name
            )));
        }
    }

    for (decl, &id) in config.wires.iter().zip(&order) {
        if let Some(spec) = &decl.comb {
            circuit.set_comb(id, lower(spec, &decl.name, &ids)?);
        }
        if let Some(spec) = &decl.next {
            circuit.set_next(id, lower(spec, &decl.name, &ids)?);
        }
    }

    let targets = if config.sim.targets.is_empty() {
        order
    } else {
        config
            .sim
            .targets
            .iter()
            .map(|t| {
                ids.get(t.as_str())
                    .copied()
                    .ok_or_else(|| ConfigError::UnknownTarget(t.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(BuiltCircuit {
        circuit,
        sim: SimConfig {
            targets,
            cycles: config.sim.cycle_count(),
            restore_state: config.sim.restore_state,
        },
    })
}

fn lower(spec: &ExprSpec, owner: &str, ids: &HashMap<&str, WireId>) -> Result<Expr, ConfigError> {
    match spec {
        ExprSpec::Const(v) => Ok(Expr::constant(*v)),
        ExprSpec::Wire(name) => ids
            .get(name.as_str())
            .map(|&id| Expr::wire(id))
            .ok_or_else(|| ConfigError::UnknownWire {
                wire: owner.to_string(),
                name: name.clone(),
            }),
        ExprSpec::Op(op) => lower_op(op, owner, ids),
    }
}

fn lower_op(op: &OpSpec, owner: &str, ids: &HashMap<&str, WireId>) -> Result<Expr, ConfigError> {
    match op {
        OpSpec::Neg(x) => unary(owner, ids, UnaryOp::Neg, x),
        OpSpec::Not(x) => unary(owner, ids, UnaryOp::Not, x),
        OpSpec::LogicNot(x) => unary(owner, ids, UnaryOp::LogicNot, x),
        OpSpec::Add(p) => binary(owner, ids, BinaryOp::Add, p),
        OpSpec::Sub(p) => binary(owner, ids, BinaryOp::Sub, p),
        OpSpec::Mul(p) => binary(owner, ids, BinaryOp::Mul, p),
        OpSpec::Div(p) => binary(owner, ids, BinaryOp::Div, p),
        OpSpec::Mod(p) => binary(owner, ids, BinaryOp::Mod, p),
        OpSpec::And(p) => binary(owner, ids, BinaryOp::And, p),
        OpSpec::Or(p) => binary(owner, ids, BinaryOp::Or, p),
        OpSpec::Xor(p) => binary(owner, ids, BinaryOp::Xor, p),
        OpSpec::Shl(p) => binary(owner, ids, BinaryOp::Shl, p),
        OpSpec::Shr(p) => binary(owner, ids, BinaryOp::Shr, p),
        OpSpec::Eq(p) => binary(owner, ids, BinaryOp::Eq, p),
        OpSpec::Ne(p) => binary(owner, ids, BinaryOp::Ne, p),
        OpSpec::Lt(p) => binary(owner, ids, BinaryOp::Lt, p),
        OpSpec::Le(p) => binary(owner, ids, BinaryOp::Le, p),
        OpSpec::Gt(p) => binary(owner, ids, BinaryOp::Gt, p),
        OpSpec::Ge(p) => binary(owner, ids, BinaryOp::Ge, p),
        OpSpec::LogicAnd(p) => binary(owner, ids, BinaryOp::LogicAnd, p),
        OpSpec::LogicOr(p) => binary(owner, ids, BinaryOp::LogicOr, p),
        OpSpec::Select(t) => Ok(Expr::select(
            lower(&t.0, owner, ids)?,
            lower(&t.1, owner, ids)?,
            lower(&t.2, owner, ids)?,
        )),
    }
}

fn unary(
    owner: &str,
    ids: &HashMap<&str, WireId>,
    op: UnaryOp,
    x: &ExprSpec,
) -> Result<Expr, ConfigError> {
    Ok(Expr::unary(op, lower(x, owner, ids)?))
}

fn binary(
    owner: &str,
    ids: &HashMap<&str, WireId>,
    op: BinaryOp,
    (lhs, rhs): &(ExprSpec, ExprSpec),
) -> Result<Expr, ConfigError> {
    Ok(Expr::binary(op, lower(lhs, owner, ids)?, lower(rhs, owner, ids)?))
}
