//! Whole-program resolution over reconstructed blocks.
//!
//! Four passes, in this order:
//!
//! 1. [`inline_constants`]: replace reads of pushed variables by the constant.
//! 2. [`resolve_jumps`]: turn constant jump targets into function references.
//! 3. [`renumber_variables`]: compact variable ids in program order.
//! 4. [`add_fallthroughs`]: make implicit fallthrough an explicit call.
//!
//! Each pass relies on the state left by the previous one.

use crate::errors::ResolveError;
use crate::function::{Function, JumpTarget, Line};
use crate::value::Value;
use primitive_types::U256;
use std::collections::{HashMap, HashSet};

/// Run all four passes.
pub fn resolve(functions: &mut [Function]) -> Result<(), ResolveError> {
    inline_constants(functions);
    resolve_jumps(functions);
    renumber_variables(functions)?;
    add_fallthroughs(functions);
    Ok(())
}

fn pushed_constant(line: &Line) -> Option<(usize, U256)> {
    match line {
        Line::Assign { targets, op, operands, .. } if op.is_push() => {
            match (targets.as_slice(), operands.as_slice()) {
                ([Value::Var(id)], [Value::Const(v)]) => Some((*id, *v)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn substitute(value: &mut Value, constants: &HashMap<usize, U256>) {
    if let Value::Var(id) = value {
        if let Some(c) = constants.get(id) {
            *value = Value::Const(*c);
        }
    }
}

/// Replace operand, jump-target and jump-condition reads of pushed variables
/// with their constant, then drop push lines nobody references any more.
///
/// Return values and jump arguments keep referring to the variable.
pub fn inline_constants(functions: &mut [Function]) -> usize {
    let constants: HashMap<usize, U256> = functions
        .iter()
        .flat_map(|f| f.lines.iter().filter_map(pushed_constant))
        .collect();

    for func in functions.iter_mut() {
        for line in func.lines.iter_mut() {
            match line {
                Line::Assign { operands, .. } => {
                    operands.iter_mut().for_each(|v| substitute(v, &constants));
                }
                Line::Jump { target, condition, .. } => {
                    if let JumpTarget::Value(v) = target {
                        substitute(v, &constants);
                    }
                    if let Some(c) = condition {
                        substitute(c, &constants);
                    }
                }
            }
        }
    }

    let referenced: HashSet<usize> = functions
        .iter()
        .flat_map(|f| {
            f.lines
                .iter()
                .flat_map(Line::reads)
                .chain(f.returns.iter())
                .filter_map(Value::as_var)
                .collect::<Vec<_>>()
        })
        .collect();

    let mut removed = 0;
    for func in functions.iter_mut() {
        let before = func.lines.len();
        func.lines.retain(|line| match pushed_constant(line) {
            Some((id, _)) => referenced.contains(&id),
            None => true,
        });
        removed += before - func.lines.len();
    }
    log::debug!("inlined {} constants, removed {removed} push lines", constants.len());
    removed
}

/// Point constant jump targets at the block they enter.
///
/// Resolved jumps pass the first N values of their stack snapshot, N being
/// the callee's argument count.  Constant targets that are not a block entry
/// become [`JumpTarget::Fault`]; non-constant targets stay as they are.
pub fn resolve_jumps(functions: &mut [Function]) {
    let entries: HashMap<usize, (String, usize)> = functions
        .iter()
        .map(|f| (f.offset, (f.name.clone(), f.args_needed)))
        .collect();

    for func in functions.iter_mut() {
        for line in func.lines.iter_mut() {
            let Line::Jump { offset, target, args, .. } = line else { continue };
            let JumpTarget::Value(value) = target else { continue };

            let Some(dest) = value.as_const() else {
                log::debug!("dynamic jump target {value} in {}", func.name);
                args.clear();
                continue;
            };

            let entry = (dest <= U256::from(usize::MAX))
                .then(|| dest.as_usize())
                .and_then(|d| entries.get(&d));
            match entry {
                Some((name, needed)) => {
                    if args.len() < *needed {
                        log::warn!(
                            "jump at {offset:?} passes {} values, {name} needs {needed}",
                            args.len()
                        );
                    }
                    args.truncate(*needed);
                    *target = JumpTarget::Function(name.clone());
                }
                None => {
                    log::debug!("jump to 0x{dest:x} does not enter a block");
                    args.clear();
                    *target = JumpTarget::Fault;
                }
            }
        }
    }
}

fn rename(
    value: &mut Value,
    mapping: &HashMap<usize, usize>,
    function: &str,
) -> Result<(), ResolveError> {
    if let Value::Var(id) = value {
        let new = mapping.get(id).ok_or_else(|| ResolveError::UndefinedVariable {
            function: function.to_string(),
            var: *id,
        })?;
        *id = *new;
    }
    Ok(())
}

/// Give variables compact ids, starting at 1, in order of definition.
pub fn renumber_variables(functions: &mut [Function]) -> Result<(), ResolveError> {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let mut next = 1usize;

    for func in functions.iter_mut() {
        let name = func.name.as_str();
        for line in func.lines.iter_mut() {
            match line {
                Line::Assign { targets, operands, .. } => {
                    for v in operands.iter_mut() {
                        rename(v, &mapping, name)?;
                    }
                    for t in targets.iter_mut() {
                        if let Value::Var(id) = t {
                            mapping.insert(*id, next);
                            *id = next;
                            next += 1;
                        }
                    }
                }
                Line::Jump { target, condition, args, .. } => {
                    if let JumpTarget::Value(v) = target {
                        rename(v, &mapping, name)?;
                    }
                    if let Some(c) = condition {
                        rename(c, &mapping, name)?;
                    }
                    for v in args.iter_mut() {
                        rename(v, &mapping, name)?;
                    }
                }
            }
        }
        for v in func.returns.iter_mut() {
            rename(v, &mapping, name)?;
        }
    }
    Ok(())
}

/// Append an explicit call to the next block wherever control falls through.
pub fn add_fallthroughs(functions: &mut [Function]) -> usize {
    let mut added = 0;
    for idx in 0..functions.len().saturating_sub(1) {
        let (head, tail) = functions.split_at_mut(idx + 1);
        let (current, next) = (&mut head[idx], &tail[0]);

        if current.lines.last().is_some_and(Line::ends_block) {
            continue;
        }

        if current.returns.len() < next.args_needed {
            log::warn!(
                "{} leaves {} values, {} needs {}",
                current.name,
                current.returns.len(),
                next.name,
                next.args_needed
            );
        }
        let args = current.returns.iter().take(next.args_needed).cloned().collect();
        current.lines.push(Line::Jump {
            offset: None,
            target: JumpTarget::Function(next.name.clone()),
            condition: None,
            args,
        });
        added += 1;
    }
    added
}
