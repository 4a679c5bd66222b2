//! Reconstructed functions: one per basic block.

use crate::utils::opcodes::OpcodeInfo;
use crate::value::Value;
use serde_json::json;

/// Where a jump line transfers control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpTarget {
    /// Resolved to the entry of a known block.
    Function(String),
    /// Constant destination that is not a block entry.
    Fault,
    /// Not (yet) resolved.  Non-constant values stay here for good.
    Value(Value),
}

/// One line of pseudo-code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `targets = op(operands)`.
    Assign {
        offset: usize,
        targets: Vec<Value>,
        op: &'static OpcodeInfo,
        operands: Vec<Value>,
    },
    /// `[if condition:] target(args)`.  Synthetic fallthroughs have no offset.
    Jump {
        offset: Option<usize>,
        target: JumpTarget,
        condition: Option<Value>,
        args: Vec<Value>,
    },
}

impl Line {
    /// Control never reaches the following line.
    pub fn ends_block(&self) -> bool {
        match self {
            Line::Assign { op, .. } => op.terminates,
            Line::Jump { condition, .. } => condition.is_none(),
        }
    }

    /// Every value the line reads, including jump targets and arguments.
    pub fn reads(&self) -> Vec<&Value> {
        match self {
            Line::Assign { operands, .. } => operands.iter().collect(),
            Line::Jump { target, condition, args, .. } => {
                let mut out = Vec::new();
                if let JumpTarget::Value(v) = target {
                    out.push(v);
                }
                out.extend(condition.iter());
                out.extend(args.iter());
                out
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Line::Assign { offset, targets, op, operands } => json!({
                "kind": "assign",
                "offset": offset,
                "targets": targets,
                "op": op.name,
                "operands": operands,
            }),
            Line::Jump { offset, target, condition, args } => {
                let target = match target {
                    JumpTarget::Function(name) => json!({ "function": name }),
                    JumpTarget::Fault => json!("fault"),
                    JumpTarget::Value(v) => json!({ "value": v }),
                };
                json!({
                    "kind": "jump",
                    "offset": offset,
                    "target": target,
                    "condition": condition,
                    "args": args,
                })
            }
        }
    }
}

/// A reconstructed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    /// Entry address of the block.
    pub offset: usize,
    /// Number of arguments the block takes from its caller's stack.
    pub args_needed: usize,
    pub lines: Vec<Line>,
    /// Values left on the stack, top first.
    pub returns: Vec<Value>,
}

impl Function {
    pub fn new(name: String, offset: usize) -> Self {
        Self {
            name,
            offset,
            args_needed: 0,
            lines: Vec::new(),
            returns: Vec::new(),
        }
    }

    /// Positional parameter names: `arg0, arg1, ..`.
    pub fn params(&self) -> Vec<String> {
        (0..self.args_needed).map(|i| format!("arg{i}")).collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "offset": self.offset,
            "args_needed": self.args_needed,
            "lines": self.lines.iter().map(Line::to_json).collect::<Vec<_>>(),
            "returns": self.returns,
        })
    }
}
