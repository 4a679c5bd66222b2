//! Per-block symbolic stack reconstruction.
//!
//! Each block is executed symbolically over a [`Stack`] of values.  Every
//! instruction becomes a pseudo-code line whose operands are the values it
//! pops and whose targets are fresh variables.  Reads below the bottom of the
//! block's own stack become block arguments; whatever is left at the end
//! becomes the block's return values.
//!
//! Blocks are reconstructed independently of each other.  The only shared
//! state is the [`ReconstructContext`] handing out variable ids.

use crate::blocks::Block;
use crate::errors::ReconstructError;
use crate::function::{Function, JumpTarget, Line};
use crate::stack::Stack;
use crate::utils::opcodes::OpClass;
use crate::value::Value;

/// Counters shared across blocks of one program.
#[derive(Debug, Clone, Default)]
pub struct ReconstructContext {
    next_var: usize,
    next_func: usize,
}

impl ReconstructContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A variable id never handed out before by this context.
    pub fn fresh_var(&mut self) -> Value {
        let id = self.next_var;
        self.next_var += 1;
        Value::Var(id)
    }

    /// Name for the next block in program order: `main`, then `func1`, ..
    pub fn next_name(&mut self) -> String {
        let idx = self.next_func;
        self.next_func += 1;
        if idx == 0 { "main".to_string() } else { format!("func{idx}") }
    }
}

/// Reconstruct every block in program order.
pub fn reconstruct_blocks(
    blocks: &[Block],
    ctx: &mut ReconstructContext,
) -> Result<Vec<Function>, ReconstructError> {
    blocks.iter().map(|block| reconstruct_block(block, ctx)).collect()
}

/// Symbolically execute one block.
pub fn reconstruct_block(
    block: &Block,
    ctx: &mut ReconstructContext,
) -> Result<Function, ReconstructError> {
    let mut func = Function::new(ctx.next_name(), block.offset);
    let mut stack = Stack::new();
    let mut net_delta: i64 = 0;

    for inst in &block.instructions {
        let op = inst.op;
        if op.class == OpClass::JumpDest {
            continue;
        }

        // Fused operands replace pushes that are gone from the stream, so
        // only stack-sourced operands count against the depth.
        let operands: Vec<Value> = match &inst.args {
            Some(args) => args.iter().copied().map(Value::Const).collect(),
            None => {
                net_delta -= op.pops as i64;
                match op.shuffle_depth() {
                    Some(n) if op.class == OpClass::Dup => {
                        stack.dup(n);
                        net_delta += op.pushes as i64;
                        continue;
                    }
                    Some(n) => {
                        stack.swap(n);
                        net_delta += op.pushes as i64;
                        continue;
                    }
                    None => stack.pop_n(op.pops as usize),
                }
            }
        };
        net_delta += op.pushes as i64;

        if op.is_jump() {
            let mut operands = operands.into_iter();
            let target = operands.next().map_or(JumpTarget::Fault, JumpTarget::Value);
            let condition = if op.class == OpClass::JumpIf { operands.next() } else { None };
            func.lines.push(Line::Jump {
                offset: Some(inst.offset),
                target,
                condition,
                args: stack.snapshot(),
            });
            continue;
        }

        let targets: Vec<Value> = (0..op.pushes).map(|_| ctx.fresh_var()).collect();
        for t in &targets {
            stack.push(t.clone());
        }
        func.lines.push(Line::Assign {
            offset: inst.offset,
            targets,
            op,
            operands,
        });
    }

    func.args_needed = stack.args_needed();
    let remaining = net_delta + func.args_needed as i64;
    if remaining < 0 {
        return Err(ReconstructError::NegativeStackDepth {
            block: block.offset,
            depth: remaining,
        });
    }
    let remaining = remaining as usize;
    if remaining != stack.len() {
        return Err(ReconstructError::StackImbalance {
            block: block.offset,
            expected: remaining,
            actual: stack.len(),
        });
    }
    func.returns = stack.peek_n(remaining);

    log::debug!(
        "{} @0x{:x}: {} lines, {} args, {} returns",
        func.name,
        func.offset,
        func.lines.len(),
        func.args_needed,
        func.returns.len()
    );
    Ok(func)
}
