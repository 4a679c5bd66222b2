//! Peephole optimizer over the flat instruction stream.
//!
//! ## Pass structure
//!
//! 1. **Jump-argument fusion**: `push X; jump` and `push X; push Y; jumpi`
//!    move the pushed constants into the jump's operand list.
//! 2. **Argument folding**: an instruction popping N values that is directly
//!    preceded by N pushes takes their values as static operands.
//! 3. **Constant folding**: an instruction with a full constant operand list
//!    and a pure evaluator is replaced by a push of the result.
//!
//! The three passes run [`FOLD_ROUNDS`] times, followed by one more argument
//! folding pass.  Folding shrinks the stream and exposes new windows, which is
//! why a single round is not enough.

use crate::core::arithmetic;
use crate::loader::Instruction;
use crate::utils::opcodes::{self, OpClass};

/// Number of fuse/fold/evaluate rounds.
pub const FOLD_ROUNDS: usize = 2;

/// Run all peephole passes over `instructions`.
pub fn optimize(mut instructions: Vec<Instruction>) -> Vec<Instruction> {
    let before = instructions.len();
    for _ in 0..FOLD_ROUNDS {
        fuse_jump_args(&mut instructions);
        fold_arguments(&mut instructions);
        fold_constants(&mut instructions);
    }
    fold_arguments(&mut instructions);
    log::debug!("peephole: {before} -> {} instructions", instructions.len());
    instructions
}

fn is_bare(inst: &Instruction, class: OpClass) -> bool {
    inst.op.class == class && inst.args.is_none()
}

/// Move constant jump targets (and conditions) into the jump itself.
///
/// `push X; push Y; jumpi` yields the operand list `[X, Y]`, read as
/// `[target, condition]`.  Only exact adjacency fires.
pub fn fuse_jump_args(instructions: &mut Vec<Instruction>) -> usize {
    let mut fused = 0;
    let mut i = 0;
    while i < instructions.len() {
        let Some(x) = instructions[i].push_value() else {
            i += 1;
            continue;
        };

        if instructions.get(i + 1).is_some_and(|next| is_bare(next, OpClass::Jump)) {
            instructions[i + 1].args = Some(vec![x]);
            instructions.remove(i);
            fused += 1;
            continue;
        }

        let second = instructions.get(i + 1).and_then(Instruction::push_value);
        if let Some(y) = second {
            if instructions.get(i + 2).is_some_and(|j| is_bare(j, OpClass::JumpIf)) {
                instructions[i + 2].args = Some(vec![x, y]);
                instructions.drain(i..i + 2);
                fused += 1;
                continue;
            }
        }
        i += 1;
    }
    if fused > 0 {
        log::debug!("fused {fused} jump argument windows");
    }
    fused
}

/// Attach the values of directly preceding pushes as static operands.
///
/// Skips `dup`/`swap`, jumps (their operands come only from
/// [`fuse_jump_args`]), instructions that already have operands, and
/// instructions that pop nothing.  Any non-push in the window blocks folding.
pub fn fold_arguments(instructions: &mut Vec<Instruction>) -> usize {
    let mut folded = 0;
    let mut i = 0;
    while i < instructions.len() {
        let inst = &instructions[i];
        let n = inst.op.pops as usize;
        if inst.op.is_stack_shuffle() || inst.op.is_jump() || inst.args.is_some() || n == 0 || i < n {
            i += 1;
            continue;
        }

        // Top of stack first: walk the window backwards.
        let values: Option<Vec<_>> = instructions[i - n..i]
            .iter()
            .rev()
            .map(Instruction::push_value)
            .collect();
        let Some(values) = values else {
            i += 1;
            continue;
        };

        instructions.drain(i - n..i);
        let at = i - n;
        instructions[at].args = Some(values);
        folded += 1;
        i = at + 1;
    }
    if folded > 0 {
        log::debug!("folded constant operands into {folded} instructions");
    }
    folded
}

/// Evaluate instructions whose operands are all constant.
pub fn fold_constants(instructions: &mut [Instruction]) -> usize {
    let table = opcodes::table();
    let mut evaluated = 0;
    for inst in instructions.iter_mut() {
        let Some(kind) = inst.op.eval else { continue };
        let Some(args) = inst.args.as_deref() else { continue };
        if args.len() != inst.op.pops as usize {
            continue;
        }
        let Some(value) = arithmetic::evaluate(kind, args) else { continue };

        let width = (value.bits() + 7) / 8;
        *inst = Instruction::new(inst.offset, table.push_for_width(width), Some(vec![value]));
        evaluated += 1;
    }
    if evaluated > 0 {
        log::debug!("evaluated {evaluated} constant expressions");
    }
    evaluated
}
