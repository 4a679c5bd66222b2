//! Stack reconstruction and resolution tests.

use ostia::blocks::{split_blocks, Block};
use ostia::function::{Function, JumpTarget, Line};
use ostia::loader::{decode, parse_hex};
use ostia::peephole::optimize;
use ostia::reconstruct::{reconstruct_block, reconstruct_blocks, ReconstructContext};
use ostia::resolver::{add_fallthroughs, inline_constants, resolve, resolve_jumps};
use ostia::stack::Stack;
use ostia::utils::opcodes::OpClass;
use ostia::value::Value;
use std::collections::HashMap;

fn blocks(hex: &str) -> Vec<Block> {
    split_blocks(optimize(decode(&parse_hex(hex).unwrap())))
}

fn reconstructed(hex: &str) -> Vec<Function> {
    reconstruct_blocks(&blocks(hex), &mut ReconstructContext::new()).unwrap()
}

fn resolved(hex: &str) -> Vec<Function> {
    let mut funcs = reconstructed(hex);
    resolve(&mut funcs).unwrap();
    funcs
}

#[test]
fn test_each_variable_read_at_most_once_before_inlining() {
    for hex in [
        "600260035b6002015b600402",
        "3334023301",
        "60006000f3",
        "3360045760006000fd5b00",
    ] {
        let mut reads: HashMap<usize, usize> = HashMap::new();
        for f in reconstructed(hex) {
            for line in &f.lines {
                if let Line::Assign { operands, .. } = line {
                    for id in operands.iter().filter_map(Value::as_var) {
                        *reads.entry(id).or_default() += 1;
                    }
                }
                if let Line::Jump { target: JumpTarget::Value(v), condition, .. } = line {
                    for id in std::iter::once(v).chain(condition.iter()).filter_map(Value::as_var) {
                        *reads.entry(id).or_default() += 1;
                    }
                }
            }
        }
        assert!(reads.values().all(|&n| n <= 1), "{hex}: {reads:?}");
    }
}

#[test]
fn test_no_shuffle_lines_are_emitted() {
    for f in resolved("8081828384919293") {
        for line in &f.lines {
            if let Line::Assign { op, .. } = line {
                assert!(!op.is_stack_shuffle(), "{}", op.name);
            }
        }
    }
}

#[test]
fn test_dup_preserves_value_identity() {
    // CALLER, DUP1, SSTORE: both operands are the same caller value
    let f = &reconstructed("338055")[0];
    match &f.lines[1] {
        Line::Assign { operands, .. } => assert_eq!(operands[0], operands[1]),
        other => panic!("unexpected line {other:?}"),
    }
}

#[test]
fn test_swap_reorders_operands() {
    // CALLER, CALLVALUE, SWAP1, SSTORE → sstore(caller, callvalue)
    let f = &reconstructed("33349055")[0];
    match &f.lines[2] {
        Line::Assign { operands, .. } => {
            assert_eq!(operands, &vec![Value::Var(0), Value::Var(1)]);
        }
        other => panic!("unexpected line {other:?}"),
    }
}

#[test]
fn test_block_arguments_and_returns() {
    // jumpdest; ADD; jumpdest; CALLER
    let funcs = reconstructed("5b015b33");
    assert_eq!(funcs[0].args_needed, 2);
    assert_eq!(funcs[0].returns.len(), 1);
    assert_eq!(funcs[1].args_needed, 0);
    assert_eq!(funcs[1].returns.len(), 1);
}

#[test]
fn test_deep_swap_past_bottom_synthesises_arguments() {
    let mut ctx = ReconstructContext::new();
    let f = reconstruct_block(&blocks("9f")[0], &mut ctx).unwrap();
    assert_eq!(f.args_needed, 17);
    assert_eq!(f.returns.len(), 17);
    assert_eq!(f.returns[0], Value::Arg(16));
    assert_eq!(f.returns[16], Value::Arg(0));
}

#[test]
fn test_stack_registry_is_lifo() {
    let mut s = Stack::new();
    s.push(Value::Var(1));
    s.push(Value::Var(2));
    assert_eq!(s.pop_n(3), vec![Value::Var(2), Value::Var(1), Value::Arg(0)]);
    assert_eq!(s.args_needed(), 1);
}

#[test]
fn test_stack_balance_for_every_block() {
    for hex in ["5b015b33", "8091505b3456", "600160025b5050", "3360045760006000fd5b00"] {
        let bs = blocks(hex);
        let funcs = reconstruct_blocks(&bs, &mut ReconstructContext::new()).unwrap();
        for (block, f) in bs.iter().zip(&funcs) {
            let delta: i64 = block
                .instructions
                .iter()
                .filter(|i| i.op.class != OpClass::JumpDest)
                .map(|i| {
                    let pops = if i.args.is_some() { 0 } else { i.op.pops as i64 };
                    i.op.pushes as i64 - pops
                })
                .sum();
            assert_eq!(delta + f.args_needed as i64, f.returns.len() as i64, "{hex}");
        }
    }
}

#[test]
fn test_inline_and_resolve_jump() {
    // PUSH1 3, JUMP, JUMPDEST, STOP
    let mut funcs = reconstructed("6003565b00");
    inline_constants(&mut funcs);
    resolve_jumps(&mut funcs);
    assert_eq!(
        funcs[0].lines,
        vec![Line::Jump {
            offset: Some(2),
            target: JumpTarget::Function("func1".into()),
            condition: None,
            args: vec![],
        }]
    );
    assert_eq!(add_fallthroughs(&mut funcs), 0);
}

#[test]
fn test_conditional_jump_gets_fallthrough() {
    // PUSH1 6, PUSH1 1, JUMPI, STOP, JUMPDEST, STOP
    let funcs = resolved("6006600157005b00");
    assert_eq!(funcs.len(), 2);
    match &funcs[0].lines[0] {
        Line::Jump { target, condition, .. } => {
            assert_eq!(*target, JumpTarget::Function("func1".into()));
            assert_eq!(*condition, Some(Value::constant(1)));
        }
        other => panic!("unexpected line {other:?}"),
    }
    // stop terminates, so no fallthrough is appended
    assert_eq!(funcs[0].lines.len(), 2);
}

#[test]
fn test_fallthrough_after_conditional_jump() {
    // CALLER, PUSH1 4, JUMPI (dynamic condition), JUMPDEST, STOP
    let funcs = resolved("336004575b00");
    let last = funcs[0].lines.last().unwrap();
    assert_eq!(
        *last,
        Line::Jump {
            offset: None,
            target: JumpTarget::Function("func1".into()),
            condition: None,
            args: vec![],
        }
    );
}

#[test]
fn test_jump_outside_any_block_is_fault() {
    let funcs = resolved("600956");
    match &funcs[0].lines[0] {
        Line::Jump { target, args, .. } => {
            assert_eq!(*target, JumpTarget::Fault);
            assert!(args.is_empty());
        }
        other => panic!("unexpected line {other:?}"),
    }
}

#[test]
fn test_dynamic_jump_stays_symbolic() {
    // CALLVALUE, JUMP
    let funcs = resolved("3456");
    match &funcs[0].lines[1] {
        Line::Jump { target, .. } => assert_eq!(*target, JumpTarget::Value(Value::Var(1))),
        other => panic!("unexpected line {other:?}"),
    }
}

#[test]
fn test_variables_renumbered_from_one_in_program_order() {
    let funcs = resolved("33345b3233");
    let defined: Vec<usize> = funcs
        .iter()
        .flat_map(|f| f.lines.iter())
        .filter_map(|l| match l {
            Line::Assign { targets, .. } => targets.first().and_then(Value::as_var),
            Line::Jump { .. } => None,
        })
        .collect();
    assert_eq!(defined, vec![1, 2, 3, 4]);
}
