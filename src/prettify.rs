//! Human-readable output formatting.
//!
//! Two listings: the disassembly (one row per instruction, grouped by block)
//! and the decompiled program (one `def` per block, one line per pseudo-code
//! line).

use crate::blocks::Block;
use crate::contract::Program;
use crate::function::{Function, JumpTarget, Line};
use crate::loader::Instruction;
use crate::utils::helpers::colors::{colorize, BLUE, FAIL, GRAY, OKGREEN};
use crate::utils::helpers::{comma_join, padded_hex};
use crate::value::Value;
use primitive_types::U256;

const INDENT: &str = "    ";

// ---------------------------------------------------------------------------
// Disassembly
// ---------------------------------------------------------------------------

/// One disassembly row: `[  0x0004] | push1                | 0x20`.
pub fn pretty_instruction(inst: &Instruction, add_color: bool) -> String {
    let addr = padded_hex(U256::from(inst.offset), 4);
    let operands = inst
        .args
        .as_ref()
        .map(|args| {
            args.iter()
                .map(|a| format!("0x{a:x}"))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    let row = format!(
        "[{}] | {:<20} | {}",
        colorize(&format!("{addr:>8}"), GRAY, add_color),
        inst.op.name,
        operands
    );
    row.trim_end().to_string()
}

/// Disassembly listing, one `; block 0x..` header per block.
pub fn render_disassembly(blocks: &[Block], add_color: bool) -> String {
    let mut out = Vec::new();
    for block in blocks {
        let header = format!("; block 0x{:x}", block.offset);
        out.push(colorize(&header, OKGREEN, add_color));
        out.extend(block.instructions.iter().map(|i| pretty_instruction(i, add_color)));
        out.push(String::new());
    }
    out.join("\n")
}

// ---------------------------------------------------------------------------
// Decompiled listing
// ---------------------------------------------------------------------------

fn pretty_call(target: &JumpTarget, args: &[Value], add_color: bool) -> String {
    match target {
        JumpTarget::Function(name) => format!("{name}({})", comma_join(args)),
        JumpTarget::Fault => colorize("throw", FAIL, add_color),
        JumpTarget::Value(v) => format!("{v}({})", comma_join(args)),
    }
}

/// Render a single pseudo-code line, without indentation.
pub fn pretty_line(line: &Line, add_color: bool) -> String {
    match line {
        Line::Assign { targets, op, operands, .. } => {
            let rhs = match (op.infix, operands.as_slice()) {
                (_, [v]) if op.is_push() => v.to_string(),
                (Some(sym), [a, b]) => format!("{a} {sym} {b}"),
                _ => format!("{}({})", op.name, comma_join(operands)),
            };
            if targets.is_empty() {
                rhs
            } else {
                format!("{} = {rhs}", comma_join(targets))
            }
        }
        Line::Jump { target, condition, args, .. } => {
            let call = pretty_call(target, args, add_color);
            match condition {
                Some(cond) => format!("{} {cond}: {call}", colorize("if", BLUE, add_color)),
                None => call,
            }
        }
    }
}

/// `def name(arg0, ..):` followed by the indented body.
pub fn pretty_function(func: &Function, add_color: bool) -> String {
    let header = format!(
        "{} {}({}):",
        colorize("def", BLUE, add_color),
        func.name,
        func.params().join(", ")
    );
    let mut out = vec![header];
    if func.lines.is_empty() {
        out.push(format!("{INDENT}pass"));
    }
    out.extend(
        func.lines
            .iter()
            .map(|l| format!("{INDENT}{}", pretty_line(l, add_color))),
    );
    out.join("\n")
}

/// Full decompiled listing; functions separated by a blank line.
pub fn render_program(program: &Program, add_color: bool) -> String {
    program
        .functions
        .iter()
        .map(|f| pretty_function(f, add_color))
        .collect::<Vec<_>>()
        .join("\n\n")
}
