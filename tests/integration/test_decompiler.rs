//! End-to-end decompilation scenarios through `decompile_bytecode`.

use ostia::decompiler::{decompile_bytecode, DecompilerConfig, OutputFormat};
use ostia::function::{JumpTarget, Line};
use ostia::value::Value;

fn config(format: OutputFormat) -> DecompilerConfig {
    DecompilerConfig { format, color: false, optimize: true }
}

fn decompile(hex: &str) -> String {
    decompile_bytecode(hex, &config(OutputFormat::Text)).unwrap().text
}

fn operands(line: &Line) -> Vec<Value> {
    match line {
        Line::Assign { operands, .. } => operands.clone(),
        Line::Jump { .. } => panic!("expected an assignment"),
    }
}

#[test]
fn test_scenario_dup_swap_arithmetic() {
    let d = decompile_bytecode("6020603081910201", &config(OutputFormat::Text)).unwrap();
    let main = &d.program.functions[0];
    let n = main.lines.len();
    let mul = operands(&main.lines[n - 2]);
    assert!(mul.contains(&Value::constant(0x30)));
    assert!(mul.contains(&Value::constant(0x20)));
    assert!(operands(&main.lines[n - 1]).contains(&Value::constant(0x20)));
    assert_eq!(d.text, "def main():\n    var1 = 0x20 * 0x30\n    var2 = var1 + 0x20");
}

#[test]
fn test_scenario_blocks_pass_values_forward() {
    let d = decompile_bytecode("600260035b6002015b600402", &config(OutputFormat::Text)).unwrap();
    let funcs = &d.program.functions;
    assert_eq!(funcs.len(), 3);

    let expected = [("func1", Value::Var(2)), ("func2", Value::Var(3))];
    for (func, (callee, arg)) in funcs.iter().zip(expected) {
        assert_eq!(
            func.lines.last(),
            Some(&Line::Jump {
                offset: None,
                target: JumpTarget::Function(callee.to_string()),
                condition: None,
                args: vec![arg],
            })
        );
    }
    assert_eq!(funcs[1].args_needed, 1);
    assert_eq!(funcs[2].args_needed, 1);

    assert_eq!(
        d.text,
        "def main():\n    var1 = 0x2\n    var2 = 0x3\n    func1(var2)\n\n\
         def func1(arg0):\n    var3 = 0x2 + arg0\n    func2(var3)\n\n\
         def func2(arg0):\n    var4 = 0x4 * arg0"
    );
}

#[test]
fn test_scenario_lone_jumpdest() {
    let d = decompile_bytecode("5b", &config(OutputFormat::Text)).unwrap();
    assert_eq!(d.program.len(), 1);
    assert_eq!(d.text, "def main():\n    pass");
}

#[test]
fn test_scenario_constant_chain() {
    assert_eq!(decompile("6002600260030202"), "def main():\n    var1 = 0xc");
}

#[test]
fn test_scenario_truncated_push() {
    let d = decompile_bytecode("61ff", &config(OutputFormat::Text)).unwrap();
    assert_eq!(d.blocks[0].instructions[0].op.name, "invalid");
    assert_eq!(d.text, "def main():\n    invalid()");
}

#[test]
fn test_resolved_jump_listing() {
    assert_eq!(
        decompile("6003565b00"),
        "def main():\n    func1()\n\ndef func1():\n    stop()"
    );
}

#[test]
fn test_conditional_jump_listing() {
    assert_eq!(
        decompile("336004575b00"),
        "def main():\n    var1 = caller()\n    if var1: func1()\n    func1()\n\n\
         def func1():\n    stop()"
    );
}

#[test]
fn test_shifts_render_as_calls() {
    // CALLER, PUSH1 4, SHR: the shift amount is on top
    assert_eq!(
        decompile("3360041c"),
        "def main():\n    var1 = caller()\n    var2 = shr(0x4, var1)"
    );
    // PUSH1 0x80, PUSH1 4, SHR folds to 0x80 >> 4
    assert_eq!(decompile("608060041c"), "def main():\n    var1 = 0x8");
}

#[test]
fn test_jump_to_program_entry() {
    // PUSH1 0, JUMP: fusion drops the push, main still starts at 0
    assert_eq!(
        decompile("6000565b00"),
        "def main():\n    main()\n\ndef func1():\n    stop()"
    );
    // offset 2 holds the fused jump, not an entry
    assert_eq!(
        decompile("6002565b00"),
        "def main():\n    throw\n\ndef func1():\n    stop()"
    );
}

#[test]
fn test_storage_write() {
    assert_eq!(decompile("602a60005500"), "def main():\n    sstore(0x0, 0x2a)\n    stop()");
}

#[test]
fn test_empty_input_decompiles_to_empty_main() {
    assert_eq!(decompile(""), "def main():\n    pass");
}

#[test]
fn test_json_output() {
    let d = decompile_bytecode("600260035b6002015b600402", &config(OutputFormat::Json)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&d.text).unwrap();
    let funcs = json["functions"].as_array().unwrap();
    assert_eq!(funcs.len(), 3);
    assert_eq!(funcs[0]["name"], "main");
    assert_eq!(funcs[1]["offset"], 4);
    assert_eq!(funcs[1]["args_needed"], 1);
    assert_eq!(funcs[0]["lines"][0]["operands"][0]["const"], "0x2");
    assert_eq!(funcs[0]["lines"][2]["target"]["function"], "func1");
    assert_eq!(funcs[2]["returns"][0]["var"], 4);
}

#[test]
fn test_asm_output() {
    let d = decompile_bytecode("600260035b6002015b600402", &config(OutputFormat::Asm)).unwrap();
    assert!(d.program.is_empty());
    assert_eq!(d.text.matches("; block").count(), 3);
    assert!(d.text.contains("; block 0x8"));
}
