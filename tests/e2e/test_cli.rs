//! End-to-end tests for the CLI binary.

#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin("ostia").unwrap()
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("EVM bytecode"))
        .stdout(predicate::str::contains("--mode"));
}

#[test]
fn test_cli_version_info() {
    cmd()
        .arg("--version-info")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ostia "));
}

#[test]
fn test_cli_decompile_default_mode() {
    cmd()
        .arg("600260035b6002015b600402")
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("def main():"))
        .stdout(predicate::str::contains("def func1(arg0):"))
        .stdout(predicate::str::contains("    func1(var2)"));
}

#[test]
fn test_cli_disassemble_mode() {
    cmd()
        .args(["-m", "disassemble", "6020565b00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("; block 0x3"))
        .stdout(predicate::str::contains("| jump "))
        .stdout(predicate::str::contains("0x20"));
}

#[test]
fn test_cli_no_optimize_keeps_raw_pushes() {
    cmd()
        .args(["-m", "disassemble", "--no-optimize", "6002600301"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| add"))
        .stdout(predicate::str::contains("0x3"));
    cmd()
        .args(["-m", "disassemble", "6002600301"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| add").not())
        .stdout(predicate::str::contains("0x5"));
}

#[test]
fn test_cli_json_mode() {
    cmd()
        .args(["--mode", "json", "6002600260030202"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"functions\""))
        .stdout(predicate::str::contains("\"0xc\""));
}

#[test]
fn test_cli_unknown_mode_fails() {
    cmd().args(["-m", "bogus", "00"]).assert().failure();
}

#[test]
fn test_cli_malformed_hex_fails() {
    cmd()
        .arg("0x6g")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load bytecode"));
}

#[test]
fn test_cli_file_input() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("bytecode.hex");
    std::fs::write(&file_path, "0x602a60005500\n").unwrap();

    cmd()
        .arg("-f")
        .arg(&file_path)
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("sstore(0x0, 0x2a)"));
}

#[test]
fn test_cli_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg("-f")
        .arg(dir.path().join("nope.hex"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn test_cli_out_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("listing.txt");

    cmd()
        .args(["-m", "disassemble", "--out"])
        .arg(&out)
        .arg("6001")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("; block 0x0\n[  0x0000] | push1"));
    assert!(!written.contains("\x1b["));
}

#[test]
fn test_cli_stdin_input() {
    cmd()
        .write_stdin("00\n")
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("stop()"));
}

#[test]
fn test_cli_empty_stdin_yields_empty_main() {
    cmd()
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("def main():\n    pass"));
}

#[test]
fn test_cli_truncated_push() {
    cmd()
        .args(["--no-color", "7f0011"])
        .assert()
        .success()
        .stdout(predicate::str::contains("invalid()"));
}
