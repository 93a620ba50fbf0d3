use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn teller(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("teller").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("TELLER_LEDGER_FILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn deposit_withdraw_then_balance() {
    let dir = TempDir::new().unwrap();

    teller(&dir)
        .write_stdin("deposit\n100\nwithdraw\n30.5\nbalance\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("The current balance is: $69.50\n"))
        .stdout(predicate::str::ends_with("Program shutting down. Thank you\n"));

    let doc = fs::read_to_string(dir.path().join("log.html")).unwrap();
    assert!(doc.contains("<td>100</td>"));
    assert!(doc.contains("<td>-30.5</td>"));
}

#[test]
fn commands_are_case_insensitive() {
    let dir = TempDir::new().unwrap();

    teller(&dir)
        .write_stdin("  DEPOSIT \n 12.50\nBalance\nExit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("The current balance is: $12.50"));
}

#[test]
fn invalid_input_is_rejected_without_failing() {
    let dir = TempDir::new().unwrap();

    teller(&dir)
        .write_stdin("transfer\ndeposit\n-5\n5.001\nbalance\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid Input 'transfer'"))
        .stdout(predicate::str::contains("Invalid Input '-5'"))
        .stdout(predicate::str::contains("Invalid Input '5.001'"))
        .stdout(predicate::str::contains("The current balance is").not());
}

#[test]
fn shorthand_and_long_amounts() {
    let dir = TempDir::new().unwrap();

    teller(&dir)
        .write_stdin("deposit\n.5\ndeposit\n+5.\ndeposit\n100000000000000000000000000000000\nbalance\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid Input").not())
        .stdout(predicate::str::contains("The current balance is: $100000000000000000000000000000005.50"));
}

#[test]
fn end_of_input_exits_cleanly() {
    let dir = TempDir::new().unwrap();

    teller(&dir)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Please enter in a command"));
}

#[test]
fn ledger_flag_and_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("teller.toml"), "ledger_file = \"configured.html\"\n").unwrap();

    teller(&dir)
        .write_stdin("deposit\n1\n")
        .assert()
        .success();
    assert!(dir.path().join("configured.html").exists());

    teller(&dir)
        .args(["--ledger", "flagged.html"])
        .write_stdin("withdraw\n2\n")
        .assert()
        .success();
    assert!(dir.path().join("flagged.html").exists());

    teller(&dir)
        .env("TELLER_LEDGER_FILE", "configured.html")
        .write_stdin("balance\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("The current balance is: $1.00"));
}

#[test]
fn corrupt_ledger_balance_is_zero() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("log.html"),
        "<table id=\"transactions\"><tbody><tr><td>12</td></tr><tr><td>twelve</td></tr></tbody></table>"
    ).unwrap();

    teller(&dir)
        .write_stdin("balance\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("The current balance is: $0.00"))
        .stderr(predicate::str::contains("reading transactions"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();

    teller(&dir)
        .args(["--config", "nowhere.toml"])
        .write_stdin("exit\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read config file"));
}
