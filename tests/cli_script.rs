mod common;

use assert_cmd::Command;
use predicates::str::contains;

fn cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("budget_sim_cli").unwrap();
    cmd.env("BUDGET_SIM_CLI_SCRIPT", "1")
        .env("BUDGET_SIM_HOME", home)
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = common::temp_home();
    cli(&home)
        .write_stdin("summary\npay 1\nlist\nexit\n")
        .assert()
        .success()
        .stdout(contains("Paid `Aluguel` (1)."))
        .stdout(contains("R$ 5.000,00"));

    let json = std::fs::read_to_string(home.join("data").join("expenses.json")).unwrap();
    assert!(json.contains("\"paid\""));
}

#[test]
fn state_persists_between_runs() {
    let home = common::temp_home();
    cli(&home)
        .write_stdin("add \"Curso de inglês\" 150 --temp\nbalance 3000\n")
        .assert()
        .success()
        .stdout(contains("Added temporary expense `Curso de inglês`"));

    cli(&home)
        .write_stdin("list\nbalance\n")
        .assert()
        .success()
        .stdout(contains("Curso de inglês"))
        .stdout(contains("Initial balance: R$ 3.000,00"));
}

#[test]
fn new_month_resets_the_period() {
    let home = common::temp_home();
    cli(&home)
        .write_stdin("pay 1\nedit 2 50\nnew-month 4500\nsummary\n")
        .assert()
        .success()
        .stdout(contains("New month started with 6 expense(s)."))
        .stdout(contains("Initial balance: R$ 4.500,00"));

    let json = std::fs::read_to_string(home.join("data").join("expenses.json")).unwrap();
    assert!(!json.contains("\"paid\""));
}

#[test]
fn unknown_command_gets_a_suggestion() {
    let home = common::temp_home();
    cli(&home)
        .write_stdin("lsit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `lsit`"))
        .stdout(contains("Suggestion: `list`?"));
}

#[test]
fn invalid_values_are_reported_without_failing() {
    let home = common::temp_home();
    cli(&home)
        .write_stdin("edit 1 -10\npay 42\n")
        .assert()
        .success()
        .stdout(contains("must not be negative"))
        .stdout(contains("No expense matches `42`."));
}
