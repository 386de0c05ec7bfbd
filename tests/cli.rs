use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tally(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("TALLY_DATA_DIR", dir.path())
        .env("TALLY_CLASSIFIER_URL", "http://127.0.0.1:9")
        .env_remove("TALLY_SHEETS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    tally(&dir).arg("init").assert().success();
    dir
}

#[test]
fn init_lays_out_tables_once() {
    let dir = TempDir::new().unwrap();

    tally(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created table 'Transactions'"))
        .stdout(predicate::str::contains("created table 'Budgets'"));

    assert!(dir.path().join("config.json").exists());
    let expenses = fs::read_to_string(dir.path().join("data").join("Transactions.csv")).unwrap();
    assert_eq!(expenses.lines().nth(3), Some("Date,Amount,Description,Category"));

    tally(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("All tables already present."));
}

#[test]
fn recorded_entries_show_in_summary() {
    let dir = initialized();

    tally(&dir)
        .args(["expense", "add", "500", "-m", "Veg", "-c", "Food", "-d", "05/01/2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Expense appended in 'Transactions'"));
    tally(&dir)
        .args(["expense", "add", "1,500", "-m", "Groceries", "-c", "Food", "-d", "10/01/2024"])
        .assert()
        .success();
    tally(&dir)
        .args(["expense", "add", "3000", "-c", "Farmhouse", "-d", "12/01/2024"])
        .assert()
        .success();
    tally(&dir)
        .args(["income", "add", "50000", "-s", "Salary", "-d", "01/01/2024"])
        .assert()
        .success();
    tally(&dir)
        .args(["budget", "set", "Food", "1000", "-m", "2024-01"])
        .assert()
        .success();

    tally(&dir)
        .args(["report", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard: January 2024"))
        .stdout(predicate::str::contains("₹2,000.00"))
        .stdout(predicate::str::contains("₹48,000.00"))
        .stdout(predicate::str::contains("Over Budget"))
        .stdout(predicate::str::contains("Excluded: Farmhouse"));

    tally(&dir)
        .args(["report", "categories", "--csv", "--no-exclude"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Month,Category,Spent,Budget,Delta,Status,Share\n2024-01,Farmhouse,3000.00,0.00,3000.00,NoBudget",
        ))
        .stdout(predicate::str::contains(
            "2024-01,Food,2000.00,1000.00,1000.00,OverBudget",
        ));
}

#[test]
fn zero_amount_is_rejected() {
    let dir = initialized();

    tally(&dir)
        .args(["expense", "add", "0", "-c", "Food"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Amount must be greater than zero"));

    let expenses = fs::read_to_string(dir.path().join("data").join("Transactions.csv")).unwrap();
    assert_eq!(expenses.lines().count(), 4);
}

#[test]
fn missing_category_without_classifier_is_rejected() {
    let dir = initialized();

    tally(&dir)
        .args(["expense", "add", "250", "-m", "Uber to airport"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No category suggestion available"));
}

#[test]
fn suggest_without_classifier_prints_no_suggestion() {
    let dir = initialized();

    tally(&dir)
        .args(["suggest", "Zomato order"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No suggestion available."));
}

#[test]
fn budget_set_twice_updates_in_place() {
    let dir = initialized();

    tally(&dir)
        .args(["budget", "set", "Food", "1000", "-m", "2024-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget appended"));
    tally(&dir)
        .args(["budget", "set", "Food", "1200", "-m", "2024-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget updated"));

    let budgets = fs::read_to_string(dir.path().join("data").join("Budgets.csv")).unwrap();
    assert_eq!(budgets.lines().count(), 2);
    assert!(budgets.contains("2024-01,Food,1200.00"));

    tally(&dir)
        .args(["budget", "show", "-m", "2024-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("₹1,200.00"));
}

#[test]
fn budget_grid_skips_zero_entries() {
    let dir = initialized();

    tally(&dir)
        .args(["budget", "grid", "-m", "2024-02", "Food=8000", "Pets=0", "EMI=20,000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food: appended"))
        .stdout(predicate::str::contains("EMI: appended"))
        .stdout(predicate::str::contains("Pets").not());

    tally(&dir)
        .args(["budget", "grid", "-m", "2024-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget grid for February 2024"))
        .stdout(predicate::str::contains("₹20,000.00"));
}

#[test]
fn reports_degrade_when_tables_are_missing() {
    let dir = TempDir::new().unwrap();

    tally(&dir)
        .args(["report", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning: Expenses could not be loaded"))
        .stdout(predicate::str::contains("No expenses for"));
}

#[test]
fn trend_csv_is_outer_joined() {
    let dir = initialized();

    tally(&dir)
        .args(["expense", "add", "100", "-c", "Food", "-d", "2024-01-15"])
        .assert()
        .success();
    tally(&dir)
        .args(["income", "add", "500", "-s", "Salary", "-d", "2024-03-01"])
        .assert()
        .success();

    tally(&dir)
        .args(["report", "trend", "--csv"])
        .assert()
        .success()
        .stdout("Month,Expense,Income\n2024-01,100.00,0.00\n2024-03,0.00,500.00\n");
}
