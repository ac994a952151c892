use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const STATEMENT: &str = "9334 דראקרטסמ ימואל סיטרכל\n\
                         12,345.00 בויח םוכס\n\
                         10.00 הליגר הקסע 10.00 Cafe Joe 05/01/24\n\
                         42.00 הליגר הקסע 42.00 WOLT TLV 20/01/24\n\
                         \u{000C}33.00 הליגר הקסע 33.00 Bad Date 31/02/24\n";

/// `cardstmt` isolated from the user's configuration directory.
fn cardstmt(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cardstmt").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"));
    cmd
}

fn write_statement(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("statement.txt");
    fs::write(&path, STATEMENT).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn convert_text_statement() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(&dir);
    let rules = dir.path().join("rules.json");
    fs::write(&rules, r#"{"cafe": "Restaurants"}"#).unwrap();
    let output = dir.path().join("out.json");

    cardstmt(&dir)
        .arg("convert")
        .arg(&input)
        .arg("-r")
        .arg(&rules)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 2 transactions"))
        .stdout(predicate::str::contains("Card: 9334"))
        .stdout(predicate::str::contains("Skipped 1 transaction(s) with invalid dates"))
        .stdout(predicate::str::contains(
            "Scanned 5 lines on 2 page(s): 1 header/total, 1 unrecognized",
        ))
        .stdout(predicate::str::contains("Skipped 1 transaction(s) in total"))
        .stdout(predicate::str::contains("Uncategorized: 1"))
        .stdout(predicate::str::contains("Restaurants: 1"));

    let expenses = read_json(&output);
    let expenses = expenses.as_array().unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0]["merchant"], "WOLT TLV");
    assert_eq!(expenses[0]["date"], "2024-01-20");
    assert_eq!(expenses[0]["category"], "Uncategorized");
    assert_eq!(expenses[0]["amount"], 42.0);
    assert_eq!(expenses[1]["category"], "Restaurants");
    assert_eq!(expenses[1]["month"], "January");
    assert_eq!(expenses[1]["year"], 2024);
    assert_eq!(expenses[1]["card"], "9334");
}

#[test]
fn convert_defaults_to_expenses_converted_json() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(&dir);

    cardstmt(&dir).arg("convert").arg(&input).assert().success();

    assert!(dir.path().join("expenses_converted.json").exists());
}

#[test]
fn convert_missing_input_exits_cleanly() {
    let dir = TempDir::new().unwrap();

    cardstmt(&dir)
        .args(["convert", "nope.pdf"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Statement file not found"));

    assert!(!dir.path().join("expenses_converted.json").exists());
}

#[test]
fn convert_rejects_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("statement.docx");
    fs::write(&input, "whatever").unwrap();

    cardstmt(&dir)
        .arg("convert")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn convert_interactive_persists_rule() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(&dir);
    let rules = dir.path().join("rules.json");
    fs::write(&rules, r#"{"cafe": "Restaurants"}"#).unwrap();

    cardstmt(&dir)
        .arg("convert")
        .arg(&input)
        .arg("-r")
        .arg(&rules)
        .arg("-i")
        .write_stdin("3\nwolt\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(">> New merchant:"))
        .stdout(predicate::str::contains("Added 1 new categorization rule(s)"));

    let saved = read_json(&rules);
    let keys: Vec<&String> = saved.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["cafe", "wolt"]);
    assert_eq!(saved["wolt"], "Food Delivery");

    let expenses = read_json(&dir.path().join("expenses_converted.json"));
    assert_eq!(expenses[0]["category"], "Food Delivery");
}

#[test]
fn convert_interactive_reports_closed_input() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(&dir);
    let rules = dir.path().join("rules.json");
    fs::write(&rules, r#"{"cafe": "Restaurants"}"#).unwrap();

    cardstmt(&dir)
        .arg("convert")
        .arg(&input)
        .arg("-r")
        .arg(&rules)
        .arg("-i")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Interactive categorization stopped early after 1 merchant(s)",
        ))
        .stdout(predicate::str::contains("Uncategorized: 1"));

    let saved = read_json(&rules);
    assert_eq!(saved.as_object().unwrap().len(), 1);
}

#[test]
fn convert_csv_pads_amounts_to_two_decimals() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("statement.txt");
    fs::write(
        &input,
        "9334 הזיו ימואל סיטרכל\n\
         42.5 הליגר הקסע 42.5 WOLT TLV 20/01/24\n\
         1,000 הליגר הקסע 1,000 IKEA 19/01/24\n",
    )
    .unwrap();
    let output = dir.path().join("out.csv");

    cardstmt(&dir)
        .arg("convert")
        .arg(&input)
        .args(["-f", "csv", "-o"])
        .arg(&output)
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[1], "2024-01-20,WOLT TLV,42.50,Uncategorized,January,2024,9334");
    assert_eq!(lines[2], "2024-01-19,IKEA,1000.00,Uncategorized,January,2024,9334");
}

#[test]
fn convert_csv_output() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(&dir);
    let output = dir.path().join("out.csv");

    cardstmt(&dir)
        .arg("convert")
        .arg(&input)
        .args(["-f", "csv", "-o"])
        .arg(&output)
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("date,merchant,amount,category,month,year,card"));
    assert_eq!(
        lines.next(),
        Some("2024-01-20,WOLT TLV,42.00,Uncategorized,January,2024,9334")
    );
}

#[test]
fn migrate_legacy_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("expenses.json");
    fs::write(
        &input,
        r#"[
            {"date": "28/11/25", "merchant": "Wolt", "amount": 42.5, "category": "Food Delivery"},
            {"date": "not a date", "merchant": "Broken"},
            {"merchant": "No date"}
        ]"#,
    )
    .unwrap();

    cardstmt(&dir)
        .arg("migrate")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 transactions converted."))
        .stdout(predicate::str::contains("Skipped 2 invalid entries."));

    let migrated = read_json(&dir.path().join("expenses_v2.json"));
    assert_eq!(migrated[0]["date"], "2025-11-28");
    assert_eq!(migrated[0]["month"], "November");
    assert_eq!(migrated[0]["year"], 2025);
}

#[test]
fn migrate_rejects_non_array() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("expenses.json");
    fs::write(&input, r#"{"date": "28/11/25"}"#).unwrap();

    cardstmt(&dir).arg("migrate").arg(&input).assert().failure();
}

#[test]
fn rules_add_list_and_classify() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("rules.json");

    cardstmt(&dir)
        .args(["rules", "add", "Shufersal", "Groceries", "-r"])
        .arg(&rules)
        .assert()
        .success();

    cardstmt(&dir)
        .args(["rules", "add", "shufersal", "Shopping", "-r"])
        .arg(&rules)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cardstmt(&dir)
        .args(["rules", "list", "-r"])
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Shufersal -> Groceries"));

    cardstmt(&dir)
        .args(["rules", "classify", "SHUFERSAL DEAL", "-r"])
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries (keyword: Shufersal)"));
}

#[test]
fn rules_default_to_config_directory() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("conf").join("config.json");

    cardstmt(&dir)
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    cardstmt(&dir)
        .arg("-c")
        .arg(&config)
        .args(["rules", "add", "Paz", "Transportation"])
        .assert()
        .success();

    let saved = read_json(&dir.path().join("conf").join("category_rules.json"));
    assert_eq!(saved["Paz"], "Transportation");
}

#[test]
fn inspect_text_statement() {
    let dir = TempDir::new().unwrap();
    let input = write_statement(&dir);

    cardstmt(&dir)
        .arg("inspect")
        .arg(&input)
        .args(["--pages", "1", "--chars", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total pages: 2"))
        .stdout(predicate::str::contains("PAGE 1"))
        .stdout(predicate::str::contains("PAGE 2").not());
}

#[test]
fn config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    cardstmt(&dir)
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "output.path", "december.json"])
        .assert()
        .success();

    cardstmt(&dir)
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "output.path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("december.json"));

    cardstmt(&dir)
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "output.nonexistent", "1"])
        .assert()
        .failure();
}
