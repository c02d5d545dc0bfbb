//! Integration tests for the BFT CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a bft command isolated from the user's config
fn bft(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bft").unwrap();
    cmd.env("BFT_CONFIG_DIR", config_dir.path())
        .env_remove("BFT_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to run `bft calc` with the two-factory example and a format
fn calc_example(tmp: &TempDir, format: &str) -> String {
    let output = bft(tmp)
        .args([
            "calc",
            "-F",
            "F1=60,5",
            "-F",
            "F2=40%,10%",
            "--format",
            format,
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).to_string()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("defective (or sound) part"))
        .stdout(predicate::str::contains("calc"))
        .stdout(predicate::str::contains("session"));
}

#[test]
fn test_short_help_shows_name() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bayes Factory Toolkit"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bft"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp).arg("bogus").assert().failure();
}

// ============================================================================
// Calc Tests
// ============================================================================

#[test]
fn test_calc_two_factory_example() {
    let tmp = TempDir::new().unwrap();
    let stdout = calc_example(&tmp, "tsv");

    assert!(stdout.contains("P(F|D)"));
    assert!(stdout.contains("95.00%"));
    assert!(stdout.contains("90.00%"));
    assert!(stdout.contains("42.86%"));
    assert!(stdout.contains("57.14%"));
    assert!(stdout.contains("P(D) = 7.00%"));
    assert!(stdout.contains("P(ND) = 93.00%"));
}

#[test]
fn test_calc_auto_format_is_tsv() {
    let tmp = TempDir::new().unwrap();
    let stdout = calc_example(&tmp, "auto");
    assert!(stdout.contains("FACTORY"));
    assert!(stdout.contains("2 factory(ies)"));
}

#[test]
fn test_calc_invalid_sum_reports_status() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["calc", "-F", "F1=40,5", "-F", "F2=40,10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shares must sum to 100%"))
        .stdout(predicate::str::contains("80.00%"))
        .stdout(predicate::str::contains("42.86%").not());
}

#[test]
fn test_calc_strict_fails_on_invalid_sum() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["calc", "--strict", "-F", "F1=40,5", "-F", "F2=40,10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not 100%"));
}

#[test]
fn test_calc_strict_passes_on_valid_sum() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["calc", "--strict", "-F", "F1=60,5", "-F", "F2=40,10"])
        .assert()
        .success();
}

#[test]
fn test_calc_json_report() {
    let tmp = TempDir::new().unwrap();
    let stdout = calc_example(&tmp, "json");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(json["status"], "ok");
    assert_eq!(json["total_share"], "100.00%");
    assert_eq!(json["p_defect"], "7.00%");
    assert_eq!(json["factories"][0]["factory_given_defect"], "42.86%");
    assert_eq!(json["factories"][1]["factory_given_defect"], "57.14%");
    assert_eq!(json["factories"][1]["production_share"], "40%");
}

#[test]
fn test_calc_json_invalid_has_null_derived() {
    let tmp = TempDir::new().unwrap();
    let output = bft(&tmp)
        .args(["calc", "-f", "json", "-F", "F1=40,5", "-F", "F2=40,10"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(json["status"], "invalid_sum");
    assert_eq!(json["message"], "shares must sum to 100%");
    assert!(json["factories"][0]["non_defect_rate"].is_null());
    assert!(json["p_defect"].is_null());
}

#[test]
fn test_calc_csv_output() {
    let tmp = TempDir::new().unwrap();
    let stdout = calc_example(&tmp, "csv");
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("row,name,production_share"));
    assert_eq!(lines[1], "1,F1,60%,5%,95.00%,42.86%,61.29%");
    assert_eq!(lines[2], "2,F2,40%,10%,90.00%,57.14%,38.71%");
}

#[test]
fn test_calc_markdown_output() {
    let tmp = TempDir::new().unwrap();
    let stdout = calc_example(&tmp, "md");
    assert!(stdout.contains("| # "));
    assert!(stdout.contains("P(F|ND)"));
    assert!(stdout.contains("61.29%"));
}

#[test]
fn test_calc_yaml_output() {
    let tmp = TempDir::new().unwrap();
    let stdout = calc_example(&tmp, "yaml");
    assert!(stdout.contains("status: ok"));
    assert!(stdout.contains("factory_given_defect: '42.86%'")
        || stdout.contains("factory_given_defect: \"42.86%\""));
}

#[test]
fn test_calc_without_factories_fails() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .arg("calc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No factories given"));
}

#[test]
fn test_calc_rejects_malformed_factory_flag() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["calc", "-F", "F1:60:5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME=SHARE,DEFECT"));
}

#[test]
fn test_calc_rejects_out_of_range_share() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["calc", "-F", "F1=160,5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rejected"));
}

#[test]
fn test_calc_single_factory_full_share() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["calc", "-f", "csv", "-F", "Solo=100,3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1,Solo,100%,3%,97.00%,100.00%,100.00%"));
}

// ============================================================================
// Scenario File Tests
// ============================================================================

#[test]
fn test_calc_from_yaml_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("plants.yaml");
    fs::write(
        &path,
        "factories:\n  - name: North\n    share: 60%\n    defect: 5\n  - name: South\n    share: 40\n    defect: 10%\n",
    )
    .unwrap();

    bft(&tmp)
        .args(["calc", "-f", "csv", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1,North,60%,5%,95.00%,42.86%"))
        .stdout(predicate::str::contains("2,South,40%,10%,90.00%,57.14%"));
}

#[test]
fn test_calc_from_csv_file_with_extra_flag() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("plants.csv");
    fs::write(&path, "name,share,defect\nNorth,50,5\nSouth,30,10\n").unwrap();

    bft(&tmp)
        .args(["calc", "-f", "csv", "--file"])
        .arg(&path)
        .args(["-F", "East=20,2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3,East,20%,2%,98.00%"));
}

#[test]
fn test_calc_from_file_with_empty_name_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("plants.csv");
    fs::write(&path, "name,share,defect\nNorth,50,5\n,50,10\n").unwrap();

    bft(&tmp)
        .args(["calc", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("factory #2"));
}

#[test]
fn test_calc_from_malformed_yaml_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("plants.yaml");
    fs::write(&path, "factories:\n  - name: North\n    share: 60\n").unwrap();

    bft(&tmp)
        .args(["calc", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("defect"));
}

#[test]
fn test_calc_from_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["calc", "--file", "does-not-exist.yaml"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_keys_lists_keys() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_format"))
        .stdout(predicate::str::contains("confirm_delete"));
}

#[test]
fn test_config_path_uses_config_dir() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"));
}

#[test]
fn test_config_default_format_applies_to_calc() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["config", "set", "default_format", "json"])
        .assert()
        .success();

    assert!(tmp.path().join("config.yaml").exists());

    let stdout = calc_example(&tmp, "auto");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["status"], "ok");

    // An explicit format still wins
    let stdout = calc_example(&tmp, "csv");
    assert!(stdout.starts_with("row,name"));
}

#[test]
fn test_config_show_and_unset() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["config", "set", "confirm_delete", "false"])
        .assert()
        .success();

    bft(&tmp)
        .args(["config", "show", "confirm_delete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));

    bft(&tmp)
        .args(["config", "unset", "confirm_delete"])
        .assert()
        .success();

    bft(&tmp)
        .args(["config", "show", "confirm_delete"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not set"));
}

#[test]
fn test_config_set_rejects_bad_values() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["config", "set", "default_format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an output format"));

    bft(&tmp)
        .args(["config", "set", "colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_env_format_overrides_config_file() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["config", "set", "default_format", "json"])
        .assert()
        .success();

    bft(&tmp)
        .env("BFT_FORMAT", "csv")
        .args(["calc", "-F", "F1=100,1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("row,name"));
}

// ============================================================================
// Misc Command Tests
// ============================================================================

#[test]
fn test_columns_describes_every_column() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .arg("columns")
        .assert()
        .success()
        .stdout(predicate::str::contains("P(F|D)"))
        .stdout(predicate::str::contains("defective part came from this factory"))
        .stdout(predicate::str::contains("must add up to 100%"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bft"));
}

#[test]
fn test_session_requires_terminal() {
    let tmp = TempDir::new().unwrap();
    bft(&tmp)
        .arg("session")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}
