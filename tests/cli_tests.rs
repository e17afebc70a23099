use std::io::Write;
use std::process::{Command, Output};

use serde_json::Value;

fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("kitchenline-cli-test-")
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

fn kitchenline(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kitchenline"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run kitchenline")
}

const SEED: &str = r#"[
  {"id": "late-one", "status": "pending", "type": "food", "placedMinutesAgo": 30, "tableNumber": 3},
  {"id": "fresh-one", "status": "pending", "type": "food", "placedMinutesAgo": 2, "kitchenEstimatedTime": 8},
  {"id": "cooking", "status": "preparing", "type": "food", "placedMinutesAgo": 5,
   "timeStartedPreparing": "2026-01-05T18:00:00Z", "preparedByCookId": "cook-1", "seenByKitchen": true},
  {"id": "a-drink", "status": "pending", "type": "drink", "placedMinutesAgo": 1}
]"#;

#[test]
fn board_prints_queues_as_json() {
    let config = temp_file(".toml", "[notifications]\nbell = false\nlog = false\n");
    let seed = temp_file(".json", SEED);

    let output = kitchenline(&[
        "board",
        "--config",
        config.path().to_str().unwrap(),
        "--seed",
        seed.path().to_str().unwrap(),
        "--json",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let board: Value = serde_json::from_slice(&output.stdout).expect("JSON board");
    let new_ids: Vec<&str> = board["new"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["order"]["id"].as_str().unwrap())
        .collect();
    assert_eq!(new_ids, vec!["fresh-one", "late-one"], "newest first");
    assert_eq!(board["new"][1]["overdue"], true);
    assert_eq!(board["inProgress"][0]["order"]["id"], "cooking");
    assert_eq!(board["ready"].as_array().map(Vec::len), Some(0));
}

#[test]
fn board_overdue_only_filter() {
    let seed = temp_file(".json", SEED);
    let config = temp_file(".toml", "");

    let output = kitchenline(&[
        "board",
        "--config",
        config.path().to_str().unwrap(),
        "--seed",
        seed.path().to_str().unwrap(),
        "--overdue-only",
        "--json",
    ]);
    assert!(output.status.success());

    let board: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(board["new"].as_array().map(Vec::len), Some(1));
    assert_eq!(board["new"][0]["order"]["id"], "late-one");
    assert_eq!(board["inProgress"].as_array().map(Vec::len), Some(0));
}

#[test]
fn board_renders_queue_titles() {
    let seed = temp_file(".json", SEED);
    let config = temp_file(".toml", "");

    let output = kitchenline(&[
        "board",
        "--config",
        config.path().to_str().unwrap(),
        "--seed",
        seed.path().to_str().unwrap(),
        "--sort",
        "eta_asc",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("New Food Orders (2)"), "stdout: {stdout}");
    assert!(stdout.contains("Food Orders In Progress (1)"));
    assert!(stdout.contains("Food Orders Ready for Pickup (0)"));
    assert!(stdout.contains("OVERDUE"));
}

#[test]
fn cli_returns_nonzero_on_config_error() {
    let config = temp_file(".toml", "[kitchen]\noverdue_threshold_minutes = 0\n");

    let output = kitchenline(&["check", "config", "--config", config.path().to_str().unwrap()]);
    assert!(!output.status.success(), "Expected nonzero exit code");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{stdout}{stderr}");
    assert!(
        combined.contains("overdue_threshold_minutes"),
        "Expected error message about invalid config.\nstdout: {stdout}\nstderr: {stderr}"
    );
}

#[test]
fn check_config_accepts_valid_file() {
    let config = temp_file(".toml", "[kitchen]\ndefault_sort = \"eta_asc\"\n");

    let output = kitchenline(&["check", "config", "--config", config.path().to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration file is valid"));
    assert!(stdout.contains("eta_asc"));
}

#[test]
fn run_applies_stdin_commands() {
    let seed = temp_file(".json", SEED);
    let config = temp_file(".toml", "[notifications]\nbell = false\nlog = false\n");

    let mut child = Command::new(env!("CARGO_BIN_EXE_kitchenline"))
        .args([
            "run",
            "--config",
            config.path().to_str().unwrap(),
            "--seed",
            seed.path().to_str().unwrap(),
            "--actor",
            "cook-9",
            "--log-level",
            "error",
        ])
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .expect("spawn kitchenline");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"start late\neta fresh 0\nready late-one\ndetails fresh\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Order late-o marked Preparing"), "stdout: {stdout}");
    assert!(stderr.contains("at least one minute"), "stderr: {stderr}");
    assert!(stdout.contains("Prep started"), "stdout: {stdout}");
    assert!(stdout.contains("Kitchen ETA"), "stdout: {stdout}");
}
