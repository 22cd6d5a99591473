// Black-box CLI runs via the built binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const INPUT: &str = r#"{
  "config": {"num_wishes": 2, "num_assign": 1, "strategy": "greedy"},
  "workshops": [
    {"id": "w1", "title": "Crafts", "capacity": 3},
    {"id": "w2", "title": "Music", "capacity": 2}
  ],
  "participants": [
    {"id": "p1", "wishes": ["w1"]},
    {"id": "p2", "wishes": ["w1", "w2"]},
    {"id": "p3", "wishes": ["w2"]}
  ]
}"#;

fn zt() -> Command {
    Command::cargo_bin("zt").unwrap()
}

#[test]
fn dry_run_prints_summary_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.json");
    fs::write(&input, INPUT).unwrap();

    zt().arg("--input")
        .arg(&input)
        .arg("--seed")
        .arg("42")
        .arg("--out")
        .arg(dir.path())
        .arg("--dry-run")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"seed\":42"))
        .stdout(predicate::str::contains("\"strategy\":\"greedy\""));

    assert!(!dir.path().join("result.json").exists());
    assert!(!dir.path().join("run_record.json").exists());
}

#[test]
fn full_run_writes_result_and_run_record() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.json");
    fs::write(&input, INPUT).unwrap();

    zt().arg("--input")
        .arg(&input)
        .arg("--seed")
        .arg("0x2A")
        .arg("--out")
        .arg(dir.path())
        .arg("--quiet")
        .assert()
        .success();

    let result = fs::read_to_string(dir.path().join("result.json")).unwrap();
    let record = fs::read_to_string(dir.path().join("run_record.json")).unwrap();
    assert!(result.contains("\"id\":\"RES:"));
    assert!(record.contains("\"seed\":42"));
    assert!(record.contains("\"input_sha256\""));
}

#[test]
fn repeat_runs_produce_identical_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.json");
    fs::write(&input, INPUT).unwrap();
    let out_a = dir.path().join("a");
    let out_b = dir.path().join("b");

    for out in [&out_a, &out_b] {
        zt().arg("--input")
            .arg(&input)
            .arg("--out")
            .arg(out)
            .arg("--quiet")
            .assert()
            .success();
    }

    assert_eq!(
        fs::read(out_a.join("result.json")).unwrap(),
        fs::read(out_b.join("result.json")).unwrap()
    );
    assert_eq!(
        fs::read(out_a.join("run_record.json")).unwrap(),
        fs::read(out_b.join("run_record.json")).unwrap()
    );
}

#[test]
fn strategy_override_is_echoed() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.json");
    fs::write(&input, INPUT).unwrap();

    zt().arg("--input")
        .arg(&input)
        .arg("--strategy")
        .arg("solver")
        .arg("--dry-run")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"strategy\":\"solver\""));
}

#[test]
fn missing_input_maps_to_io_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    zt().arg("--input")
        .arg(dir.path().join("nope.json"))
        .arg("--quiet")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("zt: error:"));
}

#[test]
fn invalid_config_maps_to_validation_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.json");
    fs::write(
        &input,
        r#"{"config": {"num_wishes": 0, "num_assign": 1}, "workshops": [], "participants": []}"#,
    )
    .unwrap();

    zt().arg("--input")
        .arg(&input)
        .arg("--quiet")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn bad_seed_token_is_rejected_at_parse_time() {
    zt().arg("--input")
        .arg("whatever.json")
        .arg("--seed")
        .arg("pepper")
        .assert()
        .failure();
}
