use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tailorx::io::{AnalysisConfig, AnalysisReport};

fn testdata_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

fn tailorx() -> Command {
    Command::cargo_bin("tailorx").expect("binary built")
}

#[test]
fn analyze_prints_response_json() {
    tailorx()
        .args(["analyze", "--height", "180", "--gender", "female", "--seed", "5"])
        .arg("--front")
        .arg(testdata_path("front_standing.json"))
        .arg("--side")
        .arg(testdata_path("side_standing.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("\"pecho_polera\""))
        .stdout(predicate::str::contains("78.3"))
        .stdout(predicate::str::contains(
            "Sistema calculó 5 medidas polera y 5 medidas pantalón",
        ));
}

#[test]
fn analyze_without_side_fails_with_input_missing() {
    tailorx()
        .arg("analyze")
        .arg("--front")
        .arg(testdata_path("front_standing.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("\"input_missing\""));
}

#[test]
fn analyze_rejects_negative_height() {
    tailorx()
        .args(["analyze", "--height", "-5"])
        .arg("--front")
        .arg(testdata_path("front_standing.json"))
        .arg("--side")
        .arg(testdata_path("side_standing.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"invalid_height\""));
}

#[test]
fn analyze_rejects_unknown_gender() {
    tailorx()
        .args(["analyze", "--gender", "robot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown gender"));
}

#[test]
fn init_config_then_run_writes_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg_path = dir.path().join("config.json");
    let report_path = dir.path().join("report.json");

    tailorx()
        .arg("init-config")
        .arg("--out")
        .arg(&cfg_path)
        .assert()
        .success();

    let mut cfg = AnalysisConfig::load_json(&cfg_path).expect("template");
    cfg.front_capture = testdata_path("front_standing.json")
        .to_string_lossy()
        .into_owned();
    cfg.side_capture = testdata_path("side_standing.json")
        .to_string_lossy()
        .into_owned();
    cfg.height_cm = 180.0;
    cfg.seed = Some(9);
    cfg.output_path = Some(report_path.to_string_lossy().into_owned());
    cfg.write_json(&cfg_path).expect("write config");

    tailorx()
        .arg("run")
        .arg("--config")
        .arg(&cfg_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sistema calculó 5 medidas polera y 5 medidas pantalón"));

    let report = AnalysisReport::load_json(&report_path).expect("report");
    assert!(report.error.is_none());
    assert_eq!(report.side_landmarks_detected, Some(10));
    let key = report.key_landmarks.expect("key landmarks");
    assert_eq!(key.len(), 15);
    let response = report.response.expect("response");
    assert!(response.success);
    assert_eq!(response.landmarks_detected, Some(33));
}

#[test]
fn run_records_errors_in_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg_path = dir.path().join("config.json");
    let report_path = dir.path().join("report.json");

    let mut cfg = AnalysisConfig::new(
        testdata_path("front_standing.json").to_string_lossy(),
        dir.path().join("missing.json").to_string_lossy(),
    );
    cfg.output_path = Some(report_path.to_string_lossy().into_owned());
    cfg.write_json(&cfg_path).expect("write config");

    tailorx()
        .arg("run")
        .arg("--config")
        .arg(&cfg_path)
        .assert()
        .failure();

    let report = AnalysisReport::load_json(&report_path).expect("report");
    assert!(report.error.is_some());
    let response = report.response.expect("response");
    assert_eq!(response.error.as_deref(), Some("processing_error"));
}

#[test]
fn info_describes_the_service() {
    tailorx()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"OK\""))
        .stdout(predicate::str::contains("\"model_complexity\": 2"));
}
