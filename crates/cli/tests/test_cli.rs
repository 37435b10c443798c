use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

fn sqrtbench() -> Command {
    let mut cmd = Command::cargo_bin("sqrtbench").expect("binary built");
    cmd.env_remove("RUST_LOG").env_remove("SQRTBENCH_COUNT");
    cmd
}

#[test]
fn cli_prints_five_line_report() {
    let output = sqrtbench().args(["-n", "17"]).output().expect("run ok");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 5, "{}", stdout);
    assert_eq!(lines[0], "calculation of sqrt(n) for n in 1 to 17");
    assert!(lines[1].starts_with("Normal: "));
    assert!(lines[2].starts_with("SSE 128-bit: "));
    assert!(lines[3].starts_with("AVX 256-bit: "));
    assert!(lines[4].starts_with("AVX 512-bit: "));
}

#[test]
fn cli_count_one_succeeds() {
    sqrtbench()
        .args(["--count", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "calculation of sqrt(n) for n in 1 to 1\nNormal: ",
        ));
}

#[test]
fn cli_env_count_and_flag_precedence() {
    sqrtbench()
        .env("SQRTBENCH_COUNT", "33")
        .assert()
        .success()
        .stdout(predicate::str::contains("for n in 1 to 33\n"));

    sqrtbench()
        .env("SQRTBENCH_COUNT", "33")
        .args(["-n", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("for n in 1 to 9\n"));
}

#[test]
fn cli_bad_env_count_fails() {
    sqrtbench()
        .env("SQRTBENCH_COUNT", "lots")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SQRTBENCH_COUNT"));
}

#[test]
fn cli_json_report() {
    let output = sqrtbench()
        .args(["-n", "100", "--format", "json"])
        .output()
        .expect("run ok");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["count"], 100);
    let passes = value["passes"].as_array().unwrap();
    assert_eq!(passes.len(), 4);
    for pass in passes {
        assert_eq!(pass["evaluations"], 99);
    }
}

#[test]
fn cli_reads_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "count = 65").unwrap();
    writeln!(file, "unsupported = \"skip\"").unwrap();

    sqrtbench()
        .arg("--config")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("for n in 1 to 65\n"));
}

#[test]
fn cli_missing_config_fails() {
    sqrtbench()
        .args(["--config", "/definitely/not/here.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn cli_logs_stay_off_stdout() {
    let output = sqrtbench()
        .args(["-n", "17", "--log-level", "debug", "--json-logs"])
        .output()
        .expect("run ok");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 5);
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("pass finished"));
}
