//! End-to-end tests for the `kiln` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn kiln(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kiln").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("KILN_WATCHDOG_INTERVAL_MS")
        .env_remove("KILN_PROGRESS_INTERVAL_MS")
        .env_remove("KILN_PROGRESS")
        .arg("--no-color");
    cmd
}

const SNAPSHOT: &str = r#"{
    "startTime": 1700000000000,
    "assets": [
        { "path": "app/assets/logo.png", "copyTime": 1700000000005 },
        { "path": "app/assets/old.png", "copyTime": 1699999000000 }
    ],
    "generatedFiles": [
        {
            "path": "public/app.js",
            "sourceFiles": [
                { "path": "app/main.js", "compilationTime": 1700000000001 },
                { "path": "app/lib.js", "compilationTime": 1699999000000 },
                { "path": "app/view.js", "compilationTime": 1699999000000 }
            ]
        },
        {
            "path": "public/vendor.js",
            "sourceFiles": [{ "path": "vendor/jquery.js", "compilationTime": 1699999000000 }]
        }
    ],
    "disposed": { "generated": [], "sourcePaths": [] }
}"#;

#[test]
fn test_summarize_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pass.json"), SNAPSHOT).unwrap();

    kiln(&dir)
        .args(["summarize", "pass.json", "--now-ms", "1700000000420"])
        .assert()
        .success()
        .stdout("compiled main.js and 2 cached files into app.js, copied logo.png in 420 ms\n");
}

#[test]
fn test_summarize_stdin() {
    let dir = TempDir::new().unwrap();

    kiln(&dir)
        .args(["summarize", "-", "--now-ms", "1700000002000"])
        .write_stdin(r#"{ "startTime": 1700000000000, "disposed": { "sourcePaths": ["app/gone.js"] } }"#)
        .assert()
        .success()
        .stdout("removed app/gone.js in 2.0 sec\n");
}

#[test]
fn test_summarize_missing_file() {
    let dir = TempDir::new().unwrap();

    kiln(&dir)
        .args(["summarize", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found: missing.json"));
}

#[test]
fn test_summarize_invalid_snapshot() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pass.json"), r#"{ "startTime": "yesterday" }"#).unwrap();

    kiln(&dir)
        .args(["summarize", "pass.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pass snapshot"));
}

#[test]
fn test_summarize_warns_about_malformed_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("kiln.toml"), "watchdog_interval_ms = \"soon\"\n").unwrap();

    kiln(&dir)
        .args(["summarize", "-", "--now-ms", "1700000000012"])
        .write_stdin(r#"{ "startTime": 1700000000000 }"#)
        .assert()
        .success()
        .stdout("compiled in 12 ms\n")
        .stderr(predicate::str::contains("ignoring kiln config"));
}

#[test]
fn test_config_defaults() {
    let dir = TempDir::new().unwrap();

    kiln(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""watchdog_interval_ms": 15000"#))
        .stdout(predicate::str::contains(r#""progress_interval_ms": 4000"#))
        .stderr(predicate::str::contains("using defaults"));
}

#[test]
fn test_config_package_json_and_env_override() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "web", "kiln": { "progress": false, "progress_interval_ms": 250 } }"#,
    )
    .unwrap();

    kiln(&dir)
        .env("KILN_PROGRESS_INTERVAL_MS", "1000")
        .args(["config", "--root", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""progress": false"#))
        .stdout(predicate::str::contains(r#""progress_interval_ms": 1000"#))
        .stderr(predicate::str::contains("package.json"));
}

#[test]
fn test_config_rejects_zero_interval() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("kiln.toml"), "watchdog_interval_ms = 0\n").unwrap();

    kiln(&dir)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("watchdog_interval_ms"));
}

#[test]
fn test_config_schema() {
    let dir = TempDir::new().unwrap();

    kiln(&dir)
        .args(["config", "--schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ReporterConfig"))
        .stdout(predicate::str::contains("watchdog_interval_ms"));
}
