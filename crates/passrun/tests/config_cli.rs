use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn passrun() -> Command {
    Command::new(env!("CARGO_BIN_EXE_passrun"))
}

#[test]
fn version_flag_reports_the_binary() {
    let output = passrun().arg("--version").output().expect("launch passrun");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("passrun"), "stdout: {stdout}");
}

#[test]
fn rejects_malformed_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("run.toml");
    fs::write(&config, "version = ").unwrap();

    let output = passrun()
        .arg("--config")
        .arg(&config)
        .arg("render")
        .output()
        .expect("launch passrun");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid config") || stderr.contains("failed to parse"),
        "stderr: {stderr}"
    );
}

#[test]
fn rejects_unsupported_config_version() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("run.toml");
    fs::write(&config, "version = 99\n").unwrap();

    let output = passrun()
        .arg("--config")
        .arg(&config)
        .arg("compute")
        .output()
        .expect("launch passrun");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported version 99"), "stderr: {stderr}");
}

#[test]
fn rejects_malformed_size_flag() {
    let output = passrun()
        .args(["--size", "abc", "render"])
        .output()
        .expect("launch passrun");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WIDTHxHEIGHT"), "stderr: {stderr}");
}
