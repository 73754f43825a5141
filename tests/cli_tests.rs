use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run(dir: &Path, args: &[&str], secret: Option<&str>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tvbridge"));
    command
        .args(args)
        .current_dir(dir)
        .env_remove("PORT")
        .env_remove("RUST_LOG");
    match secret {
        Some(secret) => command.env("BRIDGE_PASSWORD", secret),
        None => command.env_remove("BRIDGE_PASSWORD"),
    };
    command.output().expect("run tvbridge")
}

fn combined(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn check_config_accepts_defaults() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["check", "config"], Some("pw"));

    let text = combined(&output);
    assert!(output.status.success(), "unexpected failure:\n{text}");
    assert!(text.contains("0.0.0.0:5000"), "missing bind address:\n{text}");
}

#[test]
fn check_config_fails_without_secret() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["check", "config"], None);

    assert!(!output.status.success(), "Expected nonzero exit code");
    assert!(combined(&output).contains("BRIDGE_PASSWORD"));
}

#[test]
fn check_config_reports_invalid_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[relay]\ndefault_risk = -3.0\n").unwrap();

    let output = run(
        dir.path(),
        &["check", "config", "--config", path.to_str().unwrap()],
        Some("pw"),
    );

    assert!(!output.status.success(), "Expected nonzero exit code");
    assert!(combined(&output).contains("relay.default_risk"));
}

#[test]
fn mappings_lists_config_aliases() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[relay]\npersist = false\n\n[symbols]\nNQ = \"NAS100.cash\"\n",
    )
    .unwrap();

    let output = run(dir.path(), &["mappings"], Some("pw"));

    let text = combined(&output);
    assert!(output.status.success(), "unexpected failure:\n{text}");
    assert!(text.contains("NAS100.cash"));
    assert!(text.contains("XAUUSD"));
    assert!(text.contains("config"));
}
