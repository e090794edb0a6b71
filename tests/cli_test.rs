//! Integration tests for the brewmon binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn brewmon() -> Command {
    let mut cmd = Command::new(cargo_bin("brewmon"));
    for var in [
        "BREWMON_WEBHOOK_URL",
        "EARTHLY_ALERT_WEBHOOK",
        "BREWMON_FORMULA",
        "BREWMON_API_BASE",
        "BREWMON_MARKER",
        "BREWMON_INSTALL_COMMAND",
        "BREWMON_VERSION_COMMAND",
        "BREWMON_SMOKE_COMMAND",
        "BREWMON_STEP_TIMEOUT_SECS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn marker_with(temp: &TempDir, version: &str) -> PathBuf {
    let path = temp.path().join("last-check");
    fs::write(&path, version).unwrap();
    path
}

/// A `--once` invocation against `server` with harmless step commands.
fn once_against(server: &MockServer, marker: &PathBuf, install: &str) -> Command {
    let mut cmd = brewmon();
    cmd.env("BREWMON_WEBHOOK_URL", server.url("/hook"))
        .arg("--once")
        .arg("--api-base")
        .arg(server.url("/api/formula"))
        .arg("--marker")
        .arg(marker)
        .args(["--install-command", install])
        .args(["--version-command", "echo earthly version v1.2.3"])
        .args(["--smoke-command", "echo smoke ok"]);
    cmd
}

fn mock_registry<'a>(server: &'a MockServer, stable: &str) -> httpmock::Mock<'a> {
    let body = format!(r#"{{"name":"earthly","versions":{{"stable":"{}"}}}}"#, stable);
    server.mock(|when, then| {
        when.method(GET).path("/api/formula/earthly.json");
        then.status(200)
            .header("content-type", "application/json")
            .body(body);
    })
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = brewmon();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Watch a Homebrew formula"))
        .stdout(predicate::str::contains("--webhook-url"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = brewmon();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_webhook() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = brewmon();
    cmd.arg("--once");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("BREWMON_WEBHOOK_URL"));
    Ok(())
}

#[test]
fn cli_rejects_zero_interval() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = brewmon();
    cmd.env("BREWMON_WEBHOOK_URL", "https://hooks.example.com/x")
        .args(["--interval-secs", "0"]);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("interval"));
    Ok(())
}

#[test]
fn cli_rejects_unknown_flag() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = brewmon();
    cmd.arg("--no-such-flag");
    cmd.assert().failure();
    Ok(())
}

#[cfg(unix)]
#[test]
fn once_with_tested_version_does_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let registry = mock_registry(&server, "1.2.3");
    let hook = server.mock(|when, then| {
        when.method(POST).path("/hook");
        then.status(200).body("ok");
    });
    let temp = TempDir::new()?;
    let marker = marker_with(&temp, "1.2.3");

    once_against(&server, &marker, "echo upgraded")
        .assert()
        .success()
        .stderr(predicate::str::contains("already been tested"));

    registry.assert();
    hook.assert_calls(0);
    assert_eq!(fs::read_to_string(&marker)?, "1.2.3");
    Ok(())
}

#[cfg(unix)]
#[test]
fn once_reads_legacy_webhook_variable() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    mock_registry(&server, "1.2.3");
    let hook = server.mock(|when, then| {
        when.method(POST).path("/legacy-hook");
        then.status(200).body("ok");
    });
    let temp = TempDir::new()?;
    let marker = marker_with(&temp, "1.2.2");

    let mut cmd = once_against(&server, &marker, "echo upgraded");
    cmd.env_remove("BREWMON_WEBHOOK_URL")
        .env("EARTHLY_ALERT_WEBHOOK", server.url("/legacy-hook"));
    cmd.assert().success();

    hook.assert();
    assert_eq!(fs::read_to_string(&marker)?, "1.2.3");
    Ok(())
}

#[cfg(unix)]
#[test]
fn once_with_new_version_notifies_and_records() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    mock_registry(&server, "1.2.3");
    let hook = server.mock(|when, then| {
        when.method(POST)
            .path("/hook")
            .header("content-type", "application/json");
        then.status(200).body("ok");
    });
    let temp = TempDir::new()?;
    let marker = marker_with(&temp, "1.2.2");

    once_against(&server, &marker, "echo upgraded")
        .assert()
        .success();

    hook.assert();
    assert_eq!(fs::read_to_string(&marker)?, "1.2.3");
    Ok(())
}

#[cfg(unix)]
#[test]
fn once_with_failed_install_still_records() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    mock_registry(&server, "1.2.3");
    let hook = server.mock(|when, then| {
        when.method(POST).path("/hook");
        then.status(200).body("ok");
    });
    let temp = TempDir::new()?;
    let marker = marker_with(&temp, "1.2.2");

    once_against(&server, &marker, "echo broken; exit 1")
        .assert()
        .success()
        .stderr(predicate::str::contains("failed"));

    hook.assert();
    assert_eq!(fs::read_to_string(&marker)?, "1.2.3");
    Ok(())
}

#[cfg(unix)]
#[test]
fn once_with_rejected_webhook_keeps_marker() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    mock_registry(&server, "1.2.3");
    let hook = server.mock(|when, then| {
        when.method(POST).path("/hook");
        then.status(500).body("invalid_payload");
    });
    let temp = TempDir::new()?;
    let marker = marker_with(&temp, "1.2.2");

    once_against(&server, &marker, "echo upgraded")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("500"));

    hook.assert();
    assert_eq!(fs::read_to_string(&marker)?, "1.2.2");
    Ok(())
}

#[test]
fn once_with_registry_error_exits_nonzero() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/formula/earthly.json");
        then.status(503).body("unavailable");
    });
    let temp = TempDir::new()?;
    let marker = marker_with(&temp, "1.2.2");

    once_against(&server, &marker, "echo upgraded")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("503"));

    assert_eq!(fs::read_to_string(&marker)?, "1.2.2");
    Ok(())
}
