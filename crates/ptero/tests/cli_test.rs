//! Integration tests for the `ptero` CLI binary.
//!
//! Argument parsing, help output, completions and configuration run without a
//! panel; request-driven commands run against a wiremock panel.
#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `ptero` binary with env isolation.
///
/// Clears all `PTERO_*` env vars and points config directories at `home`
/// so tests never touch the user's real configuration.
fn ptero_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ptero");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("PTERO_PROFILE")
        .env_remove("PTERO_HOST")
        .env_remove("PTERO_API_KEY")
        .env_remove("PTERO_APPLICATION_KEY")
        .env_remove("PTERO_OUTPUT")
        .env_remove("PTERO_INSECURE")
        .env_remove("PTERO_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn isolated() -> (tempfile::TempDir, assert_cmd::Command) {
    let home = tempfile::tempdir().unwrap();
    let cmd = ptero_cmd(home.path());
    (home, cmd)
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary against `mock` off the async runtime.
async fn run_against(mock: &MockServer, args: &[&str]) -> Output {
    let home = tempfile::tempdir().unwrap();
    let mut cmd = ptero_cmd(home.path());
    cmd.args(["--host", &mock.uri(), "--api-key", "ptlc_cli_key"])
        .args(args);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();
    drop(home);
    output
}

fn server_json(identifier: &str, name: &str) -> serde_json::Value {
    json!({
        "object": "server",
        "attributes": {
            "server_owner": true,
            "identifier": identifier,
            "internal_id": 3,
            "uuid": format!("{identifier}-0000-4000-8000-000000000000"),
            "name": name,
            "node": "node-1",
            "sftp_details": { "ip": "sftp.example.com", "port": 2022 },
            "description": "",
            "limits": {
                "memory": 2048, "swap": 0, "disk": 10240, "io": 500,
                "cpu": 100, "threads": null, "oom_disabled": true
            },
            "invocation": "java -jar server.jar",
            "docker_image": "ghcr.io/pterodactyl/yolks:java_17",
            "egg_features": [],
            "feature_limits": { "databases": 0, "allocations": 1, "backups": 2 },
            "status": null,
            "is_suspended": false,
            "is_installing": false,
            "is_transferring": false,
            "relationships": {
                "allocations": {
                    "object": "list",
                    "data": [{
                        "object": "allocation",
                        "attributes": {
                            "id": 1, "ip": "10.0.0.5", "ip_alias": null,
                            "port": 25565, "notes": null, "is_default": true
                        }
                    }]
                }
            }
        }
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_home, mut cmd) = isolated();
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let (_home, mut cmd) = isolated();
    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("Pterodactyl")
            .and(predicate::str::contains("servers"))
            .and(predicate::str::contains("backups"))
            .and(predicate::str::contains("console")),
    );
}

#[test]
fn test_version_flag() {
    let (_home, mut cmd) = isolated();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ptero"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let (_home, mut cmd) = isolated();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let (_home, mut cmd) = isolated();
    cmd.args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let (_home, mut cmd) = isolated();
    let output = cmd.arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_servers_list_without_panel() {
    let (_home, mut cmd) = isolated();
    cmd.args(["servers", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No panel configured"));
}

#[test]
fn test_unknown_profile_lists_alternatives() {
    let (_home, mut cmd) = isolated();
    cmd.args(["--profile", "work", "servers", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Profile 'work' not found"));
}

#[test]
fn test_host_without_key() {
    let (_home, mut cmd) = isolated();
    cmd.args(["--host", "https://panel.example.com", "account"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No credentials"));
}

#[test]
fn test_blank_host_is_rejected_before_any_request() {
    let (_home, mut cmd) = isolated();
    cmd.args(["--host", "  ", "--api-key", "ptlc_key", "account"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Missing/invalid base URL and/or API key!",
        ));
}

#[test]
fn test_invalid_output_format() {
    let (_home, mut cmd) = isolated();
    let output = cmd
        .args(["--output", "invalid", "servers", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about output format:\n{text}"
    );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    let (_home, mut cmd) = isolated();
    cmd.args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path_points_into_config_dir() {
    let (home, mut cmd) = isolated();
    let expected = home.path().join(".config");
    cmd.args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_set_profile_then_show() {
    let home = tempfile::tempdir().unwrap();

    ptero_cmd(home.path())
        .args([
            "config",
            "set-profile",
            "home",
            "--panel",
            "https://panel.example.com",
            "--api-key-env",
            "HOME_PANEL_KEY",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved profile 'home'"));

    ptero_cmd(home.path())
        .args(["-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"default_profile\": \"home\"")
                .and(predicate::str::contains("https://panel.example.com"))
                .and(predicate::str::contains("HOME_PANEL_KEY")),
        );
}

#[test]
fn test_set_key_from_empty_pipe_is_rejected() {
    let (_home, mut cmd) = isolated();
    cmd.args(["config", "set-key", "home"])
        .write_stdin("  \n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected a key"));
}

// ── Against a mock panel ────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_account_as_json() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/client/account"))
        .and(header("authorization", "Bearer ptlc_cli_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "user",
            "attributes": {
                "id": 1, "admin": true, "username": "admin",
                "email": "admin@example.com", "first_name": "Ada",
                "last_name": "Lovelace", "language": "en"
            }
        })))
        .mount(&mock)
        .await;

    let output = run_against(&mock, &["-o", "json", "account"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let account: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(account["username"], "admin");
    assert_eq!(account["email"], "admin@example.com");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_servers_list_table() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [server_json("fe564c9a", "Survival"), server_json("0b2c7d1e", "Creative")],
            "meta": { "pagination": {
                "total": 2, "count": 2, "per_page": 50,
                "current_page": 1, "total_pages": 1, "links": {}
            }}
        })))
        .mount(&mock)
        .await;

    let output = run_against(&mock, &["servers", "list"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Survival"));
    assert!(stdout.contains("Creative"));
    assert!(stdout.contains("10.0.0.5:25565"));

    let output = run_against(&mock, &["-o", "plain", "servers", "list"]).await;
    assert_eq!(String::from_utf8_lossy(&output.stdout), "fe564c9a\n0b2c7d1e\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_power_signal_is_sent() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/client/servers/fe564c9a/power"))
        .and(body_json(json!({ "signal": "restart" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock)
        .await;

    let output = run_against(&mock, &["servers", "restart", "fe564c9a"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Sent restart signal to fe564c9a"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upstream_not_found_sets_exit_code() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/client/servers/fe564c9a/backups/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{
                "code": "NotFoundHttpException",
                "status": "404",
                "detail": "The requested resource could not be found on the server."
            }]
        })))
        .mount(&mock)
        .await;

    let output = run_against(&mock, &["backups", "show", "fe564c9a", "missing"]).await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not be found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_key_is_an_auth_failure() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/application/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": [{
                "code": "AccessDeniedHttpException",
                "status": "403",
                "detail": "This action is unauthorized."
            }]
        })))
        .mount(&mock)
        .await;

    let output = run_against(&mock, &["users", "list"]).await;
    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("This action is unauthorized."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_yes_refuses_piped_stdin() {
    let mock = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/client/servers/fe564c9a/backups/904df120"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock)
        .await;

    let output = run_against(&mock, &["backups", "delete", "fe564c9a", "904df120"]).await;
    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("requires confirmation"));
}
