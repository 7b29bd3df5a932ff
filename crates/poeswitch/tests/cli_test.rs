//! Integration tests for the `poeswitch` CLI binary.
//!
//! Argument parsing, help, completions and error exits run without a
//! switch; the end-to-end cases talk to a wiremock stand-in.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `poeswitch` binary with env isolation.
///
/// Clears all `POESWITCH_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn poeswitch_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("poeswitch");
    cmd.env("HOME", "/tmp/poeswitch-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/poeswitch-cli-test-nonexistent")
        .env_remove("POESWITCH_SWITCH")
        .env_remove("POESWITCH_HOST")
        .env_remove("POESWITCH_PASSWORD")
        .env_remove("POESWITCH_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(body.into())
}

/// A GS1200-5HP with PoE on ports 0 and 2.
async fn mock_switch() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "token=cli-session; path=/")
                .set_body_string("<html>ok</html>"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logout.html"))
        .respond_with(ok("<html>bye</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/port_state_data.js"))
        .respond_with(ok("var portPoE = '5';"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/poe_data.js"))
        .respond_with(ok("var port_power = [4.5, 0.0, 2.1, 0.0];"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/system_data.js"))
        .respond_with(ok("var sys_fmw_ver = 'V2.00(ABKN.1)C0';\n\
             var model_name = 'GS1200-5HP v2';\n\
             var sys_MAC = 'BC:CF:4F:00:11:22';\n\
             var sys_dev_name = 'garage';\n\
             var sys_led_state = '0';\n\
             var system_uptime = '3600';\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/link_data.js"))
        .respond_with(ok("var portstatus = ['Up','Down','Up','Down','Up'];\n\
             var speed = ['1000M','','100M','','1000M'];\n"))
        .mount(&server)
        .await;

    server
}

/// Run the binary off the async runtime so wiremock keeps serving.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let uri = server.uri();
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    tokio::task::spawn_blocking(move || {
        poeswitch_cmd()
            .args(["--host", &uri, "--password", "1234"])
            .args(&args)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = poeswitch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    poeswitch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("status")
            .and(predicate::str::contains("ports"))
            .and(predicate::str::contains("led"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    poeswitch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("poeswitch"));
}

#[test]
fn test_completions_bash() {
    poeswitch_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("poeswitch"));
}

#[test]
fn test_completions_zsh() {
    poeswitch_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    poeswitch_cmd()
        .arg("reboot")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_port_rejects_unknown_state() {
    poeswitch_cmd()
        .args(["port", "1", "maybe"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_port_requires_numeric_index() {
    poeswitch_cmd().args(["port", "first", "on"]).assert().code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_prints_toml_file() {
    poeswitch_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_without_file_prints_defaults() {
    poeswitch_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scan_interval = 60"));
}

#[test]
fn test_status_without_switch_fails() {
    let output = poeswitch_cmd().arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(
        text.contains("No switch configured"),
        "Expected config error in output:\n{text}"
    );
}

#[test]
fn test_host_without_password_fails() {
    let output = poeswitch_cmd()
        .args(["--host", "192.0.2.1", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("adhoc"), "Expected switch name in output:\n{text}");
}

// ── Against a mock switch ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json() {
    let server = mock_switch().await;

    let output = run_against(&server, &["status", "-o", "json"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["device"]["model"], "GS1200-5HP v2");
    assert_eq!(json["device"]["uptime_secs"], 3600);
    assert_eq!(json["ports"].as_array().unwrap().len(), 5);
    assert_eq!(json["ports"][0]["power_state"], "on");
    assert_eq!(json["ports"][1]["power_state"], "off");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ports_plain_lists_poe_ports() {
    let server = mock_switch().await;

    let output = run_against(&server, &["ports", "--poe", "-o", "plain"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "0 on\n1 off\n2 on\n3 off\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_port_off_posts_new_mask() {
    let server = mock_switch().await;
    Mock::given(method("POST"))
        .and(path("/port_state_set.cgi"))
        .and(body_string(
            "g_port_state=31&g_port_flwcl=0&g_port_poe=4\
             &g_port_speed0=0&g_port_speed1=0&g_port_speed2=0&g_port_speed3=0&g_port_speed4=0",
        ))
        .respond_with(ok("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["port", "0", "off", "-o", "plain"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_port_on_non_poe_port_is_rejected() {
    let server = mock_switch().await;

    let output = run_against(&server, &["port", "4", "on"]).await;
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("PoE"), "Expected PoE error in output:\n{text}");
}
