//! Binary-level tests for the `kmsctl` command.

mod helpers;

use assert_cmd::Command;
use helpers::{describe_and_delete, FakeControlPlane};
use predicates::prelude::*;

/// `kmsctl` with a clean environment.
fn kmsctl() -> Command {
    let mut cmd = Command::cargo_bin("kmsctl").expect("binary built");
    cmd.env_remove("KMSCTL_ENDPOINT")
        .env_remove("KMSCTL_REGION")
        .env_remove("KMSCTL_CONNECT_TIMEOUT")
        .env_remove("KMSCTL_REQUEST_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// An endpoint nothing listens on.
fn dead_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("ws://{addr}")
}

#[test]
fn test_help_lists_operations() {
    kmsctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("get-key"))
        .stdout(predicate::str::contains("schedule-key-deletion"))
        .stdout(predicate::str::contains("list-aliases"));
}

#[test]
fn test_subcommand_help_shows_inputs() {
    kmsctl()
        .args(["create-key", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--key-usage"))
        .stdout(predicate::str::contains("ENCRYPT_DECRYPT"))
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn test_missing_required_field() {
    kmsctl()
        .args(["get-key", "-e", dead_endpoint().as_str()])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing required field: KeyId"));
}

#[test]
fn test_page_size_out_of_range() {
    kmsctl()
        .args(["list-keys", "--limit", "0", "-e", dead_endpoint().as_str()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Limit must be between 1 and 100, got 0"));
}

#[test]
fn test_negative_page_size_out_of_range() {
    kmsctl()
        .args(["list-keys", "--limit", "-5", "-e", dead_endpoint().as_str()])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Limit must be between 1 and 100, got -5"));
}

#[test]
fn test_invalid_selector() {
    kmsctl()
        .args(["get-key", "--key-id", "k", "--select", "Bogus", "-e", dead_endpoint().as_str()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid selector 'Bogus'"));
}

#[test]
fn test_destructive_command_without_terminal_aborts_silently() {
    let server = FakeControlPlane::start(describe_and_delete);

    kmsctl()
        .args(["delete-alias", "--alias-name", "alias/Example", "-e", server.ws_url().as_str()])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    assert!(server.requests().is_empty());
}

#[test]
fn test_forced_delete_echoes_alias() {
    let server = FakeControlPlane::start(describe_and_delete);

    kmsctl()
        .args([
            "delete-alias",
            "--alias-name",
            "alias/Example",
            "--select",
            "^AliasName",
            "--force",
            "-e",
            server.ws_url().as_str(),
        ])
        .assert()
        .success()
        .stdout("alias/Example\n");

    assert_eq!(server.requests().len(), 1);
}

#[test]
fn test_get_key_prints_metadata_as_json() {
    let server = FakeControlPlane::start(describe_and_delete);

    kmsctl()
        .args(["get-key", "--key-id", "1234abcd", "-f", "json", "-r", "eu-west-1"])
        .env("KMSCTL_ENDPOINT", server.ws_url())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"KeyId\": \"1234abcd\""))
        .stdout(predicate::str::contains("\"KeyState\": \"Enabled\""));

    let requests = server.requests();
    assert_eq!(requests[0].region.as_deref(), Some("eu-west-1"));
}

#[test]
fn test_service_rejection_exits_non_zero() {
    let server = FakeControlPlane::start(describe_and_delete);

    kmsctl()
        .args(["get-key", "--key-id", "missing", "-e", server.ws_url().as_str()])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("DescribeKey failed: NotFoundException"));
}

#[test]
fn test_unreachable_endpoint_is_a_connectivity_failure() {
    kmsctl()
        .args(["get-key", "--key-id", "k", "--connect-timeout", "2", "-e", dead_endpoint().as_str()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not connect"))
        .stderr(predicate::str::contains("reachable"));
}
