//! Behavioural smoke tests for the CLI entrypoint.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn cli_without_arguments_prints_help() {
    let mut cmd = cargo_bin_cmd!("kedge");
    cmd.assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_every_operation() {
    let mut cmd = cargo_bin_cmd!("kedge");
    cmd.arg("--help");
    let lists_operations = ["create", "delete", "attach", "detach"]
        .into_iter()
        .fold(predicate::str::contains("validate").boxed(), |acc, name| {
            acc.and(predicate::str::contains(name)).boxed()
        });
    cmd.assert().success().stdout(lists_operations);
}

#[test]
fn unreadable_context_fails_before_contacting_the_provider() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let missing = dir.path().join("missing.json");

    let mut cmd = cargo_bin_cmd!("kedge");
    cmd.env_remove("KEDGE_LOG")
        .arg("create")
        .arg("--context")
        .arg(&missing);
    cmd.assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("context error"));
}

#[test]
fn malformed_context_on_stdin_is_rejected() {
    let mut cmd = cargo_bin_cmd!("kedge");
    cmd.arg("delete").write_stdin("not json");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("invalid context document"));
}
