//! Unit tests for the `kedge` CLI binary.

use super::*;
use kedge::context::{ReportStatus, ReportedRuntime};
use rstest::rstest;

#[rstest]
#[case::validate("validate", Operation::Validate)]
#[case::create("create", Operation::Create)]
#[case::delete("delete", Operation::Delete)]
#[case::attach("attach", Operation::Attach)]
#[case::detach("detach", Operation::Detach)]
fn subcommands_select_operations(#[case] name: &str, #[case] expected: Operation) {
    let cli = Cli::try_parse_from(["kedge", name, "--context", "ctx.json"])
        .expect("subcommand should parse");
    let (operation, args) = split(cli);
    assert_eq!(operation, expected);
    assert_eq!(args.context.as_deref(), Some("ctx.json"));
}

#[test]
fn context_defaults_to_stdin() {
    let cli = Cli::try_parse_from(["kedge", "delete"]).expect("subcommand should parse");
    let (_, args) = split(cli);
    assert!(args.context.is_none());
}

#[test]
fn write_report_emits_one_json_line() {
    let report = OperationReport {
        operation: "delete",
        outcome: ReportStatus::Retry,
        message: Some(String::from("volume still attached; retrying")),
        kind: None,
        runtime_properties: ReportedRuntime::default(),
    };
    let mut buffer = Vec::new();
    write_report(&mut buffer, &report).expect("write report");

    let text = String::from_utf8(buffer).expect("utf-8 output");
    assert_eq!(text.lines().count(), 1);
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["outcome"], "retry");
    assert_eq!(value["message"], "volume still attached; retrying");
}

#[test]
fn write_error_prefixes_category() {
    let mut buffer = Vec::new();
    write_error(&mut buffer, &CliError::Provider(String::from("bad key")));
    assert_eq!(
        String::from_utf8(buffer).expect("utf-8 output"),
        "provider error: bad key\n"
    );
}
