//! End-to-end tests for the `vislabel` binary.
#![expect(clippy::expect_used, reason = "tests assert process outcomes")]

use assert_cmd::Command;
use rstest::rstest;
use std::str;

fn vislabel() -> Command {
    let mut cmd = Command::cargo_bin("vislabel").expect("binary exists");
    cmd.env_remove("VISLABEL_LOG_LEVEL")
        .env_remove("VISLABEL_MAX_DEPTH");
    cmd
}

fn stdout_of(output: &std::process::Output) -> &str {
    str::from_utf8(&output.stdout).expect("utf8")
}

#[test]
fn check_prints_tree() {
    let output = vislabel()
        .args(["check", "(A&B)|C"])
        .output()
        .expect("runs");
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "ok [(A&B)|C]\n  or\n    and\n      term A\n      term B\n    term C\n"
    );
}

#[test]
fn check_fails_on_invalid_label() {
    let output = vislabel()
        .args(["check", "A", "A&&B"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("ok [A]\n"));
    assert!(stdout.contains("error: empty term at byte 2 (zero-based) in [A&&B]\n  A&&B\n    ^\n"));
}

#[test]
fn check_emits_json() {
    let output = vislabel()
        .args(["check", "--json", "A|B", "(A"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
    let reports: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output is JSON");
    let reports = reports.as_array().expect("array of reports");
    assert_eq!(reports.len(), 2);
    assert_eq!(
        reports.first().and_then(|r| r.get("valid")),
        Some(&serde_json::Value::Bool(true))
    );
    let error = reports
        .get(1)
        .and_then(|r| r.get("error"))
        .expect("second report has an error");
    assert_eq!(
        error.get("kind"),
        Some(&serde_json::Value::String("MismatchedParenthesis".into()))
    );
    assert_eq!(error.get("position"), Some(&serde_json::Value::from(0_u64)));
}

#[rstest]
#[case::admitted("C", 0, "admit\n")]
#[case::denied("A", 3, "deny\n")]
#[case::conjunction("A,B", 0, "admit\n")]
fn eval_exit_code_reflects_decision(
    #[case] auths: &str,
    #[case] code: i32,
    #[case] expected: &str,
) {
    let output = vislabel()
        .args(["eval", "(A&B)|C", "--auths", auths])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(code));
    assert_eq!(stdout_of(&output), expected);
}

#[test]
fn eval_rejects_malformed_authorisations() {
    let output = vislabel()
        .args(["eval", "A", "--auths", "A,,B"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(2));
    let stderr = str::from_utf8(&output.stderr).expect("utf8");
    assert!(stderr.contains("empty authorisation token at index 1"));
}

#[test]
fn normalise_prints_canonical_form() {
    let output = vislabel()
        .args(["normalise", "C|(B&A)|C"])
        .output()
        .expect("runs");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "C|(A&B)\n");
}

#[test]
fn quote_escapes_tokens() {
    let output = vislabel()
        .args(["quote", "ops", "on call"])
        .output()
        .expect("runs");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "ops\n\"on call\"\n");
}

#[test]
fn max_depth_flag_limits_nesting() {
    let output = vislabel()
        .args(["--max-depth", "1", "check", "((A))"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).contains("nesting depth limit exceeded at byte 1"));
}

#[test]
fn invalid_environment_configuration_exits_with_two() {
    let output = vislabel()
        .env("VISLABEL_MAX_DEPTH", "deep")
        .args(["check", "A"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(2));
    let stderr = str::from_utf8(&output.stderr).expect("utf8");
    assert!(stderr.contains("invalid max depth"));
}
