//! Log output and filtering.

use crate::support::*;

#[test]
fn test_quiet_by_default() {
    let t = Test::with_secrets("api", &[("API_KEY", "secret")]);
    let output = t.get("API_KEY");
    assert_success(&output);
    assert!(stderr(&output).is_empty());
}

#[test]
fn test_verbose_logs_to_stderr() {
    let t = Test::with_secrets("api", &[("API_KEY", "secret")]);

    let output = t.cmd().args(["--verbose", "list"]).output().unwrap();
    assert_success(&output);
    assert_stderr_contains(&output, "bundle loaded");
    assert!(!stdout(&output).contains("bundle loaded"));
}

#[test]
fn test_log_json_lines() {
    let t = Test::with_secrets("api", &[("API_KEY", "secret")]);

    let output = t
        .cmd()
        .args(["--verbose", "--log-json", "list"])
        .output()
        .unwrap();
    assert_success(&output);

    let err = stderr(&output);
    assert!(!err.is_empty());
    for line in err.lines().filter(|l| !l.trim().is_empty()) {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(parsed.get("level").is_some());
    }
}

#[test]
fn test_trace_never_logs_plaintext_or_keys() {
    let t = Test::init("api");

    let output = t
        .cmd()
        .env("ENVHUB_LOG", "envhub=trace")
        .args(["set", "API_KEY", "hunter2-plaintext"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_success(&t.rotate_dek());

    let output = t
        .cmd()
        .env("ENVHUB_LOG", "envhub=trace")
        .arg("rotate-dek")
        .output()
        .unwrap();
    assert_success(&output);

    let err = stderr(&output);
    assert_stderr_contains(&output, "rotating data key");
    assert!(!err.contains("hunter2-plaintext"));
    assert!(!err.contains(&t.master_key));
}
