//! Tests for `envhub set/get/rm/list`.

use crate::support::*;
use envhub::bundle::Bundle;

#[test]
fn test_set_and_get_roundtrip() {
    let t = Test::init("api");

    let output = t.set("DATABASE_URL", "postgres://localhost/db");
    assert_success(&output);
    assert_stdout_contains(&output, "DATABASE_URL");

    let output = t.get("DATABASE_URL");
    assert_success(&output);
    assert_eq!(stdout(&output), "postgres://localhost/db\n");
}

#[test]
fn test_bundle_holds_only_ciphertext() {
    let t = Test::with_secrets("api", STANDARD_SECRETS);
    let contents = t.bundle_contents();

    for (key, value) in STANDARD_SECRETS {
        assert!(contents.contains(key));
        assert!(!contents.contains(value), "plaintext {} leaked", key);
    }
}

#[test]
fn test_set_with_force_overwrites() {
    let t = Test::with_secrets("api", &[("OVERWRITE_KEY", "original_value")]);

    let output = t.set("OVERWRITE_KEY", "new_value");
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");

    let output = t.set_force("OVERWRITE_KEY", "new_value");
    assert_success(&output);

    let output = t.get("OVERWRITE_KEY");
    assert_eq!(stdout(&output), "new_value\n");
}

#[test]
fn test_unicode_and_special_values() {
    let t = Test::init("api");
    assert_roundtrip(&t, "JAPANESE_SECRET", "こんにちは世界");
    assert_roundtrip(&t, "EMOJI_SECRET", "🚀🎉💯🔥");
    assert_roundtrip(&t, "SHELL_SECRET", "p@ss'w\"0rd$HOME;`ls`");
    assert_roundtrip(&t, "LONG_SECRET", &"x".repeat(10_000));
}

#[test]
fn test_set_rejects_invalid_name() {
    let t = Test::init("api");

    let output = t.set("1BAD", "value");
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid secret name");

    let output = t.set("lower-case", "value");
    assert_failure(&output);

    let output = t.set("database_url", "value");
    assert_failure(&output);
    assert_stderr_contains(&output, "Only A-Z, 0-9, and underscore");
    assert!(!t.bundle_contents().contains("database_url"));
}

#[test]
fn test_set_rejects_empty_value() {
    let t = Test::init("api");
    let output = t.set("EMPTY", "");
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot be empty");
}

#[test]
fn test_get_missing_secret() {
    let t = Test::init("api");
    let output = t.get("NOPE");
    assert_failure(&output);
    assert_stderr_contains(&output, "secret not found: NOPE");
}

#[test]
fn test_rm_removes_secret() {
    let t = Test::with_secrets("api", &[("A_KEY", "a"), ("B_KEY", "b")]);

    let output = t.rm("A_KEY");
    assert_success(&output);

    assert_failure(&t.get("A_KEY"));
    assert_eq!(stdout(&t.get("B_KEY")), "b\n");

    let output = t.rm("A_KEY");
    assert_failure(&output);
}

#[test]
fn test_rm_does_not_need_master_key() {
    let t = Test::with_secrets("api", &[("A_KEY", "a")]);

    let output = t
        .cmd()
        .env_remove("ENVHUB_MASTER_KEY")
        .args(["rm", "A_KEY"])
        .output()
        .unwrap();
    assert_success(&output);
}

#[test]
fn test_list_sorted() {
    let t = Test::with_secrets("api", STANDARD_SECRETS);

    let output = t.list();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("5 secrets"));

    let api = out.find("API_KEY").unwrap();
    let s3 = out.find("S3_BUCKET").unwrap();
    assert!(api < s3);
}

#[test]
fn test_list_empty() {
    let t = Test::init("api");
    let output = t.list();
    assert_success(&output);
    assert_stdout_contains(&output, "no secrets stored");
}

#[test]
fn test_list_json() {
    let t = Test::with_secrets("api", &[("ZED", "z"), ("ALPHA", "a")]);

    let output = t.list_json();
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["project"], "api");
    assert_eq!(json["dek_version"], 1);
    assert_eq!(json["count"], 2);
    assert_eq!(json["keys"], serde_json::json!(["ALPHA", "ZED"]));
}

#[test]
fn test_wrong_master_key_cannot_read() {
    let t = Test::with_secrets("api", &[("API_KEY", "secret")]);

    let output = t
        .cmd()
        .env("ENVHUB_MASTER_KEY", generate_master_key())
        .args(["get", "API_KEY"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
    assert!(!stdout(&output).contains("secret"));
}

#[test]
fn test_tampered_secret_detected() {
    use envhub::core::cipher;

    let t = Test::with_secrets("api", &[("API_KEY", "secret")]);

    let mut bundle = Bundle::load(&t.bundle_path()).unwrap();
    let sealed = bundle.secrets.get_mut("API_KEY").unwrap();
    let mut blob = cipher::from_base64(sealed).unwrap();
    let last = blob.len() - 1;
    blob[last] ^= 0x01;
    *sealed = cipher::to_base64(&blob);
    bundle.save(&t.bundle_path()).unwrap();

    let output = t.get("API_KEY");
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
}
