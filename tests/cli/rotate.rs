//! Tests for `envhub rotate-dek` and `envhub rotate-master`.

use std::fs;

use crate::support::*;
use envhub::bundle::Bundle;

#[test]
fn test_rotate_dek_reencrypts_secrets() {
    let t = Test::with_secrets("api", STANDARD_SECRETS);
    let before = Bundle::load(&t.bundle_path()).unwrap();

    let output = t.rotate_dek();
    assert_success(&output);
    assert_stdout_contains(&output, "v1 → v2");
    assert_stdout_contains(&output, "5 secrets re-encrypted");

    let after = Bundle::load(&t.bundle_path()).unwrap();
    assert_eq!(after.project.dek_version, 2);
    assert_ne!(after.project.dek, before.project.dek);
    assert!(after.project.rotated_at.is_some());

    for (key, value) in STANDARD_SECRETS {
        assert_ne!(after.secrets[*key], before.secrets[*key]);
        assert_eq!(stdout(&t.get(key)), format!("{}\n", value));
    }
}

#[test]
fn test_rotate_dek_twice_increments_version() {
    let t = Test::with_secrets("api", &[("API_KEY", "secret")]);

    assert_success(&t.rotate_dek());
    assert_success(&t.rotate_dek());

    let bundle = Bundle::load(&t.bundle_path()).unwrap();
    assert_eq!(bundle.project.dek_version, 3);
    assert_eq!(stdout(&t.get("API_KEY")), "secret\n");
}

#[test]
fn test_rotate_dek_empty_bundle() {
    let t = Test::init("api");

    let output = t.rotate_dek();
    assert_success(&output);
    assert_stdout_contains(&output, "0 secrets re-encrypted");
}

#[test]
fn test_rotate_dek_failure_leaves_bundle_untouched() {
    let t = Test::with_secrets("api", &[("A_KEY", "a"), ("B_KEY", "b")]);

    // Secret sealed under an unrelated key cannot be decrypted.
    let mut bundle = Bundle::load(&t.bundle_path()).unwrap();
    let foreign = envhub::core::seal_secret("x", &envhub::core::DataKey::generate().unwrap())
        .unwrap();
    bundle.secrets.insert("B_KEY".to_string(), foreign);
    bundle.save(&t.bundle_path()).unwrap();
    let before = t.bundle_contents();

    let output = t.rotate_dek();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to decrypt secret #1");
    assert_eq!(t.bundle_contents(), before);
}

#[test]
fn test_rotate_master_rewraps_all_bundles() {
    let t = Test::new();
    for (file, name) in [("a.toml", "api"), ("b.toml", "web")] {
        let output = t
            .cmd()
            .args(["--file", file, "init", name])
            .output()
            .unwrap();
        assert_success(&output);
        let output = t
            .cmd()
            .args(["--file", file, "set", "TOKEN", name])
            .output()
            .unwrap();
        assert_success(&output);
    }
    let secrets_before = Bundle::load(&t.dir.path().join("a.toml")).unwrap().secrets;

    let new_key = generate_master_key();
    let output = t.rotate_master(&new_key, &["a.toml", "b.toml"]);
    assert_success(&output);
    assert_stdout_contains(&output, "rewrapped 2 data keys under master key v2");

    // Secrets are untouched; only the wrapped data key changed.
    let after = Bundle::load(&t.dir.path().join("a.toml")).unwrap();
    assert_eq!(after.secrets, secrets_before);
    assert_eq!(after.project.dek_version, 1);

    for (file, name) in [("a.toml", "api"), ("b.toml", "web")] {
        let old = t
            .cmd()
            .args(["--file", file, "get", "TOKEN"])
            .output()
            .unwrap();
        assert_failure(&old);

        let new = t
            .cmd()
            .env("ENVHUB_MASTER_KEY", &new_key)
            .env("ENVHUB_MASTER_KEY_VERSION", "2")
            .args(["--file", file, "get", "TOKEN"])
            .output()
            .unwrap();
        assert_success(&new);
        assert_eq!(stdout(&new), format!("{}\n", name));
    }
}

#[test]
fn test_rotate_master_fails_fast_without_writing() {
    let t = Test::new();
    let output = t.cmd().args(["--file", "a.toml", "init", "api"]).output().unwrap();
    assert_success(&output);
    let output = t
        .cmd()
        .env("ENVHUB_MASTER_KEY", generate_master_key())
        .args(["--file", "b.toml", "init", "web"])
        .output()
        .unwrap();
    assert_success(&output);

    let a = fs::read_to_string(t.dir.path().join("a.toml")).unwrap();
    let b = fs::read_to_string(t.dir.path().join("b.toml")).unwrap();

    let output = t.rotate_master(&generate_master_key(), &["a.toml", "b.toml"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to decrypt data key #1");
    assert_stderr_contains(&output, "b.toml");

    assert_eq!(fs::read_to_string(t.dir.path().join("a.toml")).unwrap(), a);
    assert_eq!(fs::read_to_string(t.dir.path().join("b.toml")).unwrap(), b);
    assert!(!t.dir.path().join("a.toml.tmp").exists());
}

#[test]
fn test_rotate_master_same_bundle_listed_twice() {
    let t = Test::with_secrets("api", &[("TOKEN", "abc")]);

    let new_key = generate_master_key();
    let output = t.rotate_master(&new_key, &["envhub.toml", "envhub.toml", "./envhub.toml"]);
    assert_success(&output);
    assert_stdout_contains(&output, "rewrapped 1 data key under master key v2");
    assert!(!t.dir.path().join("envhub.toml.tmp").exists());

    assert_failure(&t.get("TOKEN"));
    let output = t
        .cmd()
        .env("ENVHUB_MASTER_KEY", &new_key)
        .args(["get", "TOKEN"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output), "abc\n");
}

#[test]
fn test_rotate_master_requires_new_key() {
    let t = Test::init("api");

    let output = t
        .cmd()
        .args(["rotate-master", "envhub.toml", "--yes"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "ENVHUB_NEW_MASTER_KEY");
}

#[test]
fn test_rotate_master_requires_confirmation_when_not_interactive() {
    let t = Test::init("api");
    let before = t.bundle_contents();

    let output = t
        .cmd()
        .env("ENVHUB_NEW_MASTER_KEY", generate_master_key())
        .args(["rotate-master", "envhub.toml"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "confirmation required");
    assert_eq!(t.bundle_contents(), before);
}

#[test]
fn test_rotate_master_requires_bundle_argument() {
    let t = Test::init("api");
    let output = t
        .cmd()
        .env("ENVHUB_NEW_MASTER_KEY", generate_master_key())
        .args(["rotate-master", "--yes"])
        .output()
        .unwrap();
    assert_failure(&output);
}
