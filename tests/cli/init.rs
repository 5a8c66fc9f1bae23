//! Tests for `envhub init`.

use crate::support::*;
use envhub::bundle::Bundle;
use envhub::core::MasterKey;

#[test]
fn test_init_creates_bundle() {
    let t = Test::new();

    let output = t.init_cmd("api");
    assert_success(&output);
    assert_stdout_contains(&output, "initialized api");

    let bundle = Bundle::load(&t.bundle_path()).unwrap();
    assert_eq!(bundle.project.name, "api");
    assert_eq!(bundle.project.dek_version, 1);
    assert!(bundle.secrets.is_empty());
    assert!(bundle.project.rotated_at.is_none());
}

#[test]
fn test_init_wraps_key_under_master_key() {
    let t = Test::init("api");
    let bundle = Bundle::load(&t.bundle_path()).unwrap();

    let mk = MasterKey::from_base64(&t.master_key).unwrap();
    assert!(bundle.data_key(&mk).is_ok());

    let other = MasterKey::generate().unwrap();
    assert!(bundle.data_key(&other).is_err());
}

#[test]
fn test_init_never_writes_master_key() {
    let t = Test::init("api");
    assert!(!t.bundle_contents().contains(&t.master_key));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let t = Test::init("api");
    let before = t.bundle_contents();

    let output = t.init_cmd("web");
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
    assert_eq!(t.bundle_contents(), before);
}

#[test]
fn test_init_force_overwrites() {
    let t = Test::with_secrets("api", &[("API_KEY", "one")]);

    let output = t
        .cmd()
        .args(["init", "web", "--force"])
        .output()
        .unwrap();
    assert_success(&output);

    let bundle = Bundle::load(&t.bundle_path()).unwrap();
    assert_eq!(bundle.project.name, "web");
    assert!(bundle.secrets.is_empty());
}

#[test]
fn test_init_custom_file() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["--file", "staging.toml", "init", "staging"])
        .output()
        .unwrap();
    assert_success(&output);

    assert!(t.dir.path().join("staging.toml").exists());
    assert!(!t.bundle_path().exists());
}
