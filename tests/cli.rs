//! Binary-level tests for the `escrow` command.

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

mod common;

const ENV_VARS: [&str; 6] = [
    "ESCROW_PUBLIC_KEY",
    "ESCROW_SECRET_KEY",
    "ESCROW_TOKEN",
    "ESCROW_BASE_URL_LOCAL",
    "ESCROW_BASE_URL_DEV",
    "ESCROW_NETWORK_PASSPHRASE",
];

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("escrow").unwrap();
        cmd.env("ESCROW_CONFIG_DIR", self.dir.path().join(".escrow"));
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    fn set(&self, key: &str, value: &str) {
        self.cmd().args(["config", "set", key, value]).assert().success();
    }
}

#[test]
fn config_set_get_list_unset() {
    let env = TestEnv::new();

    env.cmd()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(contains("No configuration values stored"));

    env.set("baseUrlLocal", "http://localhost:3000");
    env.cmd()
        .args(["config", "get", "baseUrlLocal"])
        .assert()
        .success()
        .stdout("http://localhost:3000\n");

    env.cmd()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(contains("baseUrlLocal: http://localhost:3000"));

    env.cmd()
        .args(["config", "unset", "baseUrlLocal"])
        .assert()
        .success()
        .stdout(contains("Removed 'baseUrlLocal'"));

    env.cmd()
        .args(["config", "unset", "baseUrlLocal"])
        .assert()
        .success()
        .stdout(contains("was not set"));
}

#[test]
fn config_get_missing_key_exits_1() {
    let env = TestEnv::new();
    env.cmd()
        .args(["config", "get", "token"])
        .assert()
        .code(1)
        .stderr(contains("key 'token' is not defined"));
}

#[cfg(unix)]
#[test]
fn config_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let env = TestEnv::new();
    env.set("token", "secret");
    let path = env.dir.path().join(".escrow").join("config.json");
    let mode = std::fs::metadata(path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn deploy_without_token_exits_1_with_hint() {
    let env = TestEnv::new();
    env.set("publicKey", &common::public_key());
    env.set("secretKey", &common::secret_key());

    env.cmd()
        .args(["deploy", "--baseUrl", "http://127.0.0.1:1"])
        .assert()
        .code(1)
        .stderr(contains("token"))
        .stderr(contains("escrow config set token <yourBearerToken>"));
}

#[test]
fn sign_prints_signed_envelope() {
    let env = TestEnv::new();
    env.set("publicKey", &common::public_key());
    env.set("secretKey", &common::secret_key());
    env.set("token", "t");
    env.set("baseUrlLocal", "http://localhost:3000");

    let unsigned = common::unsigned_xdr();
    let output = env
        .cmd()
        .args(["sign", &unsigned])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let signed = String::from_utf8(output).unwrap();
    let signed = signed.trim();
    assert!(!signed.is_empty());
    assert_ne!(signed, unsigned);
}

#[test]
fn sign_with_bad_url_exits_1() {
    let env = TestEnv::new();
    env.set("publicKey", &common::public_key());
    env.set("secretKey", &common::secret_key());
    env.set("token", "t");

    env.cmd()
        .args(["sign", "AAAA", "--env", "dev", "--baseUrl", "ftp://x"])
        .assert()
        .code(1)
        .stderr(contains("http://"));
}

#[test]
fn sign_without_dev_endpoint_names_key() {
    let env = TestEnv::new();
    env.set("publicKey", &common::public_key());
    env.set("secretKey", &common::secret_key());
    env.set("token", "t");

    env.cmd()
        .args(["sign", "AAAA", "--env", "dev"])
        .assert()
        .code(1)
        .stderr(contains("escrow config set baseUrlDev <url>"));
}
