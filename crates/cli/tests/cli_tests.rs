//! End-to-end runs of the `lamden-cli` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn lamden_cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lamden-cli").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("LAMDEN_SK")
        .env_remove("LAMDEN_KEYSTORE_PASSWORD")
        .env("RUST_LOG", "error");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn keygen_prints_a_key_pair() {
    let dir = TempDir::new().unwrap();
    let output = lamden_cli(&dir).arg("keygen").output().unwrap();
    assert!(output.status.success());
    let keys = stdout_json(&output);
    assert_eq!(keys["sk"].as_str().unwrap().len(), 64);
    assert_eq!(keys["vk"].as_str().unwrap().len(), 64);
}

#[test]
fn values_fixture_runs_locally() {
    let dir = TempDir::new().unwrap();
    lamden_cli(&dir)
        .args(["values", "--uid", "cli-check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"uid\": \"cli-check\""))
        .stdout(predicate::str::contains("\"stored\": 9"));
}

#[test]
fn keystore_round_trip() {
    let dir = TempDir::new().unwrap();
    let sk = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    let vk = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    lamden_cli(&dir)
        .args(["keystore", "create", "keys.json", "--sk", sk, "--hint", "pets", "--password", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains(vk));
    assert!(dir.path().join("keys.json").exists());

    let output = lamden_cli(&dir)
        .args(["keystore", "open", "keys.json", "--password", "secret"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let opened = stdout_json(&output);
    assert_eq!(opened["wallets"][0]["vk"], vk);
    assert_eq!(opened["hint"], "pets");

    lamden_cli(&dir)
        .args(["keystore", "open", "keys.json", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect Keystore Password."));
}

#[test]
fn missing_config_fails() {
    let dir = TempDir::new().unwrap();
    lamden_cli(&dir)
        .args(["-c", "absent.toml", "ping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn send_requires_a_signing_key() {
    let dir = TempDir::new().unwrap();
    lamden_cli(&dir)
        .args(["send", "currency", "transfer"])
        .assert()
        .failure();
}
