//! Scenario: `donmo` harness end to end
//!
//! Runs the built binary against an in-process mock of the donation API.
//! The cart file persists between runs like a page reload would.

use assert_cmd::prelude::*;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use std::process::Command;

const PK_ENV: &str = "DONMO_TEST_PK";

fn write_config(dir: &Path, base_url: &str) -> String {
    let path = dir.join("shop.yaml");
    let yaml = format!(
        "widget:\n  order_id: \"order-42\"\n  language: \"en\"\napi:\n  base_url: \"{base_url}\"\nkeys_env:\n  public_key: \"{PK_ENV}\"\n"
    );
    std::fs::write(&path, yaml).unwrap();
    path.to_string_lossy().to_string()
}

fn donmo(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("donmo").unwrap();
    cmd.current_dir(dir)
        .env(PK_ENV, "test-public-key")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn session_click_creates_donation_and_persists_cart() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/calculate").header("pk", "test-public-key");
        then.status(200)
            .json_body(json!({"donationAmount": 1.23, "currencySymbol": "$"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/check/order-42");
        then.status(200).json_body(json!({"data": {"donationAmount": null}}));
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .json_body(json!({"donationAmount": 1.23, "orderId": "order-42"}));
        then.status(200).json_body(json!({"status": 200}));
    });

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.base_url());
    let cart = dir.path().join("cart.json");

    donmo(dir.path())
        .args(["session", "--config", &config, "--cart"])
        .arg(&cart)
        .args(["--goods-total", "100", "--click"])
        .assert()
        .success()
        .stdout(predicate::str::contains("view: amount=1.23"))
        .stdout(predicate::str::contains("view: currency=$"))
        .stdout(predicate::str::contains("click=Created"))
        .stdout(predicate::str::contains("\"Confirmed\""));

    create.assert();
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&cart).unwrap()).unwrap();
    assert_eq!(saved["goods_total"], json!(100.0));
    assert_eq!(saved["donation"], json!(1.23));
}

#[test]
fn failed_create_leaves_cart_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/calculate");
        then.status(200)
            .json_body(json!({"donationAmount": 0.5, "currencySymbol": "₴"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/check/order-42");
        then.status(200).json_body(json!({"data": null}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/");
        then.status(200).json_body(json!({"status": 500}));
    });

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.base_url());
    let cart = dir.path().join("cart.json");

    donmo(dir.path())
        .args(["session", "--config", &config, "--cart"])
        .arg(&cart)
        .args(["--goods-total", "249.50", "--click"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BackendRejection"))
        .stdout(predicate::str::contains("view: button=Something went wrong"));

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&cart).unwrap()).unwrap();
    assert_eq!(saved["donation"], Value::Null);
}

#[test]
fn quote_prints_donation() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/calculate");
        then.status(200)
            .json_body(json!({"donationAmount": 0.23, "currencySymbol": "$"}));
    });

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.base_url());

    donmo(dir.path())
        .args(["quote", "--config", &config, "--order-amount", "98.77"])
        .assert()
        .success()
        .stdout(predicate::str::contains("donation=0.23"))
        .stdout(predicate::str::contains("currency=$"));
}

#[test]
fn check_without_public_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:9");

    donmo(dir.path())
        .env_remove(PK_ENV)
        .args(["check", "--config", &config])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SECRETS_MISSING"))
        .stderr(predicate::str::contains(PK_ENV));
}

#[test]
fn config_hash_rejects_literal_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "keys_env:\n  public_key: \"pk_live_abcdef0123456789\"\n").unwrap();

    donmo(dir.path())
        .arg("config-hash")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_SECRET_DETECTED"));
}

#[test]
fn config_hash_prints_hash_and_canonical_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:9");

    donmo(dir.path())
        .args(["config-hash", &config])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("config_hash="))
        .stdout(predicate::str::contains("\"order_id\":\"order-42\""));
}
