// Regression tests for the suitexml binary.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

mod common;

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

fn fixture(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

fn suitexml() -> Command {
    let mut cmd = Command::cargo_bin("suitexml").unwrap();
    cmd.env_remove("TESTNG_DTD_HTTP");
    cmd
}

#[test]
fn cli_prints_summary() {
    let dir = TempDir::new().unwrap();
    let file = fixture(
        &dir,
        "suite.xml",
        &common::with_doctype(
            r#"<suite name="Nightly"><test name="Smoke"><classes><class name="com.example.A"/></classes></test></suite>"#,
        ),
    );
    suitexml()
        .arg("parse")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("suite Nightly").and(contains("[0] test Smoke")));
}

#[test]
fn cli_dumps_json_with_properties() {
    let dir = TempDir::new().unwrap();
    let file = fixture(
        &dir,
        "suite.xml",
        &common::with_doctype(r#"<suite name="S"><parameter name="env" value="${target}"/></suite>"#),
    );
    suitexml()
        .args(["parse", "--format", "json", "-D", "target=qa"])
        .arg(&file)
        .assert()
        .success()
        .stdout(contains(r#""env": "qa""#));
}

#[test]
fn cli_reports_miette_diagnostics_on_error() {
    let dir = TempDir::new().unwrap();
    let file = fixture(&dir, "bad.xml", &common::with_doctype(r#"<suite verbose="1"/>"#));
    suitexml()
        .arg("parse")
        .arg(&file)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("suitexml::missing_attribute").or(contains("help:")));
}

#[test]
fn cli_insecure_schema_needs_flag() {
    let dir = TempDir::new().unwrap();
    let file = fixture(
        &dir,
        "insecure.xml",
        "<!DOCTYPE suite SYSTEM \"http://evil.example.com/x.dtd\">\n<suite name=\"S\"/>",
    );
    suitexml()
        .arg("parse")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("TESTNG_DTD_HTTP"));
    suitexml()
        .args(["parse", "--allow-insecure-dtd"])
        .arg(&file)
        .assert()
        .success();
}
