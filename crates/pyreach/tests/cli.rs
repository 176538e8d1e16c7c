use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn shows_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pyreach"));
    cmd.arg("--help");
    cmd.assert().success().stdout(predicate::str::contains("pyreach"));
}

#[test]
fn scan_of_directory_with_no_manifest_fails() {
    let dir = tempdir().unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pyreach"));
    cmd.arg("scan").arg("--directory").arg(dir.path());
    cmd.assert().failure();
}
