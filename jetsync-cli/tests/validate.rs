use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn jetsync_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("jetsync"))
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("topology.yaml");
    fs::write(&path, content).expect("write config");
    path
}

fn validate(path: &Path) -> assert_cmd::assert::Assert {
    jetsync_cmd()
        .args(["validate", "--config"])
        .arg(path)
        .assert()
}

#[test]
fn valid_document_passes() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        "streams:\n  - name: ORDERS\n    subjects: [\"orders.>\"]\nbuckets:\n  - name: sessions\n",
    );

    validate(&path)
        .success()
        .stdout(contains("is valid"))
        .stdout(contains("1 streams, 1 buckets"))
        .stdout(contains("stream ORDERS"))
        .stdout(contains("bucket sessions"));
}

#[test]
fn missing_document_fails() {
    let dir = TempDir::new().expect("tempdir");

    validate(&dir.path().join("absent.yaml"))
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn duplicate_names_fail_validation() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        "buckets:\n  - name: sessions\n  - name: SESSIONS\n",
    );

    validate(&path)
        .failure()
        .stderr(contains("duplicate bucket name"));
}

#[test]
fn reserved_stream_prefix_fails_validation() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        "streams:\n  - name: KV_sessions\n    subjects: [\"x.>\"]\n",
    );

    validate(&path)
        .failure()
        .stderr(contains("reserved"));
}

#[test]
fn malformed_yaml_fails_with_path_context() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "streams: [just, strings]");

    validate(&path)
        .failure()
        .stderr(contains("topology.yaml"));
}

#[test]
fn empty_document_is_valid() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, "streams: []\nbuckets: []\n");

    validate(&path)
        .success()
        .stdout(contains("0 streams, 0 buckets"));
}
