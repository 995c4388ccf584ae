//! End-to-end tests that invoke the compiled `stv` binary.
//!
//! The binary is located with `env!("CARGO_BIN_EXE_stv")` and run against
//! specification files in temporary directories.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const SPEC_YAML: &str = "\
base_image: python:3.11-slim
user: bentoml
uid: 1034
install_path: /home/bentoml/bento
home_dir: /home/bentoml
python_version: \"3.11\"
port: 3000
envs:
  - name: MODEL_NAME
    value: iris
preheat:
  - torch
";

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stv"))
        .args(args)
        .current_dir(dir)
        .env_remove("STV_BUILDKIT")
        .env_remove("STV_FRONTEND")
        .output()
        .expect("failed to execute stv binary")
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("stevedore.yaml"), SPEC_YAML).unwrap();
    dir
}

#[test]
fn render_prints_manifest_to_stdout() {
    let dir = workspace();
    let output = run(dir.path(), &["render"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("THIS IS A GENERATED DOCKERFILE"));
    assert!(text.contains("FROM python:3.11-slim AS base-container"));
    assert!(text.contains("ENTRYPOINT [\"/home/bentoml/bento/env/docker/entrypoint.sh\"]"));
    assert!(!text.contains("--mount=type=cache"));
}

#[test]
fn buildkit_flag_adds_directive_and_mounts() {
    let dir = workspace();
    let output = run(dir.path(), &["render", "--buildkit", "--no-header"]);
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.starts_with("# syntax=docker/dockerfile:1.4-labs\n"));
    assert!(!text.contains("GENERATED DOCKERFILE"));
    assert!(text.contains("--mount=type=cache,target=/root/.cache/uv,mode=0777"));
}

#[test]
fn render_writes_output_file_and_digest() {
    let dir = workspace();
    let output = run(dir.path(), &["render", "-o", "Dockerfile", "--digest"]);
    assert!(output.status.success());

    let written = fs::read_to_string(dir.path().join("Dockerfile")).unwrap();
    assert!(written.ends_with('\n'));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.trim().starts_with("sha256:"));
}

#[test]
fn expected_digest_gates_output() {
    let dir = workspace();
    let first = run(dir.path(), &["render", "-o", "Dockerfile", "--digest"]);
    assert!(first.status.success());
    let digest = String::from_utf8(first.stdout).unwrap().trim().to_owned();

    let matching = run(dir.path(), &["render", "-o", "Again", "--expect-digest", &digest]);
    assert!(matching.status.success());
    assert!(dir.path().join("Again").exists());

    let wrong = "0".repeat(64);
    let mismatched = run(dir.path(), &["render", "-o", "Wrong", "--expect-digest", &wrong]);
    assert!(!mismatched.status.success());
    assert!(String::from_utf8_lossy(&mismatched.stderr).contains("digest mismatch"));
    assert!(!dir.path().join("Wrong").exists());
}

#[test]
fn override_replaces_block_in_place() {
    let dir = workspace();
    fs::write(dir.path().join("user.txt"), "USER nobody\n").unwrap();
    let output = run(dir.path(), &["render", "--override", "USER=user.txt"]);
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let from = text.find("FROM ").unwrap();
    let user = text.find("USER nobody").unwrap();
    let service_path = text.find("ARG SERVICE_PATH").unwrap();
    assert!(from < user && user < service_path);
    assert!(!text.contains("useradd"));
}

#[test]
fn unknown_override_block_fails() {
    let dir = workspace();
    fs::write(dir.path().join("x.txt"), "HEALTHCHECK NONE\n").unwrap();
    let output = run(dir.path(), &["render", "--override", "HEALTHCHECK=x.txt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("HEALTHCHECK"));
}

#[test]
fn missing_required_field_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("spec.yaml"), "user: bentoml\n").unwrap();
    let output = run(dir.path(), &["render", "spec.yaml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("base_image"));
}

#[test]
fn plan_lists_every_block() {
    let dir = workspace();
    let output = run(dir.path(), &["plan"]);
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    for name in ["BASE_IMAGE", "USER", "ENV_VARS", "COMPONENTS", "ENTRYPOINT"] {
        assert!(text.contains(name), "missing {name}");
    }
    assert!(text.contains("digest: sha256:"));
}

#[test]
fn plan_json_tags_instructions_with_blocks() {
    let dir = workspace();
    let output = run(dir.path(), &["plan", "--json"]);
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first = &records.as_array().unwrap()[0];
    assert_eq!(first["block"], "BASE_IMAGE");
    assert!(first["text"].as_str().unwrap().starts_with("FROM "));
}

#[test]
fn blocks_lists_names_in_order() {
    let dir = workspace();
    let output = run(dir.path(), &["blocks"]);
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let names: Vec<_> = text
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .collect();
    assert_eq!(names, ["BASE_IMAGE", "USER", "ENV_VARS", "COMPONENTS", "ENTRYPOINT"]);
}
