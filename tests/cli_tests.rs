//! Integration tests for the `modgraph` binary using `assert_cmd`.
//!
//! Each test copies a modules file into a temporary directory and invokes the
//! compiled binary there, checking stdout, stderr, emitted files and the exit
//! status.

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use predicates::prelude::*;
use rstest::{fixture, rstest};
use std::fs;
use tempfile::{TempDir, tempdir};

const SAMPLE: &str = "tests/data/multiplatform.txt";

#[fixture]
fn workspace() -> TempDir {
    let temp = tempdir().expect("create temp dir");
    fs::copy(SAMPLE, temp.path().join("modules.txt")).expect("copy sample modules file");
    temp
}

fn modgraph() -> Result<Command> {
    let mut cmd = Command::cargo_bin("modgraph").context("locate modgraph binary")?;
    cmd.env_remove("MODGRAPH_FILE").env_remove("MODGRAPH_VERBOSE");
    Ok(cmd)
}

#[rstest]
fn check_is_the_default_command(workspace: TempDir) -> Result<()> {
    modgraph()?
        .current_dir(workspace.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("00_core [common]\n01_core-jvm [jvm, edit]\n"))
        .stdout(predicate::str::contains("04_testkit (placeholder)"))
        .stdout(predicate::str::contains("app -> annotations [provided]"))
        .stdout(predicate::str::is_match(r"(?m)^fingerprint: [0-9a-f]{64}$")?);
    Ok(())
}

#[rstest]
fn fingerprint_is_stable_across_runs(workspace: TempDir) -> Result<()> {
    let first = modgraph()?.current_dir(workspace.path()).output()?;
    let second = modgraph()?.current_dir(workspace.path()).arg("check").output()?;
    ensure!(first.status.success() && second.status.success(), "check should succeed");
    ensure!(first.stdout == second.stdout, "check output should be deterministic");
    Ok(())
}

#[rstest]
fn check_warns_about_cycles() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    fs::write(temp.path().join("modules.txt"), "a -> b\nb -> a\n")?;
    modgraph()?
        .current_dir(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("module graph contains a cycle"))
        .stderr(predicate::str::contains("a -> b -> a"));
    Ok(())
}

#[rstest]
fn graph_prints_dot(workspace: TempDir) -> Result<()> {
    modgraph()?
        .current_dir(workspace.path())
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph \"modules.txt\" {\n"))
        .stdout(predicate::str::contains("\"testkit\" [style=dotted];"))
        .stdout(predicate::str::contains("\"app\" -> \"core-jvm\" [style=bold];"))
        .stdout(predicate::str::ends_with("}\n"));
    Ok(())
}

#[rstest]
fn directory_option_resolves_file_and_emit(workspace: TempDir) -> Result<()> {
    let dir = workspace.path().to_str().context("utf-8 temp path")?;
    modgraph()?
        .args(["-C", dir, "graph", "--emit", "graph.dot"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let dot = fs::read_to_string(workspace.path().join("graph.dot")).context("read graph.dot")?;
    ensure!(dot.contains("\"core-js\" -> \"core\" [style=dashed];"), "dot: {dot}");
    Ok(())
}

#[rstest]
fn json_pretty_prints_graph(workspace: TempDir) -> Result<()> {
    let output = modgraph()?
        .current_dir(workspace.path())
        .args(["json", "--pretty"])
        .output()
        .context("run modgraph json")?;
    ensure!(output.status.success(), "json should succeed");
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    ensure!(value["modules"]["core-js"]["platform"] == "js", "json: {value}");
    ensure!(
        value["modules"]["core-js"]["settings"]["implemented_module_names"][0] == "core",
        "json: {value}"
    );
    ensure!(value["dependencies"][3]["scope"] == "test", "json: {value}");
    Ok(())
}

#[rstest]
fn file_option_reads_from_env(workspace: TempDir) -> Result<()> {
    fs::rename(
        workspace.path().join("modules.txt"),
        workspace.path().join("deps.txt"),
    )?;
    modgraph()?
        .current_dir(workspace.path())
        .env("MODGRAPH_FILE", "deps.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("00_core [common]"));
    Ok(())
}

#[rstest]
fn invalid_file_fails_with_located_diagnostic() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    fs::write(temp.path().join("modules.txt"), "a\na -> b [bogus]\n")?;
    modgraph()?
        .current_dir(temp.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid module graph"))
        .stderr(predicate::str::contains("modules.txt:2:9"))
        .stderr(predicate::str::contains("bogus"));
    Ok(())
}

#[rstest]
fn missing_file_fails() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    modgraph()?
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no `modules.txt` found"));
    Ok(())
}
