//! CLI tests for colony commands.
//!
//! Spawns the colony binary and verifies exit codes and output for the
//! compose, spawn and tick commands.

use std::process::Command;

use colony::exit_codes;
use colony::io::init::{ColonyPaths, InitOptions, init_colony};
use colony::io::memory_store::load_memory;
use serde_json::Value;

fn colony(root: &std::path::Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_colony"));
    command.arg("--root").arg(root);
    command
}

#[test]
fn compose_prints_guard_body() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = colony(temp.path())
        .args(["compose", "--role", "guard", "--energy", "550"])
        .output()
        .expect("colony compose");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let body: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(body["repeats"], 2);
    assert_eq!(body["cost"], 430);
    assert_eq!(
        body["parts"],
        serde_json::json!(["tough", "tough", "attack", "move", "attack", "move", "work", "carry"])
    );
}

#[test]
fn compose_unaffordable_exits_with_unaffordable_code() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = colony(temp.path())
        .args(["compose", "--role", "miner", "--energy", "299"])
        .output()
        .expect("colony compose");

    assert_eq!(output.status.code(), Some(exit_codes::UNAFFORDABLE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot afford"));
}

#[test]
fn tick_without_init_is_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");

    let status = colony(temp.path())
        .arg("tick")
        .status()
        .expect("colony tick");

    assert_eq!(status.code(), Some(exit_codes::INVALID));
}

#[test]
fn spawn_then_run_records_memory() {
    let temp = tempfile::tempdir().expect("tempdir");
    init_colony(temp.path(), &InitOptions { force: false }).expect("init");

    let status = colony(temp.path())
        .args([
            "spawn",
            "--role",
            "miner",
            "--room",
            "W1N1",
            "--assign-object",
            "source1",
        ])
        .status()
        .expect("colony spawn");
    assert_eq!(status.code(), Some(exit_codes::OK));

    let output = colony(temp.path())
        .args(["run", "--ticks", "2"])
        .output()
        .expect("colony run");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tick 0: 1 creeps, 0 failed"));
    assert!(stdout.contains("tick 1: 1 creeps, 0 failed"));

    let memory = load_memory(&ColonyPaths::new(temp.path()).memory_path).expect("memory");
    assert!(memory.creeps.contains_key("miner_1"));
}

#[test]
fn spawn_without_energy_exits_with_unaffordable_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    init_colony(temp.path(), &InitOptions { force: false }).expect("init");

    let first = colony(temp.path())
        .args(["spawn", "--role", "guard", "--room", "W1N1"])
        .status()
        .expect("colony spawn");
    assert_eq!(first.code(), Some(exit_codes::OK));

    let second = colony(temp.path())
        .args(["spawn", "--role", "guard", "--room", "W1N1"])
        .status()
        .expect("colony spawn");
    assert_eq!(second.code(), Some(exit_codes::UNAFFORDABLE));
}
