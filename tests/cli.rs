use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn tumble() -> Command {
    Command::cargo_bin("tumble").expect("binary exists")
}

fn minimal_wav() -> Vec<u8> {
    let samples: [i16; 4] = [0, 8000, -8000, 0];
    let data_len = (samples.len() * 2) as u32;
    let mut wav = Vec::new();
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&8000u32.to_le_bytes());
    wav.extend_from_slice(&16000u32.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }
    wav
}

#[test]
fn cli_simulates_moves_and_prints_final_state() {
    let mut cmd = tumble();
    cmd.args(["--simulate", "east,east", "--seed", "7"]);
    cmd.assert()
        .success()
        .stdout(contains("Scattered 6 coins (seed 7)"))
        .stdout(contains(" - cube pos=(2.00, 0.50, 0.00)"))
        .stdout(contains(" - moves accepted: 2"));
}

#[test]
fn cli_rejects_moves_past_the_boundary() {
    let mut cmd = tumble();
    cmd.args(["--simulate", "east,east,east,east,east", "--seed", "1"]);
    cmd.assert()
        .success()
        .stdout(contains("move 5 (east) rejected at the boundary"))
        .stdout(contains(" - cube pos=(4.00, 0.50, 0.00)"))
        .stdout(contains(" - moves accepted: 4"));
}

#[test]
fn cli_scatters_coins_reproducibly_for_a_seed() {
    let first = tumble()
        .args(["--headless", "--seed", "42"])
        .output()
        .expect("first run");
    let second = tumble()
        .args(["--headless", "--seed", "42"])
        .output()
        .expect("second run");
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn cli_collects_a_coin_on_the_path() {
    let mut cmd = tumble();
    cmd.args(["--simulate", "east", "--coin", "1,0", "--coin", "-3,-3"]);
    cmd.assert()
        .success()
        .stdout(contains("Scattered 2 coins"))
        .stdout(contains(" - coins remaining: 1"))
        .stdout(contains(" - chimes played: 1"));
}

#[test]
fn cli_counts_a_coin_that_spawns_against_the_cube() {
    let mut cmd = tumble();
    cmd.args(["--headless", "--coin", "0.2,0.2", "--frames", "1"]);
    cmd.assert()
        .success()
        .stdout(contains(" - coins remaining: 0"))
        .stdout(contains(" - chimes played: 1"));
}

#[test]
fn cli_rejects_unknown_arguments() {
    let mut cmd = tumble();
    cmd.arg("--bogus");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument: --bogus"));
}

#[test]
fn cli_dev_mode_loads_the_chime_from_disk() {
    let dir = tempdir().expect("temp dir");
    fs::create_dir(dir.path().join("assets")).expect("assets dir");
    fs::write(dir.path().join("assets/coin.wav"), minimal_wav()).expect("write wav");

    let mut cmd = tumble();
    cmd.current_dir(dir.path());
    cmd.args(["--dev", "--headless", "--seed", "3"]);
    cmd.assert()
        .success()
        .stdout(contains(" - coins remaining:"));
}

#[test]
fn cli_dev_mode_needs_the_chime_on_disk() {
    let dir = tempdir().expect("temp dir");

    let mut cmd = tumble();
    cmd.current_dir(dir.path());
    cmd.args(["--dev", "--headless"]);
    cmd.assert()
        .failure()
        .stderr(contains("failed to read chime asset"));
}
