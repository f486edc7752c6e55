//! Integration tests for the meadowlands self-play binary.
//!
//! Spawns the binary with a fixed seed and checks the JSONL game records it
//! writes to stdout.

use std::process::{Command, Output, Stdio};

use serde_json::Value;

/// Runs the binary with `args` and returns its output.
fn run_meadowlands(args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_meadowlands");
    Command::new(exe)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("failed to run meadowlands")
}

fn records(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is a JSON record"))
        .collect()
}

#[test]
fn writes_one_record_per_game() {
    let output = run_meadowlands(&["--games", "2", "--threads", "1", "--seed", "5", "--quiet"]);
    assert!(output.status.success());

    let games = records(&output);
    assert_eq!(games.len(), 2);
    for (i, game) in games.iter().enumerate() {
        assert_eq!(game["game_id"].as_u64(), Some(i as u64));
        assert_eq!(game["players"].as_array().map(Vec::len), Some(4));
        assert!(game["tiles_placed"].as_u64().is_some_and(|n| n >= 1));
        assert!(!game["winners"].as_array().expect("winners").is_empty());
    }
}

#[test]
fn record_points_match_the_winning_message() {
    let output = run_meadowlands(&["--games", "1", "--threads", "1", "--seed", "11", "--players", "3", "--quiet"]);
    assert!(output.status.success());

    let games = records(&output);
    let game = &games[0];
    let points = game["points"].as_object().expect("points");
    assert_eq!(points.len(), 3);

    let best = points.values().filter_map(Value::as_u64).max().expect("scores");
    for winner in game["winners"].as_array().expect("winners") {
        let name = winner.as_str().expect("color name");
        assert_eq!(points[name].as_u64(), Some(best));
    }

    let last = game["messages"].as_array().and_then(|m| m.last()).expect("messages");
    assert!(last["text"].as_str().is_some_and(|t| t.contains(" won with ")));
    assert_eq!(last["points"].as_u64(), Some(0));
}

#[test]
fn same_seed_same_games() {
    let args = ["--games", "3", "--threads", "2", "--seed", "42", "--quiet"];
    let first = run_meadowlands(&args);
    let second = run_meadowlands(&args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn output_file_receives_records() {
    let path = std::env::temp_dir().join(format!("meadowlands-{}.jsonl", std::process::id()));
    let path_arg = path.to_string_lossy().into_owned();
    let output = run_meadowlands(&["--games", "2", "--threads", "1", "--seed", "9", "--quiet", "--output", &path_arg]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written = std::fs::read_to_string(&path).expect("output file");
    std::fs::remove_file(&path).ok();
    assert_eq!(written.lines().count(), 2);
}

#[test]
fn rejects_single_player() {
    let output = run_meadowlands(&["--games", "1", "--players", "1", "--quiet"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("2 to 5 players"));
}

#[test]
fn rejects_unknown_argument() {
    let output = run_meadowlands(&["--bogus"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown argument: --bogus"));
}

#[test]
fn help_prints_usage() {
    let output = run_meadowlands(&["--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage: meadowlands"));
}

#[test]
fn missing_deck_file_fails() {
    let output = run_meadowlands(&["--games", "1", "--deck", "/nonexistent/tiles.json", "--quiet"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error:"));
}
