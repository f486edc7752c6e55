//! Meadowlands self-play CLI.
//!
//! Plays random games and writes their score logs as JSONL.
//!
//! Usage:
//!   meadowlands [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --players N     Players per game, 2 to 5 (default: 4)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --occupy P      Probability of occupying a placed tile (default: 0.5)
//!   --deck FILE     Tile catalog in JSON (default: built-in catalog)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress progress and summary output
//!
//! Set `RUST_LOG=debug` to trace placements and scoring.

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::time::Instant;

use meadowlands::selfplay::{self, SelfPlayConfig, SelfPlayError};

fn value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).map(|a| a.parse()) {
        Some(Ok(v)) => v,
        _ => {
            eprintln!("invalid {} value", flag);
            print_usage();
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut output_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.num_games = value(&args, i, "--games");
            }
            "--players" => {
                i += 1;
                config.players = value(&args, i, "--players");
            }
            "--threads" => {
                i += 1;
                config.threads = value(&args, i, "--threads");
            }
            "--seed" => {
                i += 1;
                config.seed = value(&args, i, "--seed");
            }
            "--occupy" => {
                i += 1;
                config.occupy_probability = value(&args, i, "--occupy");
            }
            "--deck" => {
                i += 1;
                config.deck_path = Some(value(&args, i, "--deck"));
            }
            "--output" => {
                i += 1;
                output_path = Some(value(&args, i, "--output"));
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if let Err(e) = run(&config, output_path) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(config: &SelfPlayConfig, output_path: Option<PathBuf>) -> Result<(), SelfPlayError> {
    if !config.quiet {
        eprintln!(
            "Self-play: {} games, {} players, occupy {:.2}, {} threads",
            config.num_games, config.players, config.occupy_probability, config.threads
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(config)?;
    let elapsed = start.elapsed();

    if !config.quiet {
        eprintln!(
            "Completed {} games in {:.1}s ({:.1} games/s)",
            games.len(),
            elapsed.as_secs_f64(),
            games.len() as f64 / elapsed.as_secs_f64().max(1e-9)
        );
        selfplay::print_summary(&games);
    }

    match output_path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(&path)?);
            selfplay::write_jsonl(&games, &mut writer)?;
            if !config.quiet {
                eprintln!("Wrote {} games to {}", games.len(), path.display());
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(&games, &mut writer)?;
        }
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: meadowlands [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N       Number of games to play (default: 10)");
    eprintln!("  --players N     Players per game, 2 to 5 (default: 4)");
    eprintln!("  --threads N     Number of parallel threads (default: 4)");
    eprintln!("  --seed N        Random seed, 0 for entropy (default: 0)");
    eprintln!("  --occupy P      Probability of occupying a placed tile (default: 0.5)");
    eprintln!("  --deck FILE     Tile catalog in JSON (default: built-in catalog)");
    eprintln!("  --output FILE   Output file path (default: stdout)");
    eprintln!("  --quiet         Suppress progress and summary output");
}
