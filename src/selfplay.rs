//! Random self-play games.
//!
//! Plays complete games in which every player picks uniformly among its
//! legal placements and occupies the placed tile with a fixed probability.
//! Each game is seeded on its own so any record can be replayed from its
//! seed. Records are written as JSONL, one game per line.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::board::geometry::Rotation;
use crate::board::player::{Occupant, OccupantKind, PlayerColor};
use crate::board::tile::{PlacedTile, Tile};
use crate::deck::{self, DeckError, TileDecks};
use crate::game::{Action, GameError, GameState, MIN_PLAYERS};
use crate::scoring::message::{Message, PlainTextMaker};

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Players per game, taken in color order.
    pub players: usize,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Probability of occupying a tile when an occupant is available.
    pub occupy_probability: f64,
    /// Tile catalog to play with; the built-in one when unset.
    pub deck_path: Option<PathBuf>,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            players: 4,
            threads: 4,
            seed: 0,
            occupy_probability: 0.5,
            deck_path: None,
            quiet: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error("a game needs 2 to 5 players, got {0}")]
    PlayerCount(usize),

    #[error("no legal placement for tile {0}")]
    NoLegalPlacement(u32),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("self-play worker thread panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A complete self-play game record.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    /// Seed the game was played with.
    pub seed: u64,
    /// Players in turn order.
    pub players: Vec<PlayerColor>,
    /// Tiles on the final board, start tile included.
    pub tiles_placed: usize,
    /// Final score of every player.
    pub points: BTreeMap<PlayerColor, u32>,
    pub winners: Vec<PlayerColor>,
    /// The full score log.
    pub messages: Vec<Message>,
}

/// Returns every legal placement of the tile waiting to be placed.
pub fn legal_placements(state: &GameState) -> Vec<PlacedTile> {
    let (Some(tile), Some(player)) = (state.tile_to_place(), state.current_player()) else {
        return Vec::new();
    };
    let board = state.board();
    let mut placements = Vec::new();
    for pos in board.insertion_positions() {
        for rotation in Rotation::ALL {
            let placed = PlacedTile::new(tile.clone(), Some(player), rotation, pos);
            if board.can_add_tile(&placed) {
                placements.push(placed);
            }
        }
    }
    placements
}

fn own_pawns(state: &GameState) -> Vec<Occupant> {
    state
        .board()
        .placed_tiles()
        .iter()
        .filter(|t| t.placer.is_some() && t.placer == state.current_player())
        .filter_map(|t| t.occupant)
        .filter(|o| o.kind == OccupantKind::Pawn)
        .collect()
}

/// Plays a single game and returns its record.
pub fn play_game(
    config: &SelfPlayConfig,
    tiles: &[Tile],
    game_id: usize,
    seed: u64,
) -> Result<GameRecord, SelfPlayError> {
    if !(MIN_PLAYERS..=PlayerColor::ALL.len()).contains(&config.players) {
        return Err(SelfPlayError::PlayerCount(config.players));
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    let players = PlayerColor::ALL[..config.players].to_vec();
    let decks = TileDecks::shuffled(tiles, &mut rng);
    let occupy = config.occupy_probability.clamp(0.0, 1.0);

    let mut state = GameState::initial(players.clone(), decks, Arc::new(PlainTextMaker))?;
    loop {
        state = match state.next_action() {
            Action::StartGame => state.with_starting_tile_placed()?,
            Action::PlaceTile => {
                let placement = legal_placements(&state)
                    .choose(&mut rng)
                    .cloned()
                    .ok_or_else(|| SelfPlayError::NoLegalPlacement(state.tile_to_place().map_or(0, |t| t.id)))?;
                state.with_placed_tile(placement)?
            }
            Action::RetakePawn => {
                let pawn = if rng.gen_bool(0.5) { own_pawns(&state).choose(&mut rng).copied() } else { None };
                state.with_occupant_removed(pawn)?
            }
            Action::OccupyTile => {
                let options: Vec<Occupant> = state.last_tile_potential_occupants()?.into_iter().collect();
                let occupant = if rng.gen_bool(occupy) { options.choose(&mut rng).copied() } else { None };
                state.with_new_occupant(occupant)?
            }
            Action::EndGame => break,
        };
    }

    let totals = state.message_board().points();
    let points = players.iter().map(|&p| (p, totals.get(&p).copied().unwrap_or(0))).collect();
    let winners = state
        .message_board()
        .messages()
        .last()
        .map(|m| m.scorers.iter().copied().collect())
        .unwrap_or_default();
    Ok(GameRecord {
        game_id,
        seed,
        players,
        tiles_placed: state.board().placed_tiles().len(),
        points,
        winners,
        messages: state.message_board().messages().to_vec(),
    })
}

/// Loads the tiles named by the configuration.
pub fn load_config_tiles(config: &SelfPlayConfig) -> Result<Vec<Tile>, DeckError> {
    match &config.deck_path {
        Some(path) => deck::load_tiles(path),
        None => deck::builtin(),
    }
}

fn game_seed(config: &SelfPlayConfig, game_id: usize) -> u64 {
    if config.seed != 0 {
        config.seed.wrapping_add(game_id as u64)
    } else {
        rand::thread_rng().gen()
    }
}

fn report(config: &SelfPlayConfig, n: usize, game: &GameRecord, elapsed: f64) {
    if config.quiet {
        return;
    }
    let winners: Vec<&str> = game.winners.iter().map(|w| w.name()).collect();
    let best = game.points.values().copied().max().unwrap_or(0);
    eprintln!(
        "Game {}/{}: {} with {} points, {} tiles ({:.2}s)",
        n,
        config.num_games,
        winners.join(" and "),
        best,
        game.tiles_placed,
        elapsed,
    );
}

/// Runs self-play generation, producing multiple game records.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| {
        games.push(game);
    })?;
    games.sort_by_key(|g| g.game_id);
    Ok(games)
}

/// Runs self-play generation, calling `on_game` with each completed game record.
///
/// Games finish in any order when played in parallel. The first failing game
/// aborts the run once the games in flight are done.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    let tiles = load_config_tiles(config)?;
    if config.threads > 1 {
        run_self_play_parallel(config, tiles, on_game)
    } else {
        run_self_play_sequential(config, &tiles, on_game)
    }
}

fn run_self_play_sequential<F>(config: &SelfPlayConfig, tiles: &[Tile], mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let game_start = Instant::now();
        let game = play_game(config, tiles, i, game_seed(config, i))?;
        report(config, i + 1, &game, game_start.elapsed().as_secs_f64());
        on_game(game);
    }
    Ok(())
}

/// Plays games concurrently on a rayon pool and delivers them to the
/// callback on the calling thread through a channel.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, tiles: Vec<Tile>, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<Result<GameRecord, SelfPlayError>>();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(config.threads).build()?;

    let config_clone = config.clone();
    let handle = std::thread::spawn(move || {
        pool.install(|| {
            (0..config_clone.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    let game_start = Instant::now();
                    let result = play_game(&config_clone, &tiles, i, game_seed(&config_clone, i));
                    if let Ok(game) = &result {
                        let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        report(&config_clone, n, game, game_start.elapsed().as_secs_f64());
                    }
                    let _ = tx.send(result);
                });
        });
    });

    let mut first_error = None;
    for result in rx {
        match result {
            Ok(game) => on_game(game),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    handle.join().map_err(|_| SelfPlayError::WorkerPanicked)?;
    first_error.map_or(Ok(()), Err)
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> Result<(), SelfPlayError> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Prints a summary of self-play results to stderr.
pub fn print_summary(games: &[GameRecord]) {
    let total = games.len();
    let mut win_counts: BTreeMap<PlayerColor, usize> = BTreeMap::new();
    let mut total_tiles = 0usize;
    let mut total_best = 0u32;

    for game in games {
        total_tiles += game.tiles_placed;
        total_best += game.points.values().copied().max().unwrap_or(0);
        for &w in &game.winners {
            *win_counts.entry(w).or_insert(0) += 1;
        }
    }

    eprintln!("=== Self-Play Summary ===");
    eprintln!("Games: {}", total);
    eprintln!("Avg tiles/game: {:.1}", total_tiles as f64 / total.max(1) as f64);
    eprintln!("Avg winning score: {:.1}", total_best as f64 / total.max(1) as f64);
    eprintln!("Wins (shared wins count for each winner):");
    for (color, count) in &win_counts {
        let pct = 100.0 * *count as f64 / total.max(1) as f64;
        eprintln!("  {:>8}: {} ({:.1}%)", color.name(), count, pct);
    }
}
