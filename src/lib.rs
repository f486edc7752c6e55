//! Meadowlands rule engine library.
//!
//! Exposes the board, territory partitions, scoring, decks, game
//! orchestration and self-play modules for use by integration tests and the
//! binary entry point.

pub mod board;
pub mod deck;
pub mod game;
pub mod scoring;
pub mod selfplay;
pub mod territory;
