//! The score log.
//!
//! Every scoring event appends a `Message` carrying its text, the points
//! awarded, the players scoring them and the tiles involved. Text comes
//! from a `TextMaker`, which the log only calls and never interprets.
//! Events worth no points, and events on unoccupied areas, are not logged.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use super::points::{self, PointsError};
use crate::board::player::PlayerColor;
use crate::board::zone::{Animal, AnimalId, AnimalKind, Forest, Meadow, River, TileId, Water};
use crate::territory::area::Area;

/// Number of animals of each kind.
pub type AnimalCounts = BTreeMap<AnimalKind, u32>;

/// Counts the given animals by kind.
pub fn animal_counts<'a>(animals: impl IntoIterator<Item = &'a Animal>) -> AnimalCounts {
    let mut counts = AnimalCounts::new();
    for animal in animals {
        *counts.entry(animal.kind).or_insert(0) += 1;
    }
    counts
}

fn meadow_points(counts: &AnimalCounts) -> u32 {
    let count = |kind: AnimalKind| counts.get(&kind).copied().unwrap_or(0);
    points::for_meadow(count(AnimalKind::Mammoth), count(AnimalKind::Aurochs), count(AnimalKind::Deer))
}

/// Produces the user-facing text of scoring events.
pub trait TextMaker: fmt::Debug + Send + Sync {
    fn player_name(&self, player: PlayerColor) -> String;

    fn points(&self, points: u32) -> String;

    fn players_scored_forest(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        mushroom_group_count: u32,
        tile_count: u32,
    ) -> String;

    fn player_closed_forest_with_menhir(&self, player: PlayerColor) -> String;

    fn players_scored_river(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        fish_count: u32,
        tile_count: u32,
    ) -> String;

    fn player_scored_hunting_trap(&self, scorer: PlayerColor, points: u32, animals: &AnimalCounts) -> String;

    fn player_scored_logboat(&self, scorer: PlayerColor, points: u32, lake_count: u32) -> String;

    fn players_scored_meadow(&self, scorers: &BTreeSet<PlayerColor>, points: u32, animals: &AnimalCounts) -> String;

    fn players_scored_river_system(&self, scorers: &BTreeSet<PlayerColor>, points: u32, fish_count: u32) -> String;

    fn players_scored_pit_trap(&self, scorers: &BTreeSet<PlayerColor>, points: u32, animals: &AnimalCounts) -> String;

    fn players_scored_raft(&self, scorers: &BTreeSet<PlayerColor>, points: u32, lake_count: u32) -> String;

    fn players_won(&self, winners: &BTreeSet<PlayerColor>, points: u32) -> String;
}

/// English text without any markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextMaker;

impl PlainTextMaker {
    fn names(&self, players: &BTreeSet<PlayerColor>) -> String {
        let names: Vec<String> = players.iter().map(|&p| self.player_name(p)).collect();
        match names.as_slice() {
            [] => String::from("nobody"),
            [one] => one.clone(),
            [init @ .., last] => format!("{} and {}", init.join(", "), last),
        }
    }

    fn verb(players: &BTreeSet<PlayerColor>) -> &'static str {
        if players.len() == 1 {
            "has"
        } else {
            "have"
        }
    }

    fn animals(counts: &AnimalCounts) -> String {
        let parts: Vec<String> = counts
            .iter()
            .filter(|&(&kind, &n)| n > 0 && kind != AnimalKind::Tiger)
            .map(|(kind, n)| {
                let name = match kind {
                    AnimalKind::Mammoth => "mammoth",
                    AnimalKind::Aurochs => "aurochs",
                    AnimalKind::Deer => "deer",
                    AnimalKind::Tiger => "tiger",
                };
                format!("{n} {name}")
            })
            .collect();
        parts.join(", ")
    }
}

impl TextMaker for PlainTextMaker {
    fn player_name(&self, player: PlayerColor) -> String {
        player.name().to_string()
    }

    fn points(&self, points: u32) -> String {
        if points == 1 {
            String::from("1 point")
        } else {
            format!("{points} points")
        }
    }

    fn players_scored_forest(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        mushroom_group_count: u32,
        tile_count: u32,
    ) -> String {
        format!(
            "{} {} scored {} for a forest of {} tiles with {} mushroom groups",
            self.names(scorers),
            Self::verb(scorers),
            self.points(points),
            tile_count,
            mushroom_group_count
        )
    }

    fn player_closed_forest_with_menhir(&self, player: PlayerColor) -> String {
        format!("{} closed a forest with a menhir and may place a menhir tile", self.player_name(player))
    }

    fn players_scored_river(
        &self,
        scorers: &BTreeSet<PlayerColor>,
        points: u32,
        fish_count: u32,
        tile_count: u32,
    ) -> String {
        format!(
            "{} {} scored {} for a river of {} tiles with {} fish",
            self.names(scorers),
            Self::verb(scorers),
            self.points(points),
            tile_count,
            fish_count
        )
    }

    fn player_scored_hunting_trap(&self, scorer: PlayerColor, points: u32, animals: &AnimalCounts) -> String {
        format!(
            "{} scored {} with a hunting trap ({})",
            self.player_name(scorer),
            self.points(points),
            Self::animals(animals)
        )
    }

    fn player_scored_logboat(&self, scorer: PlayerColor, points: u32, lake_count: u32) -> String {
        format!(
            "{} scored {} with a logboat on a system of {} lakes",
            self.player_name(scorer),
            self.points(points),
            lake_count
        )
    }

    fn players_scored_meadow(&self, scorers: &BTreeSet<PlayerColor>, points: u32, animals: &AnimalCounts) -> String {
        format!(
            "{} {} scored {} for a meadow ({})",
            self.names(scorers),
            Self::verb(scorers),
            self.points(points),
            Self::animals(animals)
        )
    }

    fn players_scored_river_system(&self, scorers: &BTreeSet<PlayerColor>, points: u32, fish_count: u32) -> String {
        format!(
            "{} {} scored {} for a river system with {} fish",
            self.names(scorers),
            Self::verb(scorers),
            self.points(points),
            fish_count
        )
    }

    fn players_scored_pit_trap(&self, scorers: &BTreeSet<PlayerColor>, points: u32, animals: &AnimalCounts) -> String {
        format!(
            "{} {} scored {} with a pit trap ({})",
            self.names(scorers),
            Self::verb(scorers),
            self.points(points),
            Self::animals(animals)
        )
    }

    fn players_scored_raft(&self, scorers: &BTreeSet<PlayerColor>, points: u32, lake_count: u32) -> String {
        format!(
            "{} {} scored {} with a raft on a system of {} lakes",
            self.names(scorers),
            Self::verb(scorers),
            self.points(points),
            lake_count
        )
    }

    fn players_won(&self, winners: &BTreeSet<PlayerColor>, points: u32) -> String {
        format!("{} won with {}", self.names(winners), self.points(points))
    }
}

/// One entry of the score log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub text: String,
    pub points: u32,
    pub scorers: BTreeSet<PlayerColor>,
    /// Tiles involved in the event, for highlighting.
    pub tile_ids: BTreeSet<TileId>,
}

/// The append-only score log of a game.
#[derive(Debug, Clone)]
pub struct MessageBoard {
    text_maker: Arc<dyn TextMaker>,
    messages: Vec<Message>,
}

impl PartialEq for MessageBoard {
    fn eq(&self, other: &Self) -> bool {
        self.messages == other.messages
    }
}

impl Eq for MessageBoard {}

impl MessageBoard {
    pub fn new(text_maker: Arc<dyn TextMaker>) -> Self {
        MessageBoard { text_maker, messages: Vec::new() }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn text_maker(&self) -> &dyn TextMaker {
        self.text_maker.as_ref()
    }

    /// Returns the total points of every player who scored at least once.
    pub fn points(&self) -> BTreeMap<PlayerColor, u32> {
        let mut totals = BTreeMap::new();
        for message in &self.messages {
            for &scorer in &message.scorers {
                *totals.entry(scorer).or_insert(0) += message.points;
            }
        }
        totals
    }

    fn with_message(
        &self,
        text: String,
        points: u32,
        scorers: BTreeSet<PlayerColor>,
        tile_ids: BTreeSet<TileId>,
    ) -> MessageBoard {
        debug!("{text}");
        let mut board = self.clone();
        board.messages.push(Message { text, points, scorers, tile_ids });
        board
    }

    pub fn with_scored_forest(&self, forest: &Area<Forest>) -> Result<MessageBoard, PointsError> {
        if !forest.is_occupied() {
            return Ok(self.clone());
        }
        let tile_ids = forest.tile_ids();
        let tile_count = tile_ids.len() as u32;
        let mushrooms = forest.mushroom_group_count();
        let points = points::for_closed_forest(tile_count, mushrooms)?;
        let scorers = forest.majority_occupants();
        let text = self.text_maker.players_scored_forest(&scorers, points, mushrooms, tile_count);
        Ok(self.with_message(text, points, scorers, tile_ids))
    }

    /// Records that `player` earned a menhir turn. Worth no points.
    pub fn with_closed_forest_with_menhir(&self, player: PlayerColor, forest: &Area<Forest>) -> MessageBoard {
        let text = self.text_maker.player_closed_forest_with_menhir(player);
        self.with_message(text, 0, BTreeSet::new(), forest.tile_ids())
    }

    /// Scores a closed river whose fish, lakes included, number `fish_count`.
    pub fn with_scored_river(&self, river: &Area<River>, fish_count: u32) -> Result<MessageBoard, PointsError> {
        if !river.is_occupied() {
            return Ok(self.clone());
        }
        let tile_ids = river.tile_ids();
        let tile_count = tile_ids.len() as u32;
        let points = points::for_closed_river(tile_count, fish_count)?;
        let scorers = river.majority_occupants();
        let text = self.text_maker.players_scored_river(&scorers, points, fish_count, tile_count);
        Ok(self.with_message(text, points, scorers, tile_ids))
    }

    /// Scores the uncancelled animals of the meadow next to a hunting trap
    /// for the player who placed it.
    pub fn with_scored_hunting_trap(
        &self,
        scorer: PlayerColor,
        adjacent_meadow: &Area<Meadow>,
        cancelled: &BTreeSet<AnimalId>,
    ) -> MessageBoard {
        let counts = animal_counts(&adjacent_meadow.animals(cancelled));
        let points = meadow_points(&counts);
        if points == 0 {
            return self.clone();
        }
        let text = self.text_maker.player_scored_hunting_trap(scorer, points, &counts);
        self.with_message(text, points, BTreeSet::from([scorer]), adjacent_meadow.tile_ids())
    }

    pub fn with_scored_logboat(
        &self,
        scorer: PlayerColor,
        river_system: &Area<Water>,
    ) -> Result<MessageBoard, PointsError> {
        let lakes = river_system.lake_count();
        let points = points::for_logboat(lakes)?;
        let text = self.text_maker.player_scored_logboat(scorer, points, lakes);
        Ok(self.with_message(text, points, BTreeSet::from([scorer]), river_system.tile_ids()))
    }

    pub fn with_scored_meadow(&self, meadow: &Area<Meadow>, cancelled: &BTreeSet<AnimalId>) -> MessageBoard {
        if !meadow.is_occupied() {
            return self.clone();
        }
        let counts = animal_counts(&meadow.animals(cancelled));
        let points = meadow_points(&counts);
        if points == 0 {
            return self.clone();
        }
        let scorers = meadow.majority_occupants();
        let text = self.text_maker.players_scored_meadow(&scorers, points, &counts);
        self.with_message(text, points, scorers, meadow.tile_ids())
    }

    pub fn with_scored_river_system(&self, river_system: &Area<Water>) -> MessageBoard {
        if !river_system.is_occupied() {
            return self.clone();
        }
        let fish = river_system.fish_count();
        let points = points::for_river_system(fish);
        if points == 0 {
            return self.clone();
        }
        let scorers = river_system.majority_occupants();
        let text = self.text_maker.players_scored_river_system(&scorers, points, fish);
        self.with_message(text, points, scorers, river_system.tile_ids())
    }

    /// Scores the part of a meadow within reach of a pit trap for the
    /// majority occupants of the whole meadow.
    pub fn with_scored_pit_trap(&self, adjacent_meadow: &Area<Meadow>, cancelled: &BTreeSet<AnimalId>) -> MessageBoard {
        if !adjacent_meadow.is_occupied() {
            return self.clone();
        }
        let counts = animal_counts(&adjacent_meadow.animals(cancelled));
        let points = meadow_points(&counts);
        if points == 0 {
            return self.clone();
        }
        let scorers = adjacent_meadow.majority_occupants();
        let text = self.text_maker.players_scored_pit_trap(&scorers, points, &counts);
        self.with_message(text, points, scorers, adjacent_meadow.tile_ids())
    }

    pub fn with_scored_raft(&self, river_system: &Area<Water>) -> Result<MessageBoard, PointsError> {
        if !river_system.is_occupied() {
            return Ok(self.clone());
        }
        let lakes = river_system.lake_count();
        let points = points::for_raft(lakes)?;
        let scorers = river_system.majority_occupants();
        let text = self.text_maker.players_scored_raft(&scorers, points, lakes);
        Ok(self.with_message(text, points, scorers, river_system.tile_ids()))
    }

    /// Announces the winners. The message carries their score but adds no
    /// points to anyone's total.
    pub fn with_winners(&self, winners: BTreeSet<PlayerColor>, points: u32) -> MessageBoard {
        let text = self.text_maker.players_won(&winners, points);
        debug!("{text}");
        let mut board = self.clone();
        board.messages.push(Message { text, points: 0, scorers: winners, tile_ids: BTreeSet::new() });
        board
    }
}
