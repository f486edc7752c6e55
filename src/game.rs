//! Turn-by-turn game orchestration.
//!
//! `GameState` is an immutable snapshot of a game: the players in turn order
//! (current player first), the decks, the tile waiting to be placed, the
//! board, the score log and the action the game expects next. Each action
//! returns the following state and leaves the previous one untouched, so a
//! rejected action simply keeps the old snapshot.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::board::geometry::{Pos, Rotation};
use crate::board::player::{Occupant, OccupantKind, PlayerColor};
use crate::board::state::{Board, BoardError};
use crate::board::tile::{PlacedTile, Tile, TileKind};
use crate::board::zone::{tile_id_of, Animal, AnimalId, AnimalKind, Meadow, SpecialPower, Water, Zone};
use crate::deck::{DeckError, TileDecks};
use crate::scoring::message::{MessageBoard, TextMaker};
use crate::scoring::points::PointsError;
use crate::territory::area::Area;

/// Minimum number of players in a game.
pub const MIN_PLAYERS: usize = 2;

/// What the game expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    StartGame,
    PlaceTile,
    RetakePawn,
    OccupyTile,
    EndGame,
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("cannot {attempted:?} while the game expects {expected:?}")]
    UnexpectedAction { attempted: Action, expected: Action },

    #[error("a game needs 2 to 5 distinct players, got {0:?}")]
    InvalidPlayers(Vec<PlayerColor>),

    #[error("placed tile {actual} does not match the drawn tile {expected}")]
    WrongTile { expected: u32, actual: u32 },

    #[error("tile placed by {actual:?} during the turn of {expected:?}")]
    WrongPlacer {
        expected: PlayerColor,
        actual: Option<PlayerColor>,
    },

    #[error("tile {0} must be placed without an occupant")]
    PreOccupiedTile(u32),

    #[error("{0:?} cannot be taken back by the current player")]
    InvalidRetake(Occupant),

    #[error("{0:?} is not available on the last placed tile")]
    UnavailableOccupant(Occupant),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Points(#[from] PointsError),

    #[error(transparent)]
    Deck(#[from] DeckError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    players: Vec<PlayerColor>,
    tile_decks: TileDecks,
    tile_to_place: Option<Tile>,
    board: Board,
    next_action: Action,
    message_board: MessageBoard,
}

/// Picks the deer eaten by the tigers of `animals`: one deer per tiger,
/// taking first the deer for which `eaten_first` holds.
fn deer_eaten(animals: &BTreeSet<Animal>, eaten_first: impl Fn(&Animal) -> bool) -> Vec<AnimalId> {
    let tigers = animals.iter().filter(|a| a.kind == AnimalKind::Tiger).count();
    let (mut deer, later): (Vec<&Animal>, Vec<&Animal>) = animals
        .iter()
        .filter(|a| a.kind == AnimalKind::Deer)
        .partition(|a| eaten_first(a));
    deer.extend(later);
    deer.into_iter().take(tigers).map(|a| a.id).collect()
}

impl GameState {
    /// Creates a game waiting for its start tile to be placed.
    pub fn initial(
        players: Vec<PlayerColor>,
        tile_decks: TileDecks,
        text_maker: Arc<dyn TextMaker>,
    ) -> Result<GameState, GameError> {
        let distinct: BTreeSet<PlayerColor> = players.iter().copied().collect();
        if players.len() < MIN_PLAYERS || distinct.len() != players.len() {
            return Err(GameError::InvalidPlayers(players));
        }
        Ok(GameState {
            players,
            tile_decks,
            tile_to_place: None,
            board: Board::empty(),
            next_action: Action::StartGame,
            message_board: MessageBoard::new(text_maker),
        })
    }

    pub fn players(&self) -> &[PlayerColor] {
        &self.players
    }

    pub fn tile_decks(&self) -> &TileDecks {
        &self.tile_decks
    }

    pub fn tile_to_place(&self) -> Option<&Tile> {
        self.tile_to_place.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn next_action(&self) -> Action {
        self.next_action
    }

    pub fn message_board(&self) -> &MessageBoard {
        &self.message_board
    }

    /// Returns the player whose turn it is, if the game is under way.
    pub fn current_player(&self) -> Option<PlayerColor> {
        match self.next_action {
            Action::StartGame | Action::EndGame => None,
            _ => self.players.first().copied(),
        }
    }

    pub fn free_occupants_count(&self, player: PlayerColor, kind: OccupantKind) -> u32 {
        kind.count_per_player()
            .saturating_sub(self.board.occupant_count(player, kind))
    }

    /// Returns the occupants the current player may put on the last placed
    /// tile: one of their free occupants, on a zone whose area nobody holds.
    pub fn last_tile_potential_occupants(&self) -> Result<BTreeSet<Occupant>, GameError> {
        let mut available = BTreeSet::new();
        let (Some(player), Some(tile)) = (self.current_player(), self.board.last_placed_tile()) else {
            return Ok(available);
        };
        if tile.occupant.is_some() {
            return Ok(available);
        }
        for occupant in tile.potential_occupants() {
            if self.free_occupants_count(player, occupant.kind) == 0 {
                continue;
            }
            let Some(zone) = tile.zone_with_id(occupant.zone_id) else {
                continue;
            };
            let occupied = match (&zone, occupant.kind) {
                (Zone::Forest(f), OccupantKind::Pawn) => self.board.forest_area(f)?.is_occupied(),
                (Zone::Meadow(m), OccupantKind::Pawn) => self.board.meadow_area(m)?.is_occupied(),
                (Zone::River(r), OccupantKind::Pawn) => self.board.river_area(r)?.is_occupied(),
                (Zone::River(r), OccupantKind::Hut) => {
                    self.board.river_system_area(&Water::River(*r))?.is_occupied()
                }
                (Zone::Lake(l), OccupantKind::Hut) => {
                    self.board.river_system_area(&Water::Lake(*l))?.is_occupied()
                }
                _ => true,
            };
            if !occupied {
                available.insert(occupant);
            }
        }
        Ok(available)
    }

    fn expect(&self, attempted: Action) -> Result<(), GameError> {
        if self.next_action == attempted {
            Ok(())
        } else {
            Err(GameError::UnexpectedAction { attempted, expected: self.next_action })
        }
    }

    /// Places the start tile at the origin and draws the first tile.
    pub fn with_starting_tile_placed(&self) -> Result<GameState, GameError> {
        self.expect(Action::StartGame)?;
        let start = self
            .tile_decks
            .top_tile(TileKind::Start)
            .cloned()
            .ok_or(DeckError::EmptyDeck(TileKind::Start))?;
        let board = self
            .board
            .with_new_tile(PlacedTile::new(start, None, Rotation::None, Pos::ORIGIN))?;
        let decks = self
            .tile_decks
            .with_top_tile_drawn(TileKind::Start)?
            .with_top_tile_drawn_until(TileKind::Normal, |t| board.could_place_tile(t));
        let tile = decks
            .top_tile(TileKind::Normal)
            .cloned()
            .ok_or(DeckError::EmptyDeck(TileKind::Normal))?;
        Ok(GameState {
            tile_decks: decks.with_top_tile_drawn(TileKind::Normal)?,
            tile_to_place: Some(tile),
            board,
            next_action: Action::PlaceTile,
            ..self.clone()
        })
    }

    /// Places the drawn tile for the current player and applies its power.
    pub fn with_placed_tile(&self, tile: PlacedTile) -> Result<GameState, GameError> {
        self.expect(Action::PlaceTile)?;
        let player = self.players[0];
        if tile.placer != Some(player) {
            return Err(GameError::WrongPlacer { expected: player, actual: tile.placer });
        }
        if let Some(expected) = &self.tile_to_place {
            if *expected != tile.tile {
                return Err(GameError::WrongTile { expected: expected.id, actual: tile.id() });
            }
        }
        if tile.occupant.is_some() {
            return Err(GameError::PreOccupiedTile(tile.id()));
        }

        let power_zone = tile.special_power_zone();
        let pos = tile.pos;
        let mut state = GameState {
            board: self.board.with_new_tile(tile)?,
            tile_to_place: None,
            ..self.clone()
        };

        match power_zone.as_ref().map(|z| (z, z.special_power())) {
            Some((_, Some(SpecialPower::Shaman))) => {
                if state.board.occupant_count(player, OccupantKind::Pawn) > 0 {
                    state.next_action = Action::RetakePawn;
                    return Ok(state);
                }
            }
            Some((Zone::Lake(lake), Some(SpecialPower::Logboat))) => {
                let system = state.board.river_system_area(&Water::Lake(*lake))?;
                state.message_board = state.message_board.with_scored_logboat(player, system)?;
            }
            Some((Zone::Meadow(meadow), Some(SpecialPower::HuntingTrap))) => {
                let adjacent = state.board.adjacent_meadow(pos, meadow)?;
                let animals = adjacent.animals(state.board.cancelled_animals());
                let board = state.board.with_more_cancelled_animals(deer_eaten(&animals, |_| true));
                state.message_board =
                    state
                        .message_board
                        .with_scored_hunting_trap(player, &adjacent, board.cancelled_animals());
                state.board = board.with_more_cancelled_animals(animals.iter().map(|a| a.id));
            }
            _ => {}
        }
        state.with_turn_finished_if_occupation_impossible()
    }

    /// Takes back one of the current player's pawns after a shaman, or
    /// nothing when `occupant` is `None`.
    pub fn with_occupant_removed(&self, occupant: Option<Occupant>) -> Result<GameState, GameError> {
        self.expect(Action::RetakePawn)?;
        let mut state = self.clone();
        if let Some(occupant) = occupant {
            let owner = self
                .board
                .tile_with_id(tile_id_of(occupant.zone_id))?
                .placer;
            if occupant.kind != OccupantKind::Pawn || owner != Some(self.players[0]) {
                return Err(GameError::InvalidRetake(occupant));
            }
            state.board = self.board.without_occupant(occupant)?;
        }
        state.with_turn_finished_if_occupation_impossible()
    }

    /// Occupies the last placed tile, or passes when `occupant` is `None`.
    pub fn with_new_occupant(&self, occupant: Option<Occupant>) -> Result<GameState, GameError> {
        self.expect(Action::OccupyTile)?;
        let mut state = self.clone();
        if let Some(occupant) = occupant {
            if !self.last_tile_potential_occupants()?.contains(&occupant) {
                return Err(GameError::UnavailableOccupant(occupant));
            }
            state.board = self.board.with_occupant(occupant)?;
        }
        state.with_turn_finished()
    }

    fn with_turn_finished_if_occupation_impossible(self) -> Result<GameState, GameError> {
        if self.last_tile_potential_occupants()?.is_empty() {
            self.with_turn_finished()
        } else {
            Ok(GameState { next_action: Action::OccupyTile, ..self })
        }
    }

    fn with_turn_finished(self) -> Result<GameState, GameError> {
        let player = self.players[0];
        let forests = self.board.forests_closed_by_last_tile()?;
        let rivers = self.board.rivers_closed_by_last_tile()?;

        let mut messages = self.message_board.clone();
        for forest in &forests {
            debug!("forest {:?} closed", forest.zone_ids().collect::<Vec<_>>());
            messages = messages.with_scored_forest(forest)?;
        }
        for river in &rivers {
            debug!("river {:?} closed", river.zone_ids().collect::<Vec<_>>());
            messages = messages.with_scored_river(river, self.board.river_fish_count(river))?;
        }
        let board = self.board.without_gatherers_or_fishers_in(&forests, &rivers)?;

        let mut decks = self.tile_decks.clone();
        let placed_normal = board.last_placed_tile().is_some_and(|t| t.kind() == TileKind::Normal);
        if let Some(forest) = forests.iter().find(|f| f.has_menhir()).filter(|_| placed_normal) {
            decks = decks.with_top_tile_drawn_until(TileKind::Menhir, |t| board.could_place_tile(t));
            if let Some(tile) = decks.top_tile(TileKind::Menhir).cloned() {
                debug!("{:?} earns a menhir turn with tile {}", player, tile.id);
                return Ok(GameState {
                    tile_decks: decks.with_top_tile_drawn(TileKind::Menhir)?,
                    tile_to_place: Some(tile),
                    board,
                    next_action: Action::PlaceTile,
                    message_board: messages.with_closed_forest_with_menhir(player, forest),
                    ..self
                });
            }
        }

        decks = decks.with_top_tile_drawn_until(TileKind::Normal, |t| board.could_place_tile(t));
        let Some(tile) = decks.top_tile(TileKind::Normal).cloned() else {
            let state = GameState {
                tile_decks: decks,
                tile_to_place: None,
                board,
                message_board: messages,
                ..self
            };
            return state.with_final_points_counted();
        };
        let mut players = self.players.clone();
        players.rotate_left(1);
        Ok(GameState {
            players,
            tile_decks: decks.with_top_tile_drawn(TileKind::Normal)?,
            tile_to_place: Some(tile),
            board,
            next_action: Action::PlaceTile,
            message_board: messages,
        })
    }

    fn pit_trap_reach(&self, meadow: &Area<Meadow>) -> Result<Option<Area<Meadow>>, GameError> {
        let Some(trap) = meadow.zone_with_power(SpecialPower::PitTrap) else {
            return Ok(None);
        };
        let pos = self.board.tile_with_id(tile_id_of(trap.id))?.pos;
        Ok(Some(self.board.adjacent_meadow(pos, trap)?))
    }

    fn with_final_points_counted(self) -> Result<GameState, GameError> {
        let mut board = self.board.clone();
        let mut messages = self.message_board.clone();

        for meadow in self.board.meadow_areas() {
            let reach = self.pit_trap_reach(meadow)?;
            if meadow.zone_with_power(SpecialPower::Wildfire).is_none() {
                let animals = meadow.animals(board.cancelled_animals());
                let eaten = match &reach {
                    Some(reach) => deer_eaten(&animals, |a| !reach.contains(a.zone_id())),
                    None => deer_eaten(&animals, |_| true),
                };
                board = board.with_more_cancelled_animals(eaten);
            }
            messages = messages.with_scored_meadow(meadow, board.cancelled_animals());
            if let Some(reach) = &reach {
                messages = messages.with_scored_pit_trap(reach, board.cancelled_animals());
            }
        }

        for system in self.board.river_system_areas() {
            messages = messages.with_scored_river_system(system);
            if system.has_lake_with_power(SpecialPower::Raft) {
                messages = messages.with_scored_raft(system)?;
            }
        }

        let totals = messages.points();
        let score = |p: &PlayerColor| totals.get(p).copied().unwrap_or(0);
        let best = self.players.iter().map(score).max().unwrap_or(0);
        let winners: BTreeSet<PlayerColor> =
            self.players.iter().copied().filter(|p| score(p) == best).collect();
        debug!("game over, winners {:?} with {} points", winners, best);

        Ok(GameState {
            board,
            message_board: messages.with_winners(winners, best),
            next_action: Action::EndGame,
            tile_to_place: None,
            ..self
        })
    }
}
