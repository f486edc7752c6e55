//! End-to-end placement and scoring scenarios on the built-in tile catalog.

use std::collections::BTreeSet;
use std::sync::Arc;

use meadowlands::board::{
    zone_id, Board, BoardError, Occupant, OccupantKind, PlacedTile, PlayerColor, Pos, Rotation, Tile, TileKind,
};
use meadowlands::deck::{self, TileDecks};
use meadowlands::game::{Action, GameError, GameState};
use meadowlands::scoring::PlainTextMaker;
use meadowlands::selfplay::{self, SelfPlayConfig, SelfPlayError};

const START: u32 = 56;
/// Forest end on its north side, plain meadow elsewhere.
const FOREST_END: u32 = 0;
/// Like `FOREST_END`, with mushrooms in the forest and a deer in the meadow.
const MUSHROOM_FOREST_END: u32 = 1;

fn tile(id: u32) -> Tile {
    deck::builtin()
        .expect("built-in catalog")
        .into_iter()
        .find(|t| t.id == id)
        .expect("tile in catalog")
}

fn start_board() -> Board {
    Board::empty()
        .with_new_tile(PlacedTile::new(tile(START), None, Rotation::None, Pos::ORIGIN))
        .expect("start tile")
}

/// The forest end turned to face west, against the start tile's east forest.
fn forest_end_east(placer: PlayerColor) -> PlacedTile {
    PlacedTile::new(tile(FOREST_END), Some(placer), Rotation::Left, Pos::new(1, 0))
}

#[test]
fn catalog_has_one_start_tile() {
    let tiles = deck::builtin().unwrap();
    let starts: Vec<&Tile> = tiles.iter().filter(|t| t.kind == TileKind::Start).collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].id, START);
    assert!(tiles.iter().any(|t| t.kind == TileKind::Menhir));
}

#[test]
fn start_tile_opens_four_positions() {
    let board = start_board();
    let positions = board.insertion_positions();
    let expected: BTreeSet<Pos> = [Pos::new(0, -1), Pos::new(1, 0), Pos::new(0, 1), Pos::new(-1, 0)].into();
    assert_eq!(positions, expected);
}

#[test]
fn forest_tile_merges_with_start_forest() {
    let board = start_board().with_new_tile(forest_end_east(PlayerColor::Red)).unwrap();

    let forest = board.tile_with_id(FOREST_END).unwrap().forest_zones()[0];
    let area = board.forest_area(&forest).unwrap();
    let ids: Vec<u32> = area.zone_ids().collect();
    assert_eq!(ids, vec![zone_id(FOREST_END, 0), zone_id(START, 1)]);
    // Two forest sides on the start tile, one on the new tile, one pair joined.
    assert_eq!(area.open_connections(), 1);
    assert!(!area.is_closed());
    assert!(area.occupants().is_empty());
}

#[test]
fn mismatched_side_is_rejected() {
    let board = start_board();
    let meadow_facing = PlacedTile::new(tile(FOREST_END), Some(PlayerColor::Red), Rotation::None, Pos::new(1, 0));
    assert!(!board.can_add_tile(&meadow_facing));
    assert!(matches!(
        board.with_new_tile(meadow_facing),
        Err(BoardError::IllegalPlacement { .. })
    ));
}

#[test]
fn occupying_the_new_forest_marks_the_whole_area() {
    let board = start_board()
        .with_new_tile(forest_end_east(PlayerColor::Red))
        .unwrap()
        .with_occupant(Occupant::new(OccupantKind::Pawn, zone_id(FOREST_END, 0)))
        .unwrap();

    let start_forest = board.tile_with_id(START).unwrap().forest_zones()[0];
    let area = board.forest_area(&start_forest).unwrap();
    assert_eq!(area.occupants(), &[PlayerColor::Red]);
    assert_eq!(board.occupant_count(PlayerColor::Red, OccupantKind::Pawn), 1);
}

#[test]
fn second_forest_end_closes_the_forest() {
    let board = start_board()
        .with_new_tile(forest_end_east(PlayerColor::Red))
        .unwrap()
        .with_new_tile(PlacedTile::new(
            tile(MUSHROOM_FOREST_END),
            Some(PlayerColor::Blue),
            Rotation::None,
            Pos::new(0, 1),
        ))
        .unwrap();

    let closed = board.forests_closed_by_last_tile().unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].zones().len(), 3);
    assert_eq!(closed[0].mushroom_group_count(), 2);
    assert!(board.rivers_closed_by_last_tile().unwrap().is_empty());
}

/// Red occupies the forest, Blue closes it, the decks run out.
#[test]
fn scripted_two_player_game() {
    let decks = TileDecks::new(vec![tile(START)], vec![tile(FOREST_END), tile(MUSHROOM_FOREST_END)], vec![]);
    let players = vec![PlayerColor::Red, PlayerColor::Blue];
    let state = GameState::initial(players, decks, Arc::new(PlainTextMaker)).unwrap();

    let state = state.with_starting_tile_placed().unwrap();
    assert_eq!(state.next_action(), Action::PlaceTile);
    assert_eq!(state.current_player(), Some(PlayerColor::Red));
    assert_eq!(state.tile_to_place().map(|t| t.id), Some(FOREST_END));

    let state = state.with_placed_tile(forest_end_east(PlayerColor::Red)).unwrap();
    assert_eq!(state.next_action(), Action::OccupyTile);
    let pawn = Occupant::new(OccupantKind::Pawn, zone_id(FOREST_END, 0));
    assert!(state.last_tile_potential_occupants().unwrap().contains(&pawn));
    let state = state.with_new_occupant(Some(pawn)).unwrap();

    assert_eq!(state.current_player(), Some(PlayerColor::Blue));
    let closing = PlacedTile::new(tile(MUSHROOM_FOREST_END), Some(PlayerColor::Blue), Rotation::None, Pos::new(0, 1));
    let state = state.with_placed_tile(closing).unwrap();

    // The forest is already Red's; only the meadow is left for Blue.
    let options = state.last_tile_potential_occupants().unwrap();
    assert_eq!(
        options.into_iter().collect::<Vec<_>>(),
        vec![Occupant::new(OccupantKind::Pawn, zone_id(MUSHROOM_FOREST_END, 1))]
    );
    let state = state.with_new_occupant(None).unwrap();

    assert_eq!(state.next_action(), Action::EndGame);
    assert!(state.board().occupants().is_empty(), "gatherers go home");

    let points = state.message_board().points();
    // Three tiles and two mushroom groups.
    assert_eq!(points.get(&PlayerColor::Red), Some(&12));
    assert_eq!(points.get(&PlayerColor::Blue), None);

    let last = state.message_board().messages().last().unwrap();
    assert_eq!(last.text, "red won with 12 points");
    assert_eq!(last.scorers.iter().copied().collect::<Vec<_>>(), vec![PlayerColor::Red]);
}

#[test]
fn acting_out_of_turn_is_an_error() {
    let decks = TileDecks::new(vec![tile(START)], vec![tile(FOREST_END)], vec![]);
    let state = GameState::initial(vec![PlayerColor::Red, PlayerColor::Blue], decks, Arc::new(PlainTextMaker)).unwrap();
    assert!(matches!(
        state.with_placed_tile(forest_end_east(PlayerColor::Red)),
        Err(GameError::UnexpectedAction { attempted: Action::PlaceTile, expected: Action::StartGame })
    ));

    let state = state.with_starting_tile_placed().unwrap();
    assert!(matches!(
        state.with_placed_tile(forest_end_east(PlayerColor::Blue)),
        Err(GameError::WrongPlacer { .. })
    ));
}

#[test]
fn random_game_runs_to_completion() {
    let config = SelfPlayConfig { players: 3, occupy_probability: 0.8, quiet: true, ..Default::default() };
    let tiles = deck::builtin().unwrap();
    let record = selfplay::play_game(&config, &tiles, 0, 1234).unwrap();

    assert!(record.tiles_placed > 1 && record.tiles_placed <= tiles.len());
    assert_eq!(record.points.len(), 3);
    let best = record.points.values().copied().max().unwrap();
    for winner in &record.winners {
        assert_eq!(record.points[winner], best);
    }
    let scored: u32 = record.messages.iter().map(|m| m.points * m.scorers.len() as u32).sum();
    assert_eq!(scored, record.points.values().sum::<u32>());
}

#[test]
fn random_games_are_reproducible() {
    let config = SelfPlayConfig { quiet: true, ..Default::default() };
    let tiles = deck::builtin().unwrap();
    let a = selfplay::play_game(&config, &tiles, 0, 77).unwrap();
    let b = selfplay::play_game(&config, &tiles, 0, 77).unwrap();
    assert_eq!(a.points, b.points);
    assert_eq!(a.messages, b.messages);
}

#[test]
fn one_player_is_not_a_game() {
    let config = SelfPlayConfig { players: 1, quiet: true, ..Default::default() };
    let tiles = deck::builtin().unwrap();
    assert!(matches!(
        selfplay::play_game(&config, &tiles, 0, 1),
        Err(SelfPlayError::PlayerCount(1))
    ));
}
