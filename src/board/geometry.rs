//! Grid positions, compass directions and tile rotations.

use std::fmt;

/// A compass direction, in clockwise order starting from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction {
    N = 0,
    E = 1,
    S = 2,
    W = 3,
}

impl Direction {
    /// All directions in clockwise order.
    pub const ALL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    /// Returns the direction reached after turning by `rotation`.
    pub const fn rotated(self, rotation: Rotation) -> Direction {
        Direction::ALL[(self as usize + rotation.quarter_turns_cw()) % 4]
    }

    pub const fn opposite(self) -> Direction {
        self.rotated(Rotation::HalfTurn)
    }
}

/// Clockwise rotation of a tile, in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rotation {
    None = 0,
    Right = 1,
    HalfTurn = 2,
    Left = 3,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::None, Rotation::Right, Rotation::HalfTurn, Rotation::Left];

    pub const fn quarter_turns_cw(self) -> usize {
        self as usize
    }

    pub const fn degrees_cw(self) -> u32 {
        self as u32 * 90
    }

    pub const fn add(self, other: Rotation) -> Rotation {
        Rotation::ALL[(self as usize + other as usize) % 4]
    }

    /// Returns the rotation that undoes this one.
    pub const fn negated(self) -> Rotation {
        Rotation::ALL[(4 - self as usize) % 4]
    }
}

/// A cell of the board grid. `y` grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const ORIGIN: Pos = Pos { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }

    pub const fn translated(self, dx: i32, dy: i32) -> Pos {
        Pos { x: self.x + dx, y: self.y + dy }
    }

    pub const fn neighbor(self, direction: Direction) -> Pos {
        match direction {
            Direction::N => self.translated(0, -1),
            Direction::E => self.translated(1, 0),
            Direction::S => self.translated(0, 1),
            Direction::W => self.translated(-1, 0),
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_directions() {
        assert_eq!(Direction::N.opposite(), Direction::S);
        assert_eq!(Direction::E.opposite(), Direction::W);
        assert_eq!(Direction::W.opposite(), Direction::E);
    }

    #[test]
    fn rotate_directions() {
        assert_eq!(Direction::N.rotated(Rotation::Right), Direction::E);
        assert_eq!(Direction::W.rotated(Rotation::Right), Direction::N);
        assert_eq!(Direction::S.rotated(Rotation::Left), Direction::E);
    }

    #[test]
    fn rotations_compose_and_negate() {
        assert_eq!(Rotation::Right.add(Rotation::Left), Rotation::None);
        assert_eq!(Rotation::HalfTurn.add(Rotation::HalfTurn), Rotation::None);
        assert_eq!(Rotation::Right.negated(), Rotation::Left);
        assert_eq!(Rotation::None.negated(), Rotation::None);
        assert_eq!(Rotation::Left.degrees_cw(), 270);
    }

    #[test]
    fn neighbors_of_origin() {
        assert_eq!(Pos::ORIGIN.neighbor(Direction::N), Pos::new(0, -1));
        assert_eq!(Pos::ORIGIN.neighbor(Direction::E), Pos::new(1, 0));
        assert_eq!(Pos::ORIGIN.neighbor(Direction::S), Pos::new(0, 1));
        assert_eq!(Pos::ORIGIN.neighbor(Direction::W), Pos::new(-1, 0));
        assert_eq!(Pos::new(2, -3).to_string(), "(2, -3)");
    }
}
