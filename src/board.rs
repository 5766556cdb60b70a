//! Board vocabulary: colours, coordinates, moves, and cells.

use std::fmt;

use crate::constants::{GLYPH_BLACK, GLYPH_WHITE, PASS_ENCODING};

/// Stone colour. Black always moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other colour.
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Fingerprint glyph for a stone of this colour.
    pub fn glyph(self) -> char {
        match self {
            Color::Black => GLYPH_BLACK,
            Color::White => GLYPH_WHITE,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// Group identifier: the minimum linear index among the group's stones.
pub type GroupId = usize;

/// A 0-based board coordinate. `x` is the column, `y` the row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Rebuild a position from its row-major index.
    pub fn from_index(index: usize, size: usize) -> Self {
        Self {
            x: index % size,
            y: index / size,
        }
    }

    /// Row-major index of this position on a board of `size`.
    pub fn index(self, size: usize) -> usize {
        self.y * size + self.x
    }

    pub fn is_within(self, size: usize) -> bool {
        self.x < size && self.y < size
    }

    /// Whether the position touches any side of the board.
    pub fn is_on_edge(self, size: usize) -> bool {
        self.x == 0 || self.y == 0 || self.x + 1 == size || self.y + 1 == size
    }

    /// The (up to 4) orthogonal neighbours that lie on the board.
    pub fn neighbors(self, size: usize) -> impl Iterator<Item = Position> {
        let Position { x, y } = self;
        [
            (x > 0).then(|| Position::new(x - 1, y)),
            (x + 1 < size).then(|| Position::new(x + 1, y)),
            (y > 0).then(|| Position::new(x, y - 1)),
            (y + 1 < size).then(|| Position::new(x, y + 1)),
        ]
        .into_iter()
        .flatten()
    }

    /// The (up to 4) diagonal neighbours that lie on the board.
    pub fn diagonal_neighbors(self, size: usize) -> impl Iterator<Item = Position> {
        let Position { x, y } = self;
        [
            (x > 0 && y > 0).then(|| Position::new(x - 1, y - 1)),
            (x + 1 < size && y > 0).then(|| Position::new(x + 1, y - 1)),
            (x > 0 && y + 1 < size).then(|| Position::new(x - 1, y + 1)),
            (x + 1 < size && y + 1 < size).then(|| Position::new(x + 1, y + 1)),
        ]
        .into_iter()
        .flatten()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A move: place a stone for the side to move, or pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Move {
    Pass,
    Play(Position),
}

impl Move {
    /// Export encoding: `pass`, or the row-major index of the played point.
    pub fn encode(self, size: usize) -> String {
        match self {
            Move::Pass => PASS_ENCODING.to_string(),
            Move::Play(pos) => pos.index(size).to_string(),
        }
    }
}

impl From<Position> for Move {
    fn from(pos: Position) -> Self {
        Move::Play(pos)
    }
}

impl From<Option<Position>> for Move {
    fn from(pos: Option<Position>) -> Self {
        pos.map_or(Move::Pass, Move::Play)
    }
}

/// Contents of one board point. A cell has a group iff it has a colour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub colour: Option<Color>,
    pub group: Option<GroupId>,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        colour: None,
        group: None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_in_corner() {
        let mut n: Vec<_> = Position::new(0, 0).neighbors(5).collect();
        n.sort();
        assert_eq!(n, vec![Position::new(0, 1), Position::new(1, 0)]);
        assert_eq!(Position::new(0, 0).diagonal_neighbors(5).count(), 1);
    }

    #[test]
    fn test_neighbors_in_center() {
        let pos = Position::new(2, 2);
        assert_eq!(pos.neighbors(5).count(), 4);
        assert_eq!(pos.diagonal_neighbors(5).count(), 4);
        assert!(!pos.is_on_edge(5));
        assert!(Position::new(4, 2).is_on_edge(5));
    }

    #[test]
    fn test_index_roundtrip() {
        let pos = Position::new(3, 1);
        assert_eq!(pos.index(5), 8);
        assert_eq!(Position::from_index(8, 5), pos);
    }

    #[test]
    fn test_move_encoding() {
        assert_eq!(Move::Pass.encode(9), "pass");
        assert_eq!(Move::from(Position::new(2, 1)).encode(9), "11");
        assert_eq!(Move::from(None::<Position>), Move::Pass);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::Black.to_string(), "black");
        assert_eq!(Color::White.opponent(), Color::Black);
    }
}
