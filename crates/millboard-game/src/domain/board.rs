//! Board vocabulary: colors, phases, cells, positions, and the 24-cell board.

use std::fmt;

use millboard_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Number of positions on the board.
pub const BOARD_SIZE: usize = 24;

/// A side in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// White moves first.
    White,
    /// Black moves second.
    Black,
}

impl Color {
    /// Returns the other side.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("white"),
            Color::Black => f.write_str("black"),
        }
    }
}

/// Caller-managed stage of the game. The store records it and never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Pieces are being placed from hand.
    #[default]
    Place,
    /// Pieces move along board edges.
    Move,
    /// A side reduced to three pieces may jump anywhere.
    Fly,
    /// Any other stage a caller wants to track.
    Custom(String),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Place => f.write_str("place"),
            Phase::Move => f.write_str("move"),
            Phase::Fly => f.write_str("fly"),
            Phase::Custom(name) => f.write_str(name),
        }
    }
}

/// One board position: who occupies it and how it is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Occupying side, `None` when empty.
    pub color: Option<Color>,
    /// Highlight tag for the presentation layer, `None` when not highlighted.
    pub highlighted: Option<Color>,
}

impl Cell {
    /// An empty, unhighlighted cell.
    pub const EMPTY: Cell = Cell {
        color: None,
        highlighted: None,
    };

    /// An unhighlighted cell occupied by `color`.
    #[must_use]
    pub fn occupied(color: Color) -> Self {
        Self {
            color: Some(color),
            highlighted: None,
        }
    }

    /// Returns `true` if no piece sits here.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
    }

    /// The same cell with its highlight cleared.
    #[must_use]
    pub fn unhighlighted(self) -> Self {
        Self {
            highlighted: None,
            ..self
        }
    }
}

/// A board index known to lie in `[0, BOARD_SIZE)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Position(u8);

impl Position {
    /// Validates a caller-supplied board index.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if `index` is off the board.
    pub fn new(index: usize) -> Result<Self, DomainError> {
        match u8::try_from(index) {
            Ok(raw) if index < BOARD_SIZE => Ok(Self(raw)),
            _ => Err(DomainError::InvalidArgument(format!(
                "location {index} is off the board (expected 0..{BOARD_SIZE})"
            ))),
        }
    }

    /// The zero-based board index.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Every position in board order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).filter_map(|i| Position::new(i).ok())
    }
}

impl TryFrom<usize> for Position {
    type Error = DomainError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Position::new(index)
    }
}

impl From<Position> for usize {
    fn from(position: Position) -> Self {
        position.index()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed 24-cell board. Copies are cheap; transitions build new boards
/// instead of mutating a shared one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: [Cell::EMPTY; BOARD_SIZE],
        }
    }

    /// The cell at `position`.
    #[must_use]
    pub fn cell(&self, position: Position) -> Cell {
        self.cells[position.index()]
    }

    /// All cells in board order.
    #[must_use]
    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    /// A copy of this board with `position` replaced by `cell`.
    #[must_use]
    pub fn with_cell(&self, position: Position, cell: Cell) -> Self {
        let mut next = *self;
        next.cells[position.index()] = cell;
        next
    }

    /// A copy of this board with `f` applied to every cell.
    #[must_use]
    pub fn map_cells(&self, f: impl Fn(Cell) -> Cell) -> Self {
        Self {
            cells: self.cells.map(f),
        }
    }

    /// Number of cells occupied by `color`.
    #[must_use]
    pub fn count(&self, color: Color) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.color == Some(color))
            .count()
    }
}
