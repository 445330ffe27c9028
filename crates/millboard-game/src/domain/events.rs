//! Domain events for the game state store.

use millboard_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::board::{Color, Phase, Position};

/// Emitted when a game is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStarted {
    /// The game identifier.
    pub game_id: Uuid,
    /// Pieces each side starts with.
    pub pieces_per_side: u8,
}

/// Emitted when the phase tag is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSet {
    /// The game identifier.
    pub game_id: Uuid,
    /// The new phase.
    pub phase: Phase,
}

/// Emitted when a piece is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceAdded {
    /// The game identifier.
    pub game_id: Uuid,
    /// Where the piece was placed.
    pub location: Position,
    /// The side that placed it.
    pub color: Color,
}

/// Emitted when a cell's highlight tag is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceHighlighted {
    /// The game identifier.
    pub game_id: Uuid,
    /// The highlighted cell.
    pub location: Position,
    /// The highlight tag, `None` when cleared.
    pub color: Option<Color>,
}

/// Emitted when every highlight is cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiecesUnhighlighted {
    /// The game identifier.
    pub game_id: Uuid,
}

/// Emitted when a cell is emptied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRemoved {
    /// The game identifier.
    pub game_id: Uuid,
    /// The emptied cell.
    pub location: Position,
    /// The side that occupied the cell before removal.
    pub previous: Option<Color>,
    /// Whether the owner lost a remaining piece.
    pub destroyed: bool,
}

/// Emitted when a game returns to its initial snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReset {
    /// The game identifier.
    pub game_id: Uuid,
}

/// Event type identifier for [`GameStarted`].
pub const GAME_STARTED_EVENT_TYPE: &str = "game.game_started";

/// Event type identifier for [`PhaseSet`].
pub const PHASE_SET_EVENT_TYPE: &str = "game.phase_set";

/// Event type identifier for [`PieceAdded`].
pub const PIECE_ADDED_EVENT_TYPE: &str = "game.piece_added";

/// Event type identifier for [`PieceHighlighted`].
pub const PIECE_HIGHLIGHTED_EVENT_TYPE: &str = "game.piece_highlighted";

/// Event type identifier for [`PiecesUnhighlighted`].
pub const PIECES_UNHIGHLIGHTED_EVENT_TYPE: &str = "game.pieces_unhighlighted";

/// Event type identifier for [`PieceRemoved`].
pub const PIECE_REMOVED_EVENT_TYPE: &str = "game.piece_removed";

/// Event type identifier for [`GameReset`].
pub const GAME_RESET_EVENT_TYPE: &str = "game.game_reset";

/// Event payload variants for the game state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventKind {
    /// A game has started.
    GameStarted(GameStarted),
    /// The phase tag has been replaced.
    PhaseSet(PhaseSet),
    /// A piece has been placed.
    PieceAdded(PieceAdded),
    /// A cell's highlight has been set.
    PieceHighlighted(PieceHighlighted),
    /// All highlights have been cleared.
    PiecesUnhighlighted(PiecesUnhighlighted),
    /// A cell has been emptied.
    PieceRemoved(PieceRemoved),
    /// The game has been reset.
    GameReset(GameReset),
}

impl GameEventKind {
    /// Returns the event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEventKind::GameStarted(_) => GAME_STARTED_EVENT_TYPE,
            GameEventKind::PhaseSet(_) => PHASE_SET_EVENT_TYPE,
            GameEventKind::PieceAdded(_) => PIECE_ADDED_EVENT_TYPE,
            GameEventKind::PieceHighlighted(_) => PIECE_HIGHLIGHTED_EVENT_TYPE,
            GameEventKind::PiecesUnhighlighted(_) => PIECES_UNHIGHLIGHTED_EVENT_TYPE,
            GameEventKind::PieceRemoved(_) => PIECE_REMOVED_EVENT_TYPE,
            GameEventKind::GameReset(_) => GAME_RESET_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the game state store.
#[derive(Debug, Clone, PartialEq)]
pub struct GameEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GameEventKind,
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("GameEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
