//! Aggregate root for a single game.

use millboard_core::aggregate::AggregateRoot;
use millboard_core::clock::Clock;
use millboard_core::error::DomainError;
use millboard_core::event::EventMetadata;
use uuid::Uuid;

use super::board::{Color, Phase, Position};
use super::commands::GameCommand;
use super::events::{
    GameEvent, GameEventKind, GameReset, GameStarted, PhaseSet, PieceAdded, PieceHighlighted,
    PieceRemoved, PiecesUnhighlighted,
};
use super::state::GameState;
use crate::config::GameConfig;

/// The aggregate root for one game.
///
/// Command methods check preconditions against the applied state and record
/// at most one event; the snapshot only changes when that event is applied.
#[derive(Debug)]
pub struct MillGame {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// Pieces per side this game started with; reset restores it.
    pub(crate) pieces_per_side: u8,
    /// Whether a `GameStarted` event has been applied.
    started: bool,
    /// The current snapshot.
    state: GameState,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<GameEvent>,
}

impl MillGame {
    /// Creates an empty, not yet started game. Used for reconstitution.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        let pieces_per_side = GameConfig::default().pieces_per_side();
        Self {
            id,
            version: 0,
            pieces_per_side,
            started: false,
            state: GameState::initial(pieces_per_side),
            uncommitted_events: Vec::new(),
        }
    }

    /// Creates a game and records its `GameStarted` event.
    #[must_use]
    pub fn begin(id: Uuid, config: GameConfig, correlation_id: Uuid, clock: &dyn Clock) -> Self {
        let mut game = Self::new(id);
        game.record(
            GameEventKind::GameStarted(GameStarted {
                game_id: id,
                pieces_per_side: config.pieces_per_side(),
            }),
            correlation_id,
            clock,
        );
        game
    }

    /// The current snapshot.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Pieces per side this game started with.
    #[must_use]
    pub fn pieces_per_side(&self) -> u8 {
        self.pieces_per_side
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: GameEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = GameEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }

    fn ensure_started(&self) -> Result<(), DomainError> {
        if self.started {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "game {} has not been started",
                self.id
            )))
        }
    }

    /// Executes a `GameCommand`, recording the event it produces.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for a location off the board
    /// and `DomainError::Validation` when the command does not fit the
    /// current snapshot. Nothing is recorded on error.
    pub fn execute(
        &mut self,
        command: &GameCommand,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_started()?;
        match command {
            GameCommand::SetPhase { phase } => {
                self.set_phase(phase.clone(), correlation_id, clock)
            }
            GameCommand::AddPiece { location } => {
                self.add_piece(Position::new(*location)?, correlation_id, clock)
            }
            GameCommand::HighlightPiece { location, color } => {
                self.highlight_piece(Position::new(*location)?, *color, correlation_id, clock);
                Ok(())
            }
            GameCommand::UnhighlightAllPieces => {
                self.unhighlight_all_pieces(correlation_id, clock);
                Ok(())
            }
            GameCommand::RemovePiece { location, destroy } => {
                self.remove_piece(Position::new(*location)?, *destroy, correlation_id, clock)
            }
            GameCommand::ResetGame => {
                self.reset_game(correlation_id, clock);
                Ok(())
            }
        }
    }

    /// Replaces the phase tag, producing a `PhaseSet` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for a blank custom phase name.
    pub fn set_phase(
        &mut self,
        phase: Phase,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if let Phase::Custom(name) = &phase {
            if name.trim().is_empty() {
                return Err(DomainError::InvalidArgument(
                    "custom phase name must not be empty".to_owned(),
                ));
            }
        }
        self.record(
            GameEventKind::PhaseSet(PhaseSet {
                game_id: self.id,
                phase,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Places a piece of the side to move, producing a `PieceAdded` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the cell is occupied.
    pub fn add_piece(
        &mut self,
        at: Position,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if let Some(occupant) = self.state.board.cell(at).color {
            return Err(DomainError::Validation(format!(
                "location {at} is already occupied by {occupant}"
            )));
        }
        self.record(
            GameEventKind::PieceAdded(PieceAdded {
                game_id: self.id,
                location: at,
                color: self.state.color_to_move,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Sets a cell's highlight tag, producing a `PieceHighlighted` event.
    /// The cell does not need to be occupied.
    pub fn highlight_piece(
        &mut self,
        at: Position,
        color: Option<Color>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        self.record(
            GameEventKind::PieceHighlighted(PieceHighlighted {
                game_id: self.id,
                location: at,
                color,
            }),
            correlation_id,
            clock,
        );
    }

    /// Clears every highlight, producing a `PiecesUnhighlighted` event.
    pub fn unhighlight_all_pieces(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        self.record(
            GameEventKind::PiecesUnhighlighted(PiecesUnhighlighted { game_id: self.id }),
            correlation_id,
            clock,
        );
    }

    /// Empties a cell, producing a `PieceRemoved` event. With `destroy`, the
    /// occupant's side loses a remaining piece.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `destroy` is set and the cell is
    /// empty, or the occupant's side has no remaining pieces to lose.
    pub fn remove_piece(
        &mut self,
        at: Position,
        destroy: bool,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let previous = self.state.board.cell(at).color;
        if destroy {
            let Some(owner) = previous else {
                return Err(DomainError::Validation(format!(
                    "cannot destroy a piece at empty location {at}"
                )));
            };
            if self.state.pieces_remaining(owner) == 0 {
                return Err(DomainError::Validation(format!(
                    "{owner} has no pieces remaining to destroy"
                )));
            }
        }
        self.record(
            GameEventKind::PieceRemoved(PieceRemoved {
                game_id: self.id,
                location: at,
                previous,
                destroyed: destroy,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Returns the game to its initial snapshot, producing a `GameReset`
    /// event.
    pub fn reset_game(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        self.record(
            GameEventKind::GameReset(GameReset { game_id: self.id }),
            correlation_id,
            clock,
        );
    }
}

impl AggregateRoot for MillGame {
    type Event = GameEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.state = match &event.kind {
            GameEventKind::GameStarted(payload) => {
                self.started = true;
                self.pieces_per_side = payload.pieces_per_side;
                GameState::initial(payload.pieces_per_side)
            }
            GameEventKind::PhaseSet(payload) => self.state.with_phase(payload.phase.clone()),
            GameEventKind::PieceAdded(payload) => self.state.with_piece_added(payload.location),
            GameEventKind::PieceHighlighted(payload) => {
                self.state.with_highlight(payload.location, payload.color)
            }
            GameEventKind::PiecesUnhighlighted(_) => self.state.with_all_unhighlighted(),
            GameEventKind::PieceRemoved(payload) => {
                let captured = if payload.destroyed {
                    payload.previous
                } else {
                    None
                };
                self.state.with_cell_cleared(payload.location, captured)
            }
            GameEventKind::GameReset(_) => GameState::initial(self.pieces_per_side),
        };
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
