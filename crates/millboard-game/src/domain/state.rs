//! The game snapshot and the pure transitions between snapshots.
//!
//! Every transition takes `&self` and returns a new `GameState`; nothing here
//! validates legality. Preconditions are checked by the aggregate before a
//! transition is recorded.

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, Color, Phase, Position};

/// Complete snapshot of a game in progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// Side whose turn it is.
    pub color_to_move: Color,
    /// White pieces still in the game (in hand or on the board).
    pub white_pieces_remaining: u8,
    /// Black pieces still in the game (in hand or on the board).
    pub black_pieces_remaining: u8,
    /// Placements made by Black. Since White opens every round, this is the
    /// number of completed placement rounds.
    pub pieces_placed: u32,
    /// Caller-managed phase tag.
    pub phase: Phase,
    /// The 24 board positions.
    pub board: Board,
}

impl GameState {
    /// The snapshot every game starts from.
    #[must_use]
    pub fn initial(pieces_per_side: u8) -> Self {
        Self {
            color_to_move: Color::White,
            white_pieces_remaining: pieces_per_side,
            black_pieces_remaining: pieces_per_side,
            pieces_placed: 0,
            phase: Phase::Place,
            board: Board::new(),
        }
    }

    /// Remaining pieces for `color`.
    #[must_use]
    pub fn pieces_remaining(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white_pieces_remaining,
            Color::Black => self.black_pieces_remaining,
        }
    }

    /// Replaces the phase; nothing else changes.
    #[must_use]
    pub fn with_phase(&self, phase: Phase) -> Self {
        Self {
            phase,
            ..self.clone()
        }
    }

    /// Places a piece of the side to move at `at`, counts Black placements,
    /// and passes the turn.
    #[must_use]
    pub fn with_piece_added(&self, at: Position) -> Self {
        let mover = self.color_to_move;
        let pieces_placed = if mover == Color::Black {
            self.pieces_placed.saturating_add(1)
        } else {
            self.pieces_placed
        };

        Self {
            color_to_move: mover.opponent(),
            pieces_placed,
            board: self.board.with_cell(at, Cell::occupied(mover)),
            ..self.clone()
        }
    }

    /// Sets the highlight tag of the cell at `at`, keeping its occupant.
    #[must_use]
    pub fn with_highlight(&self, at: Position, highlight: Option<Color>) -> Self {
        let cell = Cell {
            highlighted: highlight,
            ..self.board.cell(at)
        };
        Self {
            board: self.board.with_cell(at, cell),
            ..self.clone()
        }
    }

    /// Clears every highlight, keeping every occupant.
    #[must_use]
    pub fn with_all_unhighlighted(&self) -> Self {
        Self {
            board: self.board.map_cells(Cell::unhighlighted),
            ..self.clone()
        }
    }

    /// Empties the cell at `at`. When `destroy` is set, the side that
    /// occupied the cell before it was cleared loses one remaining piece;
    /// an empty cell costs nobody anything.
    #[must_use]
    pub fn with_piece_removed(&self, at: Position, destroy: bool) -> Self {
        let captured = if destroy { self.board.cell(at).color } else { None };
        self.with_cell_cleared(at, captured)
    }

    /// Empties the cell at `at` and charges one remaining piece to
    /// `captured`, if any. Replay uses this with the occupant recorded when
    /// the removal was accepted.
    #[must_use]
    pub fn with_cell_cleared(&self, at: Position, captured: Option<Color>) -> Self {
        let mut next = Self {
            board: self.board.with_cell(at, Cell::EMPTY),
            ..self.clone()
        };

        match captured {
            Some(Color::White) => {
                next.white_pieces_remaining = next.white_pieces_remaining.saturating_sub(1);
            }
            Some(Color::Black) => {
                next.black_pieces_remaining = next.black_pieces_remaining.saturating_sub(1);
            }
            None => {}
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::BOARD_SIZE;

    fn pos(index: usize) -> Position {
        Position::new(index).unwrap()
    }

    #[test]
    fn test_initial_state_has_default_values() {
        let state = GameState::initial(9);

        assert_eq!(state.color_to_move, Color::White);
        assert_eq!(state.white_pieces_remaining, 9);
        assert_eq!(state.black_pieces_remaining, 9);
        assert_eq!(state.pieces_placed, 0);
        assert_eq!(state.phase, Phase::Place);
        assert_eq!(state.board.cells().len(), BOARD_SIZE);
        assert!(state.board.cells().iter().all(|c| *c == Cell::EMPTY));
    }

    #[test]
    fn test_with_phase_changes_only_phase() {
        let state = GameState::initial(9).with_piece_added(pos(3));

        let next = state.with_phase(Phase::Move);

        assert_eq!(next.phase, Phase::Move);
        assert_eq!(next.with_phase(state.phase.clone()), state);
    }

    #[test]
    fn test_turn_alternates_starting_with_white() {
        let mut state = GameState::initial(9);
        let mut expected = Color::White;

        for i in 0..10 {
            assert_eq!(state.color_to_move, expected);
            state = state.with_piece_added(pos(i));
            assert_eq!(state.board.cell(pos(i)), Cell::occupied(expected));
            expected = expected.opponent();
        }
    }

    #[test]
    fn test_pieces_placed_counts_black_placements_only() {
        let state = GameState::initial(9);

        let after_white = state.with_piece_added(pos(0));
        assert_eq!(after_white.pieces_placed, 0);

        let after_black = after_white.with_piece_added(pos(1));
        assert_eq!(after_black.pieces_placed, 1);

        let after_white_again = after_black.with_piece_added(pos(2));
        assert_eq!(after_white_again.pieces_placed, 1);
    }

    #[test]
    fn test_add_piece_changes_exactly_one_cell() {
        let state = GameState::initial(9)
            .with_piece_added(pos(4))
            .with_highlight(pos(9), Some(Color::Black));

        let next = state.with_piece_added(pos(17));

        for position in Position::all() {
            if position == pos(17) {
                assert_eq!(next.board.cell(position), Cell::occupied(Color::Black));
            } else {
                assert_eq!(next.board.cell(position), state.board.cell(position));
            }
        }
    }

    #[test]
    fn test_highlight_changes_only_target_highlight() {
        let state = GameState::initial(9).with_piece_added(pos(2));

        let next = state.with_highlight(pos(2), Some(Color::Black));

        assert_eq!(
            next.board.cell(pos(2)),
            Cell {
                color: Some(Color::White),
                highlighted: Some(Color::Black),
            }
        );
        for position in Position::all().filter(|p| *p != pos(2)) {
            assert_eq!(next.board.cell(position), state.board.cell(position));
        }
        assert_eq!(next.color_to_move, state.color_to_move);
        assert_eq!(next.pieces_placed, state.pieces_placed);
    }

    #[test]
    fn test_highlight_on_empty_cell_is_recorded() {
        let next = GameState::initial(9).with_highlight(pos(11), Some(Color::White));

        assert_eq!(
            next.board.cell(pos(11)),
            Cell {
                color: None,
                highlighted: Some(Color::White),
            }
        );
    }

    #[test]
    fn test_unhighlight_all_clears_highlights_and_keeps_colors() {
        let state = GameState::initial(9)
            .with_piece_added(pos(0))
            .with_piece_added(pos(1))
            .with_highlight(pos(0), Some(Color::White))
            .with_highlight(pos(1), Some(Color::Black))
            .with_highlight(pos(5), Some(Color::Black));

        let next = state.with_all_unhighlighted();

        for position in Position::all() {
            let cell = next.board.cell(position);
            assert_eq!(cell.highlighted, None);
            assert_eq!(cell.color, state.board.cell(position).color);
        }
        assert_eq!(next.with_all_unhighlighted(), next);
    }

    #[test]
    fn test_destroy_white_piece_decrements_white_only() {
        let state = GameState::initial(9).with_piece_added(pos(6));

        let next = state.with_piece_removed(pos(6), true);

        assert!(next.board.cell(pos(6)).is_empty());
        assert_eq!(next.white_pieces_remaining, 8);
        assert_eq!(next.black_pieces_remaining, 9);
        assert_eq!(next.color_to_move, state.color_to_move);
    }

    #[test]
    fn test_destroy_black_piece_decrements_black_only() {
        let state = GameState::initial(9)
            .with_piece_added(pos(0))
            .with_piece_added(pos(7));

        let next = state.with_piece_removed(pos(7), true);

        assert!(next.board.cell(pos(7)).is_empty());
        assert_eq!(next.white_pieces_remaining, 9);
        assert_eq!(next.black_pieces_remaining, 8);
    }

    #[test]
    fn test_remove_without_destroy_keeps_counts() {
        let state = GameState::initial(9).with_piece_added(pos(8));

        let next = state.with_piece_removed(pos(8), false);

        assert!(next.board.cell(pos(8)).is_empty());
        assert_eq!(next.white_pieces_remaining, 9);
        assert_eq!(next.black_pieces_remaining, 9);
    }

    #[test]
    fn test_remove_clears_highlight() {
        let state = GameState::initial(9)
            .with_piece_added(pos(8))
            .with_highlight(pos(8), Some(Color::Black));

        let next = state.with_piece_removed(pos(8), false);

        assert_eq!(next.board.cell(pos(8)), Cell::EMPTY);
    }

    #[test]
    fn test_cell_cleared_charges_the_recorded_side() {
        let state = GameState::initial(9).with_piece_added(pos(3));

        let next = state.with_cell_cleared(pos(3), Some(Color::Black));

        assert!(next.board.cell(pos(3)).is_empty());
        assert_eq!(next.white_pieces_remaining, 9);
        assert_eq!(next.black_pieces_remaining, 8);
        assert_eq!(state.with_cell_cleared(pos(3), None).white_pieces_remaining, 9);
    }

    #[test]
    fn test_pieces_placed_saturates_instead_of_overflowing() {
        let state = GameState {
            color_to_move: Color::Black,
            pieces_placed: u32::MAX,
            ..GameState::initial(9)
        };

        let next = state.with_piece_added(pos(0));

        assert_eq!(next.pieces_placed, u32::MAX);
        assert_eq!(next.color_to_move, Color::White);
    }
}
