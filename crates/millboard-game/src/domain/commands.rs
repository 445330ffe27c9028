//! Commands for the game state store.
//!
//! `GameCommand` is what an in-process caller dispatches to a `GameStore`.
//! The per-command structs below carry the same intent plus the game id and
//! correlation id needed to address a repository-hosted game.

use millboard_core::command::Command;
use uuid::Uuid;

use super::board::{Color, Phase};
use crate::config::GameConfig;

/// The six transitions a caller may request.
///
/// Locations are raw caller indices; the aggregate rejects anything off the
/// board before a transition is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    /// Replace the phase tag.
    SetPhase {
        /// The new phase.
        phase: Phase,
    },
    /// Place a piece of the side to move and pass the turn.
    AddPiece {
        /// Target board index.
        location: usize,
    },
    /// Tag a cell for the presentation layer.
    HighlightPiece {
        /// Target board index.
        location: usize,
        /// Highlight tag; `None` clears it.
        color: Option<Color>,
    },
    /// Clear every highlight.
    UnhighlightAllPieces,
    /// Empty a cell, optionally capturing the piece that was on it.
    RemovePiece {
        /// Target board index.
        location: usize,
        /// Whether the owner loses a remaining piece.
        destroy: bool,
    },
    /// Return to the initial snapshot.
    ResetGame,
}

impl GameCommand {
    /// The type name for this command (for logging/routing).
    #[must_use]
    pub fn command_type(&self) -> &'static str {
        match self {
            GameCommand::SetPhase { .. } => "game.set_phase",
            GameCommand::AddPiece { .. } => "game.add_piece",
            GameCommand::HighlightPiece { .. } => "game.highlight_piece",
            GameCommand::UnhighlightAllPieces => "game.unhighlight_all_pieces",
            GameCommand::RemovePiece { .. } => "game.remove_piece",
            GameCommand::ResetGame => "game.reset_game",
        }
    }
}

/// Command to start a new game under a fresh id.
#[derive(Debug, Clone)]
pub struct StartGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: Uuid,
    /// Settings the game starts (and resets) with.
    pub config: GameConfig,
}

impl Command for StartGame {
    fn command_type(&self) -> &'static str {
        "game.start_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to replace a game's phase tag.
#[derive(Debug, Clone)]
pub struct SetPhase {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: Uuid,
    /// The new phase.
    pub phase: Phase,
}

/// Command to place a piece of the side to move.
#[derive(Debug, Clone)]
pub struct AddPiece {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: Uuid,
    /// Target board index.
    pub location: usize,
}

/// Command to highlight a cell.
#[derive(Debug, Clone)]
pub struct HighlightPiece {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: Uuid,
    /// Target board index.
    pub location: usize,
    /// Highlight tag; `None` clears it.
    pub color: Option<Color>,
}

/// Command to clear every highlight.
#[derive(Debug, Clone)]
pub struct UnhighlightAllPieces {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: Uuid,
}

/// Command to empty a cell, optionally capturing its piece.
#[derive(Debug, Clone)]
pub struct RemovePiece {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: Uuid,
    /// Target board index.
    pub location: usize,
    /// Whether the owner loses a remaining piece.
    pub destroy: bool,
}

/// Command to return a game to its initial snapshot.
#[derive(Debug, Clone)]
pub struct ResetGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: Uuid,
}

/// A command addressed to an existing game.
pub trait GameScopedCommand: Command {
    /// The game this command targets.
    fn game_id(&self) -> Uuid;

    /// The transition requested.
    fn to_game_command(&self) -> GameCommand;
}

impl Command for SetPhase {
    fn command_type(&self) -> &'static str {
        "game.set_phase"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl GameScopedCommand for SetPhase {
    fn game_id(&self) -> Uuid {
        self.game_id
    }

    fn to_game_command(&self) -> GameCommand {
        GameCommand::SetPhase {
            phase: self.phase.clone(),
        }
    }
}

impl Command for AddPiece {
    fn command_type(&self) -> &'static str {
        "game.add_piece"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl GameScopedCommand for AddPiece {
    fn game_id(&self) -> Uuid {
        self.game_id
    }

    fn to_game_command(&self) -> GameCommand {
        GameCommand::AddPiece {
            location: self.location,
        }
    }
}

impl Command for HighlightPiece {
    fn command_type(&self) -> &'static str {
        "game.highlight_piece"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl GameScopedCommand for HighlightPiece {
    fn game_id(&self) -> Uuid {
        self.game_id
    }

    fn to_game_command(&self) -> GameCommand {
        GameCommand::HighlightPiece {
            location: self.location,
            color: self.color,
        }
    }
}

impl Command for UnhighlightAllPieces {
    fn command_type(&self) -> &'static str {
        "game.unhighlight_all_pieces"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl GameScopedCommand for UnhighlightAllPieces {
    fn game_id(&self) -> Uuid {
        self.game_id
    }

    fn to_game_command(&self) -> GameCommand {
        GameCommand::UnhighlightAllPieces
    }
}

impl Command for RemovePiece {
    fn command_type(&self) -> &'static str {
        "game.remove_piece"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl GameScopedCommand for RemovePiece {
    fn game_id(&self) -> Uuid {
        self.game_id
    }

    fn to_game_command(&self) -> GameCommand {
        GameCommand::RemovePiece {
            location: self.location,
            destroy: self.destroy,
        }
    }
}

impl Command for ResetGame {
    fn command_type(&self) -> &'static str {
        "game.reset_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl GameScopedCommand for ResetGame {
    fn game_id(&self) -> Uuid {
        self.game_id
    }

    fn to_game_command(&self) -> GameCommand {
        GameCommand::ResetGame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_commands_map_to_game_commands() {
        let game_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();

        let remove = RemovePiece {
            correlation_id,
            game_id,
            location: 4,
            destroy: true,
        };

        assert_eq!(remove.game_id(), game_id);
        assert_eq!(Command::correlation_id(&remove), correlation_id);
        assert_eq!(Command::command_type(&remove), "game.remove_piece");
        assert_eq!(
            remove.to_game_command(),
            GameCommand::RemovePiece {
                location: 4,
                destroy: true,
            }
        );
    }

    #[test]
    fn test_unit_commands_have_distinct_types() {
        let unhighlight = UnhighlightAllPieces {
            correlation_id: Uuid::new_v4(),
            game_id: Uuid::new_v4(),
        };
        let reset = ResetGame {
            correlation_id: Uuid::new_v4(),
            game_id: Uuid::new_v4(),
        };

        assert_eq!(
            Command::command_type(&unhighlight),
            "game.unhighlight_all_pieces"
        );
        assert_eq!(Command::command_type(&reset), "game.reset_game");
    }

    #[test]
    fn test_every_scoped_command_type_matches_its_game_command() {
        let game_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let commands: Vec<Box<dyn GameScopedCommand>> = vec![
            Box::new(SetPhase {
                correlation_id,
                game_id,
                phase: Phase::Fly,
            }),
            Box::new(AddPiece {
                correlation_id,
                game_id,
                location: 7,
            }),
            Box::new(HighlightPiece {
                correlation_id,
                game_id,
                location: 7,
                color: Some(Color::Black),
            }),
            Box::new(UnhighlightAllPieces {
                correlation_id,
                game_id,
            }),
            Box::new(RemovePiece {
                correlation_id,
                game_id,
                location: 7,
                destroy: false,
            }),
            Box::new(ResetGame {
                correlation_id,
                game_id,
            }),
        ];

        for command in &commands {
            assert_eq!(command.game_id(), game_id);
            assert_eq!(command.correlation_id(), correlation_id);
            assert_eq!(
                command.command_type(),
                command.to_game_command().command_type()
            );
        }
        assert_eq!(
            commands[2].to_game_command(),
            GameCommand::HighlightPiece {
                location: 7,
                color: Some(Color::Black),
            }
        );
    }
}
