//! Command handlers for repository-hosted games.
//!
//! Each handler loads the game's events, reconstitutes the aggregate,
//! executes the command, and appends the resulting event with the loaded
//! version as the expected version.

use millboard_core::aggregate::AggregateRoot;
use millboard_core::clock::Clock;
use millboard_core::error::DomainError;
use millboard_core::event::{DomainEvent, EventMetadata};
use millboard_core::repository::{EventRepository, StoredEvent};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::aggregates::MillGame;
use crate::domain::commands::{
    AddPiece, GameScopedCommand, HighlightPiece, RemovePiece, ResetGame, SetPhase, StartGame,
    UnhighlightAllPieces,
};
use crate::domain::events::{GameEvent, GameEventKind};

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct GameCommandResult {
    /// The game affected by the command.
    pub aggregate_id: Uuid,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
}

/// Reconstitutes a `MillGame` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    game_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<MillGame, DomainError> {
    let mut game = MillGame::new(game_id);
    for stored in existing_events {
        let kind: GameEventKind = serde_json::from_value(stored.payload.clone()).map_err(|e| {
            DomainError::Infrastructure(format!("event deserialization failed: {e}"))
        })?;
        let event = GameEvent {
            metadata: EventMetadata::from_stored(stored),
            kind,
        };
        game.apply(&event);
    }
    Ok(game)
}

async fn persist(
    game: &MillGame,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    let stored_events: Vec<StoredEvent> = game
        .uncommitted_events()
        .iter()
        .map(DomainEvent::to_stored_event)
        .collect();

    repo.append_events(game.id, game.version(), &stored_events)
        .await?;

    Ok(GameCommandResult {
        aggregate_id: game.id,
        stored_events,
    })
}

async fn handle_scoped(
    command: &dyn GameScopedCommand,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    let game_id = command.game_id();
    let existing_events = repo.load_events(game_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(game_id));
    }
    let mut game = reconstitute(game_id, &existing_events)?;

    if let Err(err) = game.execute(
        &command.to_game_command(),
        command.correlation_id(),
        clock,
    ) {
        warn!(%game_id, error = %err, "command rejected");
        return Err(err);
    }

    let result = persist(&game, repo).await?;
    info!(%game_id, version = game.version() + 1, "command applied");
    Ok(result)
}

/// Handles the `StartGame` command: records a `GameStarted` event for a new
/// game id.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the game already has events, or
/// `DomainError` if event loading or appending fails.
#[instrument(skip(clock, repo), fields(game_id = %command.game_id, correlation_id = %command.correlation_id))]
pub async fn handle_start_game(
    command: &StartGame,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    let existing_events = repo.load_events(command.game_id).await?;
    if !existing_events.is_empty() {
        return Err(DomainError::Validation(format!(
            "game {} has already been started",
            command.game_id
        )));
    }

    let game = MillGame::begin(command.game_id, command.config, command.correlation_id, clock);
    let result = persist(&game, repo).await?;
    info!(pieces_per_side = command.config.pieces_per_side(), "game started");
    Ok(result)
}

/// Handles the `SetPhase` command.
///
/// # Errors
///
/// Returns `DomainError` if the game is unknown, the phase is invalid, or
/// event loading or appending fails.
#[instrument(skip(clock, repo), fields(game_id = %command.game_id, correlation_id = %command.correlation_id))]
pub async fn handle_set_phase(
    command: &SetPhase,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    handle_scoped(command, clock, repo).await
}

/// Handles the `AddPiece` command.
///
/// # Errors
///
/// Returns `DomainError` if the game is unknown, the location is off the
/// board or occupied, or event loading or appending fails.
#[instrument(skip(clock, repo), fields(game_id = %command.game_id, correlation_id = %command.correlation_id))]
pub async fn handle_add_piece(
    command: &AddPiece,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    handle_scoped(command, clock, repo).await
}

/// Handles the `HighlightPiece` command.
///
/// # Errors
///
/// Returns `DomainError` if the game is unknown, the location is off the
/// board, or event loading or appending fails.
#[instrument(skip(clock, repo), fields(game_id = %command.game_id, correlation_id = %command.correlation_id))]
pub async fn handle_highlight_piece(
    command: &HighlightPiece,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    handle_scoped(command, clock, repo).await
}

/// Handles the `UnhighlightAllPieces` command.
///
/// # Errors
///
/// Returns `DomainError` if the game is unknown or event loading or
/// appending fails.
#[instrument(skip(clock, repo), fields(game_id = %command.game_id, correlation_id = %command.correlation_id))]
pub async fn handle_unhighlight_all_pieces(
    command: &UnhighlightAllPieces,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    handle_scoped(command, clock, repo).await
}

/// Handles the `RemovePiece` command.
///
/// # Errors
///
/// Returns `DomainError` if the game is unknown, the location is off the
/// board, a destroy targets an empty cell, or event loading or appending
/// fails.
#[instrument(skip(clock, repo), fields(game_id = %command.game_id, correlation_id = %command.correlation_id))]
pub async fn handle_remove_piece(
    command: &RemovePiece,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    handle_scoped(command, clock, repo).await
}

/// Handles the `ResetGame` command.
///
/// # Errors
///
/// Returns `DomainError` if the game is unknown or event loading or
/// appending fails.
#[instrument(skip(clock, repo), fields(game_id = %command.game_id, correlation_id = %command.correlation_id))]
pub async fn handle_reset_game(
    command: &ResetGame,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    handle_scoped(command, clock, repo).await
}
