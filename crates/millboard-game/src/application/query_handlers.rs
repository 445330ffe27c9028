//! Query handlers for repository-hosted games.

use millboard_core::error::DomainError;
use millboard_core::repository::EventRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::state::GameState;

/// Read-only view of a game.
#[derive(Debug, Serialize)]
pub struct GameView {
    /// The game identifier.
    pub game_id: Uuid,
    /// Pieces each side started with.
    pub pieces_per_side: u8,
    /// The current snapshot.
    pub state: GameState,
    /// Current version (event count).
    pub version: i64,
}

/// Retrieves a game by its id, replaying its events into a snapshot.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_game_by_id(
    game_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<GameView, DomainError> {
    let stored_events = repo.load_events(game_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(game_id));
    }
    let game = command_handlers::reconstitute(game_id, &stored_events)?;
    Ok(GameView {
        game_id,
        pieces_per_side: game.pieces_per_side(),
        state: game.state().clone(),
        version: game.version,
    })
}
