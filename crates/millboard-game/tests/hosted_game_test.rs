//! End-to-end tests: games hosted in the in-memory event store, driven
//! through the command handlers and read back through the query handler.

use std::sync::Arc;

use millboard_core::error::DomainError;
use millboard_core::repository::EventRepository;
use millboard_event_store::MemoryEventRepository;
use millboard_game::application::command_handlers::{
    handle_add_piece, handle_highlight_piece, handle_remove_piece, handle_reset_game,
    handle_set_phase, handle_start_game, handle_unhighlight_all_pieces,
};
use millboard_game::application::query_handlers::get_game_by_id;
use millboard_game::domain::commands::{
    AddPiece, HighlightPiece, RemovePiece, ResetGame, SetPhase, StartGame, UnhighlightAllPieces,
};
use millboard_game::{Cell, Color, GameCommand, GameConfig, GameState, GameStore, Phase, Position};
use millboard_test_support::{FixedClock, init_tracing};
use uuid::Uuid;

async fn start(repo: &MemoryEventRepository, clock: &FixedClock, config: GameConfig) -> Uuid {
    let game_id = Uuid::new_v4();
    handle_start_game(
        &StartGame {
            correlation_id: Uuid::new_v4(),
            game_id,
            config,
        },
        clock,
        repo,
    )
    .await
    .unwrap();
    game_id
}

async fn add(repo: &MemoryEventRepository, clock: &FixedClock, game_id: Uuid, location: usize) {
    handle_add_piece(
        &AddPiece {
            correlation_id: Uuid::new_v4(),
            game_id,
            location,
        },
        clock,
        repo,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_hosted_game_matches_in_process_store() {
    init_tracing();
    let repo = MemoryEventRepository::new();
    let clock = FixedClock::default();
    let game_id = start(&repo, &clock, GameConfig::default()).await;

    let mut store = GameStore::with_clock(GameConfig::default(), Arc::new(clock));

    add(&repo, &clock, game_id, 0).await;
    add(&repo, &clock, game_id, 1).await;
    handle_highlight_piece(
        &HighlightPiece {
            correlation_id: Uuid::new_v4(),
            game_id,
            location: 1,
            color: Some(Color::White),
        },
        &clock,
        &repo,
    )
    .await
    .unwrap();
    handle_remove_piece(
        &RemovePiece {
            correlation_id: Uuid::new_v4(),
            game_id,
            location: 1,
            destroy: true,
        },
        &clock,
        &repo,
    )
    .await
    .unwrap();
    handle_set_phase(
        &SetPhase {
            correlation_id: Uuid::new_v4(),
            game_id,
            phase: Phase::Move,
        },
        &clock,
        &repo,
    )
    .await
    .unwrap();

    for command in [
        GameCommand::AddPiece { location: 0 },
        GameCommand::AddPiece { location: 1 },
        GameCommand::HighlightPiece {
            location: 1,
            color: Some(Color::White),
        },
        GameCommand::RemovePiece {
            location: 1,
            destroy: true,
        },
        GameCommand::SetPhase { phase: Phase::Move },
    ] {
        store.dispatch(command).unwrap();
    }

    let view = get_game_by_id(game_id, &repo).await.unwrap();
    assert_eq!(view.state, store.state());
    assert_eq!(view.version, store.version());
    assert_eq!(view.state.black_pieces_remaining, 8);
    assert_eq!(view.state.white_pieces_remaining, 9);
    assert_eq!(view.state.pieces_placed, 1);
}

#[tokio::test]
async fn test_games_coexist_independently() {
    let repo = MemoryEventRepository::new();
    let clock = FixedClock::default();
    let nine = start(&repo, &clock, GameConfig::default()).await;
    let twelve = start(&repo, &clock, GameConfig::new(12).unwrap()).await;

    add(&repo, &clock, nine, 3).await;

    let nine_view = get_game_by_id(nine, &repo).await.unwrap();
    let twelve_view = get_game_by_id(twelve, &repo).await.unwrap();

    assert_eq!(
        nine_view.state.board.cell(Position::new(3).unwrap()),
        Cell::occupied(Color::White)
    );
    assert_eq!(twelve_view.state, GameState::initial(12));
    assert_eq!(twelve_view.pieces_per_side, 12);
}

#[tokio::test]
async fn test_reset_after_play_restores_configured_initial_state() {
    let repo = MemoryEventRepository::new();
    let clock = FixedClock::default();
    let game_id = start(&repo, &clock, GameConfig::new(12).unwrap()).await;

    add(&repo, &clock, game_id, 10).await;
    add(&repo, &clock, game_id, 11).await;
    handle_unhighlight_all_pieces(
        &UnhighlightAllPieces {
            correlation_id: Uuid::new_v4(),
            game_id,
        },
        &clock,
        &repo,
    )
    .await
    .unwrap();
    handle_reset_game(
        &ResetGame {
            correlation_id: Uuid::new_v4(),
            game_id,
        },
        &clock,
        &repo,
    )
    .await
    .unwrap();

    let view = get_game_by_id(game_id, &repo).await.unwrap();
    assert_eq!(view.state, GameState::initial(12));
    assert_eq!(view.version, 5);
}

#[tokio::test]
async fn test_rejected_command_appends_nothing() {
    let repo = MemoryEventRepository::new();
    let clock = FixedClock::default();
    let game_id = start(&repo, &clock, GameConfig::default()).await;

    let result = handle_remove_piece(
        &RemovePiece {
            correlation_id: Uuid::new_v4(),
            game_id,
            location: 0,
            destroy: true,
        },
        &clock,
        &repo,
    )
    .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(repo.load_events(game_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_stale_writer_gets_concurrency_conflict() {
    let repo = MemoryEventRepository::new();
    let clock = FixedClock::default();
    let game_id = start(&repo, &clock, GameConfig::default()).await;

    // A writer that loaded the stream before another writer appended.
    let stale = repo.load_events(game_id).await.unwrap();
    add(&repo, &clock, game_id, 0).await;

    let mut late = stale;
    late[0].sequence_number = 2;
    let result = repo.append_events(game_id, 1, &late).await;

    assert!(matches!(
        result,
        Err(DomainError::ConcurrencyConflict {
            expected: 1,
            actual: 2,
            ..
        })
    ));
}
