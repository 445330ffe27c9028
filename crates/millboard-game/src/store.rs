//! In-process dispatch for a single game.
//!
//! `GameStore` owns one `MillGame`, applies each accepted command before the
//! next is taken, and notifies subscribers with the new snapshot.
//! `SharedGameStore` puts a store behind a mutex for hosts that accept
//! commands from several callers at once.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use millboard_core::aggregate::AggregateRoot;
use millboard_core::clock::{Clock, SystemClock};
use millboard_core::error::DomainError;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::domain::aggregates::MillGame;
use crate::domain::commands::GameCommand;
use crate::domain::events::GameEvent;
use crate::domain::state::GameState;

/// Handle returned by [`GameStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&GameState) + Send>;

/// Owned state store for one game.
pub struct GameStore {
    game: MillGame,
    clock: Arc<dyn Clock>,
    history: Vec<GameEvent>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for GameStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameStore")
            .field("game", &self.game)
            .field("history", &self.history.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl GameStore {
    /// Starts a new game timed by the system clock.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Starts a new game whose events are stamped by `clock`.
    #[must_use]
    pub fn with_clock(config: GameConfig, clock: Arc<dyn Clock>) -> Self {
        let game_id = Uuid::new_v4();
        let mut game = MillGame::begin(game_id, config, Uuid::new_v4(), clock.as_ref());
        let history = game.commit();
        info!(%game_id, pieces_per_side = config.pieces_per_side(), "game started");

        Self {
            game,
            clock,
            history,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The game identifier.
    #[must_use]
    pub fn game_id(&self) -> Uuid {
        self.game.id
    }

    /// Applies `command`, then notifies every subscriber with the new
    /// snapshot. A rejected command changes nothing and notifies nobody.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for a location off the board
    /// and `DomainError::Validation` when the command does not fit the
    /// current snapshot.
    #[instrument(skip(self), fields(game_id = %self.game.id, command_type = command.command_type()))]
    pub fn dispatch(&mut self, command: GameCommand) -> Result<(), DomainError> {
        let correlation_id = Uuid::new_v4();
        if let Err(err) = self
            .game
            .execute(&command, correlation_id, self.clock.as_ref())
        {
            warn!(error = %err, "command rejected");
            return Err(err);
        }

        let applied = self.game.commit();
        self.history.extend(applied);
        info!(%correlation_id, version = self.game.version(), "command applied");

        self.notify();
        Ok(())
    }

    /// An independent copy of the current snapshot.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.game.state().clone()
    }

    /// Number of events applied, including the start event.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.game.version()
    }

    /// Every accepted event in order, starting with `GameStarted`.
    ///
    /// This is the game's full event stream. It grows with every accepted
    /// command, highlights included, and a reset is appended rather than
    /// clearing it, so replaying the history always reproduces `state()`.
    #[must_use]
    pub fn history(&self) -> &[GameEvent] {
        &self.history
    }

    /// Registers `observer` to be called with the new snapshot after every
    /// accepted command.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&GameState) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes a subscriber. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        let state = self.game.state();
        for (id, observer) in &mut self.observers {
            debug!(subscription = id.0, "notifying observer");
            observer(state);
        }
    }
}

/// A `GameStore` shared between callers. Commands are applied one at a time
/// under the lock, so no caller observes a partially applied command.
///
/// Observers run while the lock is held. An observer that calls back into
/// the same `SharedGameStore` gets `DomainError::Infrastructure` instead of
/// waiting on a lock its own thread holds.
#[derive(Debug, Clone)]
pub struct SharedGameStore {
    inner: Arc<Mutex<GameStore>>,
    holder: Arc<Mutex<Option<ThreadId>>>,
}

/// Clears the recorded lock holder when the store guard is released.
struct HolderGuard<'a> {
    holder: &'a Mutex<Option<ThreadId>>,
}

impl Drop for HolderGuard<'_> {
    fn drop(&mut self) {
        *self.holder.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SharedGameStore {
    /// Wraps `store` for shared use.
    #[must_use]
    pub fn new(store: GameStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
            holder: Arc::new(Mutex::new(None)),
        }
    }

    fn holder(&self) -> MutexGuard<'_, Option<ThreadId>> {
        self.holder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_store<T>(&self, f: impl FnOnce(&mut GameStore) -> T) -> Result<T, DomainError> {
        let current = thread::current().id();
        if *self.holder() == Some(current) {
            warn!("game store re-entered from one of its observers");
            return Err(DomainError::Infrastructure(
                "game store re-entered from one of its observers".to_owned(),
            ));
        }

        let mut store: MutexGuard<'_, GameStore> = self
            .inner
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("game store lock poisoned: {e}")))?;
        *self.holder() = Some(current);
        let _held = HolderGuard {
            holder: &self.holder,
        };
        Ok(f(&mut store))
    }

    /// Applies `command` under the lock.
    ///
    /// # Errors
    ///
    /// Returns the command's `DomainError`, or `DomainError::Infrastructure`
    /// if the lock is poisoned or the call comes from one of this store's
    /// observers.
    pub fn dispatch(&self, command: GameCommand) -> Result<(), DomainError> {
        self.with_store(|store| store.dispatch(command))?
    }

    /// An independent copy of the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned or the
    /// call comes from one of this store's observers.
    pub fn state(&self) -> Result<GameState, DomainError> {
        self.with_store(|store| store.state())
    }

    /// Registers an observer; see [`GameStore::subscribe`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned or the
    /// call comes from one of this store's observers.
    pub fn subscribe<F>(&self, observer: F) -> Result<SubscriptionId, DomainError>
    where
        F: FnMut(&GameState) + Send + 'static,
    {
        self.with_store(|store| store.subscribe(observer))
    }

    /// Removes an observer; see [`GameStore::unsubscribe`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned or the
    /// call comes from one of this store's observers.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool, DomainError> {
        self.with_store(|store| store.unsubscribe(id))
    }
}
