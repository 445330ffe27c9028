//! Game configuration.
//!
//! The board is always 24 points; the number of pieces per side varies
//! between mill variants (nine men's morris uses 9, twelve men's morris 12).

use std::num::ParseIntError;
use std::ops::RangeInclusive;

use thiserror::Error;

/// Environment variable read by [`GameConfig::from_env`].
pub const PIECES_PER_SIDE_ENV: &str = "MILLBOARD_PIECES_PER_SIDE";

/// Pieces per side when nothing is configured.
pub const DEFAULT_PIECES_PER_SIDE: u8 = 9;

/// Accepted pieces per side.
pub const PIECES_PER_SIDE_RANGE: RangeInclusive<u8> = 3..=12;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but does not parse.
    #[error("{var} must be a valid u8: {source}")]
    Unparsable {
        /// The offending variable.
        var: &'static str,
        /// The parse failure.
        #[source]
        source: ParseIntError,
    },

    /// Pieces per side outside the supported range.
    #[error("pieces per side must be between 3 and 12, got {0}")]
    PiecesPerSideOutOfRange(u8),
}

/// Settings a game starts (and resets) with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pieces_per_side: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pieces_per_side: DEFAULT_PIECES_PER_SIDE,
        }
    }
}

impl GameConfig {
    /// Creates a configuration with the given pieces per side.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PiecesPerSideOutOfRange` outside `3..=12`.
    pub fn new(pieces_per_side: u8) -> Result<Self, ConfigError> {
        if !PIECES_PER_SIDE_RANGE.contains(&pieces_per_side) {
            return Err(ConfigError::PiecesPerSideOutOfRange(pieces_per_side));
        }
        Ok(Self { pieces_per_side })
    }

    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value. Unset variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(PIECES_PER_SIDE_ENV) {
            None => Ok(Self::default()),
            Some(raw) => {
                let pieces = raw
                    .trim()
                    .parse::<u8>()
                    .map_err(|source| ConfigError::Unparsable {
                        var: PIECES_PER_SIDE_ENV,
                        source,
                    })?;
                Self::new(pieces)
            }
        }
    }

    /// Pieces each side starts with.
    #[must_use]
    pub fn pieces_per_side(&self) -> u8 {
        self.pieces_per_side
    }
}
