//! Error types for the game core.
//!
//! Every variant is a local, recoverable rejection. A call that returns
//! one of these has not touched the game state.

use thiserror::Error;

/// Errors returned by game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// An action arrived before any game was created.
    #[error("no active game")]
    NoActiveGame,

    /// An action arrived after the game reached a terminal state.
    #[error("game is already over")]
    GameAlreadyOver,

    /// The action payload is malformed or refers to something that does
    /// not exist (unknown location, unknown or ejected agent).
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// A scripted roster breaks a roster invariant.
    #[error("invalid roster: {0}")]
    InvalidRoster(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GameError {
    pub(crate) fn invalid_action(reason: impl Into<String>) -> Self {
        Self::InvalidAction(reason.into())
    }

    pub(crate) fn invalid_roster(reason: impl Into<String>) -> Self {
        Self::InvalidRoster(reason.into())
    }
}
