//! Error types for the session store.

use pawsmonaut_core::GameError;
use thiserror::Error;

use crate::SessionId;

/// Errors returned by [`SessionStore`](crate::SessionStore) operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No live session with this id (never created, removed, or expired).
    #[error("no active game for session {0}")]
    NotFound(SessionId),

    /// The store is full and nothing could be evicted.
    #[error("session store is full ({limit} sessions)")]
    CapacityExceeded {
        /// Configured session limit.
        limit: usize,
    },

    /// The game rejected the action.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SessionError {
    /// True when the caller sent something the game could not accept, as
    /// opposed to addressing a missing session.
    pub fn is_rejected_action(&self) -> bool {
        matches!(
            self,
            SessionError::Game(GameError::InvalidAction(_) | GameError::GameAlreadyOver)
        )
    }
}
