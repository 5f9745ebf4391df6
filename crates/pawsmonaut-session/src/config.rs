//! Configuration for the session store.

use pawsmonaut_core::GameConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::SessionError;
use crate::Result;

/// Session store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Settings for every game the store creates.
    pub game: GameConfig,

    /// Seconds without activity before a session expires.
    pub idle_timeout_secs: u64,

    /// Upper bound on concurrently held sessions.
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            idle_timeout_secs: 30 * 60,
            max_sessions: 1024,
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<()> {
        self.game.validate()?;
        if self.max_sessions == 0 {
            return Err(SessionError::Config("max_sessions must be at least 1".into()));
        }
        if self.idle_timeout_secs == 0 {
            return Err(SessionError::Config(
                "idle_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
