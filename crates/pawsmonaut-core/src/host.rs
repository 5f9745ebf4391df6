//! Single-game host: the two boundary operations over at most one game.

use tracing::warn;

use crate::action::PlayerAction;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::Game;
use crate::snapshot::GameSnapshot;
use crate::Result;

/// Holds the active game, if any. Starting a game replaces the previous one.
#[derive(Debug, Default)]
pub struct GameHost {
    config: GameConfig,
    game: Option<Game>,
}

impl GameHost {
    pub fn new(config: GameConfig) -> Self {
        Self { config, game: None }
    }

    /// Creates a fresh game and returns its first snapshot.
    pub fn start_game(&mut self, player_name: Option<&str>) -> Result<GameSnapshot> {
        let game = Game::new(self.config.clone(), player_name)?;
        let snapshot = game.snapshot();
        self.game = Some(game);
        Ok(snapshot)
    }

    /// Applies an action to the active game.
    pub fn submit_action(&mut self, action: PlayerAction) -> Result<GameSnapshot> {
        self.active_game()?.submit(action)
    }

    /// Parses and applies a JSON action payload.
    pub fn submit_json(&mut self, payload: serde_json::Value) -> Result<GameSnapshot> {
        self.active_game()?.submit_json(payload)
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    fn active_game(&mut self) -> Result<&mut Game> {
        match self.game.as_mut() {
            Some(game) => Ok(game),
            None => {
                warn!("action rejected: no active game");
                Err(GameError::NoActiveGame)
            }
        }
    }
}
