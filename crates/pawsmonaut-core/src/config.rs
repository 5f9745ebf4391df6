//! Configuration types for a game.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::Result;

/// Configuration for a single game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Last turn the crew may survive; the impostor wins once `turn`
    /// exceeds it.
    pub max_turns: u32,

    /// Probability that a crew member (or the player) completes a task
    /// at an unsabotaged location.
    pub task_success_rate: f64,

    /// Impostor look-ahead depth, counted in plies.
    pub search_depth: u32,

    /// Seed for every random draw in the game. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Impostor planner heuristic weights.
    pub planner: PlannerWeights,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            task_success_rate: 0.9,
            search_depth: 3,
            seed: None,
            planner: PlannerWeights::default(),
        }
    }
}

impl GameConfig {
    /// Returns a copy with a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_turns == 0 {
            return Err(GameError::Config("max_turns must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.task_success_rate) {
            return Err(GameError::Config(format!(
                "task_success_rate must be within [0, 1], got {}",
                self.task_success_rate
            )));
        }
        if self.search_depth == 0 {
            return Err(GameError::Config("search_depth must be at least 1".into()));
        }
        Ok(())
    }
}

/// Weights of the impostor's heuristic evaluation.
///
/// Score of a non-terminal position is
/// `crew_alive * living_crew + own_suspicion * own + others_suspicion * others`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerWeights {
    /// Value of a position where at most one crew member is left.
    pub win: f64,
    /// Value of a position where the turn limit has been reached.
    pub loss: f64,
    /// Per living crew member.
    pub crew_alive: f64,
    /// Multiplier on the impostor's own suspicion.
    pub own_suspicion: f64,
    /// Multiplier on the summed suspicion of every other agent.
    pub others_suspicion: f64,
}

impl Default for PlannerWeights {
    fn default() -> Self {
        Self {
            win: 1000.0,
            loss: -1000.0,
            crew_alive: 20.0,
            own_suspicion: -100.0,
            others_suspicion: 50.0,
        }
    }
}
