//! Impostor planner.
//!
//! Depth-limited minimax with alpha-beta pruning over a narrow, copyable
//! [`PlanView`] of the game. The impostor maximizes at its own decision
//! nodes. The crew is not modelled move by move: its reply collapses into
//! a single transition that only advances the turn counter.
//!
//! ```text
//!   max (impostor)      10 moves: {sabotage, fake_task} x locations
//!     └─ min (crew)     1 successor: turn + 1
//!          └─ max ...
//! ```
//!
//! Move order is `Bridge.sabotage, Bridge.fake_task, Engine Room.sabotage, ...`
//! and the first move reaching the best value is kept, so ties favour
//! earlier locations and sabotage over fake tasks.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::agent::{Agent, Location};
use crate::config::{GameConfig, PlannerWeights};

/// What the impostor does at night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Block every task in the room.
    Sabotage,
    /// Pretend to work in the room.
    FakeTask,
}

/// One impostor move: a kind and the room it happens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImpostorMove {
    pub kind: MoveKind,
    pub location: Location,
}

impl ImpostorMove {
    pub const fn sabotage(location: Location) -> Self {
        Self {
            kind: MoveKind::Sabotage,
            location,
        }
    }

    pub const fn fake_task(location: Location) -> Self {
        Self {
            kind: MoveKind::FakeTask,
            location,
        }
    }

    /// The full move space in search order.
    pub fn all() -> Vec<ImpostorMove> {
        Location::ALL
            .iter()
            .flat_map(|&loc| [Self::sabotage(loc), Self::fake_task(loc)])
            .collect()
    }

    pub fn is_sabotage(&self) -> bool {
        self.kind == MoveKind::Sabotage
    }
}

impl fmt::Display for ImpostorMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MoveKind::Sabotage => write!(f, "sabotage {}", self.location),
            MoveKind::FakeTask => write!(f, "fake task in {}", self.location),
        }
    }
}

/// The fields of the game the heuristic and branching read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanView {
    pub turn: u32,
    pub game_over: bool,
    pub living_crew: usize,
    pub own_suspicion: f64,
    /// Summed suspicion of every agent other than the impostor.
    pub others_suspicion: f64,
}

impl PlanView {
    /// Builds the view from the impostor's point of view.
    pub fn from_agents(agents: &[Agent], turn: u32, game_over: bool) -> Self {
        let mut own_suspicion = 0.0;
        let mut others_suspicion = 0.0;
        for agent in agents {
            if agent.is_impostor() {
                own_suspicion += agent.suspicion();
            } else {
                others_suspicion += agent.suspicion();
            }
        }

        Self {
            turn,
            game_over,
            living_crew: agents.iter().filter(|a| a.is_living_crew()).count(),
            own_suspicion,
            others_suspicion,
        }
    }

    /// The impostor's move leaves every heuristic input unchanged.
    fn after_impostor_move(self, _mv: ImpostorMove) -> Self {
        self
    }

    fn after_crew_response(self) -> Self {
        Self {
            turn: self.turn + 1,
            ..self
        }
    }
}

/// Counters from one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes visited, root included.
    pub nodes: u64,
    /// Branches skipped by alpha-beta.
    pub cutoffs: u64,
}

/// Minimax planner for the impostor.
#[derive(Debug, Clone)]
pub struct Planner {
    depth: u32,
    max_turns: u32,
    weights: PlannerWeights,
    moves: Vec<ImpostorMove>,
}

impl Planner {
    pub fn new(depth: u32, max_turns: u32, weights: PlannerWeights) -> Self {
        Self {
            depth,
            max_turns,
            weights,
            moves: ImpostorMove::all(),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.search_depth, config.max_turns, config.planner)
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn moves(&self) -> &[ImpostorMove] {
        &self.moves
    }

    /// Static evaluation of a position, from the impostor's side.
    pub fn evaluate(&self, view: &PlanView) -> f64 {
        if view.living_crew <= 1 {
            return self.weights.win;
        }
        if view.turn >= self.max_turns {
            return self.weights.loss;
        }
        self.weights.crew_alive * view.living_crew as f64
            + self.weights.own_suspicion * view.own_suspicion
            + self.weights.others_suspicion * view.others_suspicion
    }

    /// Runs the search and returns the best value and move, if any.
    pub fn search(&self, view: &PlanView) -> (Option<(f64, ImpostorMove)>, SearchStats) {
        let mut stats = SearchStats::default();
        let (value, best) = self.minimax(
            *view,
            self.depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
            true,
            &mut stats,
        );
        (best.map(|mv| (value, mv)), stats)
    }

    /// Picks the impostor's move, falling back to a random legal move when
    /// the search produces none.
    pub fn choose<R: Rng + ?Sized>(&self, view: &PlanView, rng: &mut R) -> ImpostorMove {
        let (best, stats) = self.search(view);
        debug!(
            nodes = stats.nodes,
            cutoffs = stats.cutoffs,
            turn = view.turn,
            "impostor search finished"
        );

        match best {
            Some((value, mv)) => {
                debug!(%mv, value, "impostor move chosen");
                mv
            }
            None => {
                let mv = self
                    .moves
                    .choose(rng)
                    .copied()
                    .unwrap_or(ImpostorMove::sabotage(Location::Bridge));
                debug!(%mv, "search produced no move, picked at random");
                mv
            }
        }
    }

    fn minimax(
        &self,
        view: PlanView,
        depth: u32,
        mut alpha: f64,
        beta: f64,
        maximizing: bool,
        stats: &mut SearchStats,
    ) -> (f64, Option<ImpostorMove>) {
        stats.nodes += 1;

        if depth == 0 || view.game_over {
            return (self.evaluate(&view), None);
        }

        if maximizing {
            let mut best_value = f64::NEG_INFINITY;
            let mut best_move = None;

            for (i, &mv) in self.moves.iter().enumerate() {
                let child = view.after_impostor_move(mv);
                let (value, _) = self.minimax(child, depth - 1, alpha, beta, false, stats);
                if value > best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
                alpha = alpha.max(value);
                // Crew nodes have a single successor and pass beta through
                // untouched, so from the full window `search` opens with
                // this never fires.
                if beta <= alpha {
                    stats.cutoffs += (self.moves.len() - i - 1) as u64;
                    break;
                }
            }

            (best_value, best_move)
        } else {
            let (value, _) =
                self.minimax(view.after_crew_response(), depth - 1, alpha, beta, true, stats);
            (value, None)
        }
    }
}
