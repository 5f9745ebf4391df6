//! # Pawsmonaut Core
//!
//! Turn-based hidden-role game: a crew of Pawsmonauts, one hidden
//! Impawster, and one player-controlled crew member cycle through night,
//! day and voting phases until someone wins.
//!
//! ## Components
//!
//! | Component | Module | Purpose |
//! |-----------|--------|---------|
//! | Entity model | [`agent`] | Locations, roles, agents |
//! | Suspicion engine | [`suspicion`] | Evidence → normalized suspicion |
//! | Impostor planner | [`planner`] | Minimax + alpha-beta over a narrow view |
//! | Voting resolver | [`voting`] | Strategic AI ballots, tally, ejection |
//! | Win conditions | [`rules`] | Terminal checks after every action |
//! | Phase state machine | [`game`] | Owns state, sequences the phases |
//!
//! ## Architecture
//!
//! ```text
//!   PlayerAction ──▶ ┌──────────────────────────────┐ ──▶ GameSnapshot
//!                    │             Game             │
//!                    └──┬──────────┬─────────┬──────┘
//!                       ▼          ▼         ▼
//!                  ┌─────────┐ ┌────────┐ ┌────────┐
//!                  │ Planner │ │Detective│ │ Voting │ ──▶ rules
//!                  └─────────┘ └────────┘ └────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pawsmonaut_core::{GameConfig, GameHost, Location, PlayerAction};
//!
//! let mut host = GameHost::new(GameConfig::default().with_seed(7));
//! let start = host.start_game(Some("Pawsmonaut Prime"))?;
//! assert_eq!(start.turn, 1);
//!
//! let day = host.submit_action(PlayerAction::night(Location::Cafeteria))?;
//! assert_eq!(day.turn, 1);
//! # Ok::<(), pawsmonaut_core::GameError>(())
//! ```
//!
//! ## Notes
//!
//! - Everything is synchronous; each accepted action runs to completion
//! - The planner works on copies and never touches live state
//! - A rejected action leaves the game untouched
//! - One `Game` must not receive concurrent actions; callers serialize
//!   access per game

pub mod action;
pub mod agent;
pub mod config;
pub mod error;
pub mod game;
pub mod host;
pub mod planner;
pub mod rules;
pub mod snapshot;
pub mod suspicion;
pub mod voting;

pub use action::PlayerAction;
pub use agent::{Agent, Location, Role, Team, DEFAULT_PLAYER_NAME};
pub use config::{GameConfig, PlannerWeights};
pub use error::GameError;
pub use game::{Game, Phase};
pub use host::GameHost;
pub use planner::{ImpostorMove, MoveKind, PlanView, Planner, SearchStats};
pub use rules::check_winner;
pub use snapshot::{AgentView, GameSnapshot, LogEntry, LogKind};
pub use suspicion::{Detective, Evidence, LikelihoodTable, Suspicions};
pub use voting::{resolve_vote, Ballot, VoteOutcome, VoteTally};

/// Result type for game operations.
pub type Result<T> = std::result::Result<T, GameError>;
