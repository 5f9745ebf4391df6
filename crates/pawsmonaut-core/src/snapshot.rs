//! Serializable view of a game, returned after every accepted call.

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Location, Team};

/// Kind of a narrated log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    System,
    Player,
    Normal,
    Sabotage,
    Detective,
    Vote,
}

/// One narrated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, kind: LogKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// An agent as the caller sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentView {
    pub name: String,
    pub avatar: String,
    pub alive: bool,
    pub location: Option<Location>,
    pub player_controlled: bool,
    pub suspicion_score: f64,
    pub is_impostor: bool,
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        Self {
            name: agent.name().to_string(),
            avatar: agent.avatar().to_string(),
            alive: agent.is_alive(),
            location: agent.location(),
            player_controlled: agent.is_player(),
            suspicion_score: agent.suspicion(),
            is_impostor: agent.is_impostor(),
        }
    }
}

/// Full game state handed back to the caller.
///
/// `log` only carries the events of the call that produced the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub turn: u32,
    pub agents: Vec<AgentView>,
    pub game_over: bool,
    pub winner: Option<Team>,
    pub log: Vec<LogEntry>,
    pub locations: Vec<Location>,
}

impl GameSnapshot {
    /// The player-controlled agent.
    pub fn player(&self) -> Option<&AgentView> {
        self.agents.iter().find(|a| a.player_controlled)
    }

    pub fn agent(&self, name: &str) -> Option<&AgentView> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn living(&self) -> impl Iterator<Item = &AgentView> {
        self.agents.iter().filter(|a| a.alive)
    }

    /// True if any log entry of `kind` contains `needle`.
    pub fn log_contains(&self, kind: LogKind, needle: &str) -> bool {
        self.log
            .iter()
            .any(|e| e.kind == kind && e.message.contains(needle))
    }
}
