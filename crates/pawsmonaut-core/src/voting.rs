//! Voting resolver for the emergency meeting.
//!
//! # Voting Rules
//!
//! - Every living agent starts with zero votes
//! - The player's vote (if any) counts once
//! - Each living AI agent votes for the most suspicious living agent, or
//!   for the runner-up when it is itself the most suspicious
//! - A unique plurality leader is ejected; a shared lead is a tie and
//!   nobody leaves; no votes at all means the vote was skipped

use serde::{Deserialize, Serialize};

use crate::agent::Agent;

/// One AI agent's vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub voter: String,
    pub target: String,
}

/// How the meeting ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    /// A single agent had the most votes and leaves the ship.
    Ejected {
        name: String,
        was_impostor: bool,
    },
    /// Several agents share the most votes.
    Tie { names: Vec<String> },
    /// Nobody voted.
    Skipped,
}

impl VoteOutcome {
    pub fn is_ejection(&self) -> bool {
        matches!(self, VoteOutcome::Ejected { .. })
    }

    /// Name of the ejected agent, if any.
    pub fn ejected(&self) -> Option<&str> {
        match self {
            VoteOutcome::Ejected { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Votes per living agent, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// `(agent, votes)` for every living agent.
    pub counts: Vec<(String, usize)>,
    /// The AI agents' ballots, in roster order.
    pub ballots: Vec<Ballot>,
    /// Who the player voted for.
    pub player_vote: Option<String>,
}

impl VoteTally {
    /// Counts the player's vote and the AI ballots for the given candidates.
    pub fn from_ballots(
        candidates: &[String],
        player_vote: Option<&str>,
        ballots: Vec<Ballot>,
    ) -> Self {
        let mut counts: Vec<(String, usize)> =
            candidates.iter().map(|name| (name.clone(), 0)).collect();

        let targets = player_vote
            .into_iter()
            .chain(ballots.iter().map(|b| b.target.as_str()));
        for target in targets {
            if let Some(entry) = counts.iter_mut().find(|(name, _)| name == target) {
                entry.1 += 1;
            }
        }

        Self {
            counts,
            ballots,
            player_vote: player_vote.map(str::to_string),
        }
    }

    pub fn votes_for(&self, name: &str) -> usize {
        self.counts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }

    /// Highest number of votes any candidate received.
    pub fn max_votes(&self) -> usize {
        self.counts.iter().map(|(_, v)| *v).max().unwrap_or(0)
    }

    /// Candidates holding the highest count.
    pub fn leaders(&self) -> Vec<&str> {
        let max = self.max_votes();
        self.counts
            .iter()
            .filter(|(_, v)| *v == max)
            .map(|(n, _)| n.as_str())
            .collect()
    }
}

/// Target an AI agent picks from a most-to-least suspicious ranking of
/// living agents.
pub fn strategic_target<'a>(voter: &str, ranking: &'a [String]) -> Option<&'a str> {
    let top = ranking.first()?;
    if top == voter {
        Some(ranking.get(1).unwrap_or(top).as_str())
    } else {
        Some(top.as_str())
    }
}

/// Runs the meeting.
///
/// `ranking` holds living agents only, most suspicious first. Nothing is
/// mutated; the caller applies the ejection.
pub fn resolve_vote(
    agents: &[Agent],
    ranking: &[String],
    player_vote: Option<&str>,
) -> (VoteOutcome, VoteTally) {
    let candidates: Vec<String> = agents
        .iter()
        .filter(|a| a.is_alive())
        .map(|a| a.name().to_string())
        .collect();

    let ballots: Vec<Ballot> = agents
        .iter()
        .filter(|a| a.is_alive() && !a.is_player())
        .filter_map(|a| {
            strategic_target(a.name(), ranking).map(|target| Ballot {
                voter: a.name().to_string(),
                target: target.to_string(),
            })
        })
        .collect();

    let tally = VoteTally::from_ballots(&candidates, player_vote, ballots);
    let max_votes = tally.max_votes();
    let leaders = tally.leaders();

    let outcome = if (max_votes == 0 && player_vote.is_none()) || leaders.is_empty() {
        VoteOutcome::Skipped
    } else if leaders.len() > 1 {
        VoteOutcome::Tie {
            names: leaders.iter().map(|n| n.to_string()).collect(),
        }
    } else {
        let name = leaders[0].to_string();
        let was_impostor = agents
            .iter()
            .any(|a| a.name() == name && a.is_impostor());
        VoteOutcome::Ejected { name, was_impostor }
    };

    (outcome, tally)
}
