//! Suspicion engine.
//!
//! Turns one night's behavioural evidence into a normalized suspicion
//! weight per living agent.
//!
//! # Scoring
//!
//! Each living agent gets a raw score
//!
//! ```text
//! raw = 1/N * Π P(observed feature | impostor)
//! ```
//!
//! where a false observation contributes `1 - p`. Raw scores are then
//! divided by their sum, so the living agents' weights total 1. Only the
//! impostor-side table enters the raw score; the crew-side table is kept
//! for reporting and comparison. A zero sum falls back to a uniform `1/N`.
//!
//! | feature | P(true \| impostor) | P(true \| crew) |
//! |---|---|---|
//! | at sabotage location | 0.70 | 0.25 |
//! | completed task | 0.05 | 0.90 |
//! | alone | 0.60 | 0.30 |

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Location};

/// The three observations made about one agent after a night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evidence {
    /// Spent the night in the sabotaged room.
    pub at_sabotage_location: bool,
    /// Finished a task.
    pub completed_task: bool,
    /// Was the only living agent in its room.
    pub alone: bool,
}

impl Evidence {
    /// Collects evidence for every living agent, in roster order.
    pub fn gather(
        agents: &[Agent],
        sabotaged: Option<Location>,
        completed_by: &[String],
    ) -> Vec<(String, Evidence)> {
        let living: Vec<&Agent> = agents.iter().filter(|a| a.is_alive()).collect();

        living
            .iter()
            .map(|agent| {
                let here = agent.location();
                let occupants = living.iter().filter(|other| other.location() == here).count();
                let evidence = Evidence {
                    at_sabotage_location: sabotaged.is_some() && here == sabotaged,
                    completed_task: completed_by.iter().any(|n| n == agent.name()),
                    alone: occupants == 1,
                };
                (agent.name().to_string(), evidence)
            })
            .collect()
    }
}

/// Conditional probabilities of each feature being observed true.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodTable {
    pub at_sabotage_location: f64,
    pub completed_task: f64,
    pub alone: f64,
}

impl LikelihoodTable {
    /// Feature probabilities given the agent is the impostor.
    pub const IMPOSTOR: Self = Self {
        at_sabotage_location: 0.70,
        completed_task: 0.05,
        alone: 0.60,
    };

    /// Feature probabilities given the agent is crew.
    pub const CREW: Self = Self {
        at_sabotage_location: 0.25,
        completed_task: 0.90,
        alone: 0.30,
    };

    /// Joint probability of the observed evidence, features independent.
    pub fn likelihood(&self, evidence: &Evidence) -> f64 {
        fn term(p: f64, observed: bool) -> f64 {
            if observed {
                p
            } else {
                1.0 - p
            }
        }

        term(self.at_sabotage_location, evidence.at_sabotage_location)
            * term(self.completed_task, evidence.completed_task)
            * term(self.alone, evidence.alone)
    }
}

/// Normalized suspicion weights, in the order the evidence was given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suspicions {
    scores: Vec<(String, f64)>,
}

impl Suspicions {
    /// Weight for `name`, if it was scored.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(n, s)| (n.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.scores.iter().map(|(_, s)| s).sum()
    }

    /// Most to least suspicious. Equal weights keep input order.
    pub fn ranked(&self) -> Vec<(String, f64)> {
        let mut ranked = self.scores.clone();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// The ship's detective: scores evidence against the fixed tables.
#[derive(Debug, Clone)]
pub struct Detective {
    impostor: LikelihoodTable,
    crew: LikelihoodTable,
}

impl Default for Detective {
    fn default() -> Self {
        Self::new()
    }
}

impl Detective {
    pub fn new() -> Self {
        Self {
            impostor: LikelihoodTable::IMPOSTOR,
            crew: LikelihoodTable::CREW,
        }
    }

    pub fn impostor_table(&self) -> &LikelihoodTable {
        &self.impostor
    }

    pub fn crew_table(&self) -> &LikelihoodTable {
        &self.crew
    }

    /// Scores every agent in `evidence`; the slice is the living set.
    pub fn calculate(&self, evidence: &[(String, Evidence)]) -> Suspicions {
        if evidence.is_empty() {
            return Suspicions::default();
        }

        let prior = 1.0 / evidence.len() as f64;
        let raw: Vec<(String, f64)> = evidence
            .iter()
            .map(|(name, ev)| (name.clone(), prior * self.impostor.likelihood(ev)))
            .collect();

        let total: f64 = raw.iter().map(|(_, s)| s).sum();
        let scores = if total == 0.0 {
            raw.into_iter().map(|(name, _)| (name, prior)).collect()
        } else {
            raw.into_iter().map(|(name, s)| (name, s / total)).collect()
        };

        Suspicions { scores }
    }
}
