//! Phase state machine.
//!
//! The [`Game`] owns the authoritative state and sequences the phases:
//!
//! ```text
//!  AwaitingNightAction ──night_action──▶ AwaitingVote ──vote──▶ AwaitingNightAction
//!          │                                  │                        │
//!          └──────────── win condition ───────┴────────────────────────┴──▶ Terminal
//! ```
//!
//! Each accepted action clears the narrated log, runs to completion, and
//! finishes with the win-condition check. A rejected action leaves the
//! game exactly as it was.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::action::PlayerAction;
use crate::agent::{Agent, Location, Role, Team, DEFAULT_PLAYER_NAME, ROSTER};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::planner::{PlanView, Planner};
use crate::rules::check_winner;
use crate::snapshot::{AgentView, GameSnapshot, LogEntry, LogKind};
use crate::suspicion::{Detective, Evidence};
use crate::voting::{resolve_vote, VoteOutcome, VoteTally};
use crate::Result;

/// Number of randomly moving crew members in a fresh game.
const CREW_SIZE: usize = 3;

/// Where the game is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingNightAction,
    AwaitingVote,
    Terminal,
}

/// One game of Pawsmonauts.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    rng: StdRng,
    detective: Detective,
    planner: Planner,
    turn: u32,
    agents: Vec<Agent>,
    log: Vec<LogEntry>,
    phase: Phase,
    winner: Option<Team>,
    sabotaged_location: Option<Location>,
    tasks_completed_by: Vec<String>,
    /// Most to least suspicious, from the last day phase.
    ranking: Vec<(String, f64)>,
    last_tally: Option<VoteTally>,
}

impl Game {
    /// Starts a fresh game: the player, one impostor and three crew
    /// members drawn from the roster, in shuffled order.
    ///
    /// A blank or missing `player_name` falls back to the default identity.
    pub fn new(config: GameConfig, player_name: Option<&str>) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let player_name = player_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PLAYER_NAME);

        let mut pool: Vec<&str> = ROSTER
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| *name != DEFAULT_PLAYER_NAME && *name != player_name)
            .collect();
        pool.shuffle(&mut rng);

        let mut names = pool.into_iter();
        let impostor = names
            .next()
            .ok_or_else(|| GameError::invalid_roster("no name left for the impostor"))?;

        let mut agents = vec![Agent::player(player_name), Agent::impostor(impostor)];
        agents.extend(names.take(CREW_SIZE).map(Agent::crew));
        agents.shuffle(&mut rng);

        info!(player = player_name, agents = agents.len(), "new game started");
        Self::assemble(config, rng, agents)
    }

    /// Builds a game from an explicit roster, kept in the given order.
    pub fn with_roster(config: GameConfig, agents: Vec<Agent>) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::assemble(config, rng, agents)
    }

    fn assemble(config: GameConfig, rng: StdRng, agents: Vec<Agent>) -> Result<Self> {
        validate_roster(&agents)?;

        let mut game = Self {
            planner: Planner::from_config(&config),
            detective: Detective::new(),
            config,
            rng,
            turn: 1,
            agents,
            log: Vec::new(),
            phase: Phase::AwaitingNightAction,
            winner: None,
            sabotaged_location: None,
            tasks_completed_by: Vec::new(),
            ranking: Vec::new(),
            last_tally: None,
        };
        game.add_log("Mission Start! Good luck.", LogKind::System);
        Ok(game)
    }

    /// Applies one player action and returns the resulting snapshot.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameAlreadyOver`] once a winner is decided
    /// - [`GameError::InvalidAction`] for votes naming an unknown or
    ///   ejected agent, or a vote cast by an ejected player
    pub fn submit(&mut self, action: PlayerAction) -> Result<GameSnapshot> {
        if self.is_over() {
            warn!(turn = self.turn, "action rejected: game is over");
            return Err(GameError::GameAlreadyOver);
        }
        if let Err(err) = self.validate(&action) {
            warn!(turn = self.turn, %err, "action rejected");
            return Err(err);
        }

        self.log.clear();
        match action {
            PlayerAction::NightAction { location } => {
                self.run_night_phase(location);
                self.run_day_phase();
            }
            PlayerAction::Vote { vote } => {
                self.run_voting_phase(vote.as_deref());
            }
        }
        self.check_win_conditions();

        Ok(self.snapshot())
    }

    /// Parses a JSON payload and applies it.
    pub fn submit_json(&mut self, payload: serde_json::Value) -> Result<GameSnapshot> {
        if self.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let action = PlayerAction::from_json(payload)?;
        self.submit(action)
    }

    fn validate(&self, action: &PlayerAction) -> Result<()> {
        let PlayerAction::Vote { vote: Some(target) } = action else {
            return Ok(());
        };

        let agent = self
            .agent(target)
            .ok_or_else(|| GameError::invalid_action(format!("unknown agent '{target}'")))?;
        if !agent.is_alive() {
            return Err(GameError::invalid_action(format!(
                "'{target}' has already been ejected"
            )));
        }
        if self.player().is_some_and(|p| !p.is_alive()) {
            return Err(GameError::invalid_action("ejected players cannot vote"));
        }
        Ok(())
    }

    fn run_night_phase(&mut self, player_location: Location) {
        debug!(turn = self.turn, %player_location, "night phase");

        let player_alive = self.player().is_some_and(|p| p.is_alive());
        if player_alive {
            if let Some(player) = self.agents.iter_mut().find(|a| a.is_player()) {
                player.location = Some(player_location);
            }
            self.add_log(
                format!("You head to the {player_location} to work."),
                LogKind::Player,
            );
        } else {
            self.add_log("You watch the night unfold as a ghost.", LogKind::System);
        }

        // Impostor
        let view = PlanView::from_agents(&self.agents, self.turn, self.is_over());
        let mv = self.planner.choose(&view, &mut self.rng);
        if let Some(impostor) = self.agents.iter_mut().find(|a| a.is_impostor()) {
            impostor.location = Some(mv.location);
        }
        self.sabotaged_location = mv.is_sabotage().then_some(mv.location);

        // Crew
        let sabotaged = self.sabotaged_location;
        let rate = self.config.task_success_rate;
        self.tasks_completed_by.clear();
        for agent in self.agents.iter_mut() {
            if !agent.is_alive() || agent.role() != Role::Crew {
                continue;
            }
            let location = Location::ALL[self.rng.gen_range(0..Location::ALL.len())];
            agent.location = Some(location);
            if Some(location) != sabotaged && self.rng.gen::<f64>() < rate {
                self.tasks_completed_by.push(agent.name().to_string());
            }
        }

        // Player
        if player_alive && Some(player_location) != sabotaged && self.rng.gen::<f64>() < rate {
            if let Some(name) = self.player().map(|p| p.name().to_string()) {
                self.tasks_completed_by.push(name);
            }
        }

        self.phase = Phase::AwaitingVote;
    }

    fn run_day_phase(&mut self) {
        self.add_log(
            format!("--- Day {}: Morning Report ---", self.turn),
            LogKind::System,
        );
        match self.sabotaged_location {
            Some(location) => {
                self.add_log(format!("SABOTAGE in the {location}!"), LogKind::Sabotage)
            }
            None => self.add_log(
                "The night was quiet... suspiciously quiet.",
                LogKind::Normal,
            ),
        }
        if !self.tasks_completed_by.is_empty() {
            self.add_log(
                format!(
                    "Tasks successfully completed by: {}",
                    self.tasks_completed_by.join(", ")
                ),
                LogKind::Normal,
            );
        }

        let report = self.location_report();
        self.add_log(report, LogKind::Normal);

        let evidence = Evidence::gather(
            &self.agents,
            self.sabotaged_location,
            &self.tasks_completed_by,
        );
        let suspicions = self.detective.calculate(&evidence);
        for agent in self.agents.iter_mut().filter(|a| a.is_alive()) {
            if let Some(score) = suspicions.get(agent.name()) {
                agent.suspicion = score;
            }
        }
        self.ranking = suspicions.ranked();

        let mut analysis = String::from("Detective's Analysis:");
        for (name, score) in &self.ranking {
            analysis.push_str(&format!("\n{name}: {:.1}% suspicious", score * 100.0));
        }
        self.add_log(analysis, LogKind::Detective);

        debug!(turn = self.turn, ranking = ?self.ranking, "day phase finished");
    }

    fn location_report(&self) -> String {
        let mut report = String::from("Location Report:");
        for location in Location::ALL {
            let occupants: Vec<&str> = self
                .agents
                .iter()
                .filter(|a| a.is_alive() && a.location() == Some(location))
                .map(|a| a.name())
                .collect();
            if !occupants.is_empty() {
                report.push_str(&format!("\n{location}: {}", occupants.join(", ")));
            }
        }
        report
    }

    fn run_voting_phase(&mut self, player_vote: Option<&str>) {
        self.add_log("--- Emergency Meow-ting ---", LogKind::System);
        if let Some(target) = player_vote {
            self.add_log(format!("You voted for {target}."), LogKind::Player);
        }

        let ranking = self.voting_ranking();
        let (outcome, tally) = resolve_vote(&self.agents, &ranking, player_vote);

        for ballot in &tally.ballots {
            self.log.push(LogEntry::new(
                format!("{} voted for {}.", ballot.voter, ballot.target),
                LogKind::Vote,
            ));
        }

        match &outcome {
            VoteOutcome::Skipped => {
                self.add_log("The vote was skipped. No one was ejected.", LogKind::System)
            }
            VoteOutcome::Tie { names } => self.add_log(
                format!("Vote tied between {}. No one was ejected.", names.join(", ")),
                LogKind::System,
            ),
            VoteOutcome::Ejected { name, was_impostor } => {
                if let Some(agent) = self.agents.iter_mut().find(|a| a.name() == name) {
                    agent.alive = false;
                }
                info!(turn = self.turn, ejected = %name, was_impostor, "agent ejected");
                self.add_log(format!("{name} was ejected..."), LogKind::Sabotage);
                if *was_impostor {
                    self.add_log(format!("{name} was the Impawster!"), LogKind::System);
                    self.finish(Team::Crew);
                } else {
                    self.add_log(format!("{name} was a Pawsmonaut."), LogKind::System);
                }
            }
        }

        self.last_tally = Some(tally);
        self.turn += 1;
        if !self.is_over() {
            self.phase = Phase::AwaitingNightAction;
        }
    }

    /// Last day's ranking restricted to living agents. Before the first
    /// day it is the living agents by current suspicion, roster order on
    /// ties.
    fn voting_ranking(&self) -> Vec<String> {
        let living: HashSet<&str> = self
            .agents
            .iter()
            .filter(|a| a.is_alive())
            .map(|a| a.name())
            .collect();

        let ranking: Vec<String> = self
            .ranking
            .iter()
            .filter(|(name, _)| living.contains(name.as_str()))
            .map(|(name, _)| name.clone())
            .collect();
        if !ranking.is_empty() {
            return ranking;
        }

        let mut fallback: Vec<&Agent> = self.agents.iter().filter(|a| a.is_alive()).collect();
        fallback.sort_by(|a, b| b.suspicion().total_cmp(&a.suspicion()));
        fallback.into_iter().map(|a| a.name().to_string()).collect()
    }

    fn check_win_conditions(&mut self) {
        if self.is_over() {
            return;
        }
        if let Some(team) = check_winner(&self.agents, self.turn, self.config.max_turns) {
            self.finish(team);
        }
    }

    fn finish(&mut self, team: Team) {
        self.winner = Some(team);
        self.phase = Phase::Terminal;
        info!(turn = self.turn, winner = %team, "game over");
        let message = match team {
            Team::Crew => "Game over! The Crew wins.",
            Team::Impostor => "Game over! The Impostor wins.",
        };
        self.add_log(message, LogKind::System);
    }

    fn add_log(&mut self, message: impl Into<String>, kind: LogKind) {
        self.log.push(LogEntry::new(message, kind));
    }

    /// Serializable view of the current state.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            turn: self.turn,
            agents: self.agents.iter().map(AgentView::from).collect(),
            game_over: self.is_over(),
            winner: self.winner,
            log: self.log.clone(),
            locations: Location::ALL.to_vec(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name() == name)
    }

    pub fn player(&self) -> Option<&Agent> {
        self.agents.iter().find(|a| a.is_player())
    }

    pub fn impostor(&self) -> Option<&Agent> {
        self.agents.iter().find(|a| a.is_impostor())
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Room sabotaged during the last night, if any.
    pub fn sabotaged_location(&self) -> Option<Location> {
        self.sabotaged_location
    }

    /// Agents that finished a task during the last night.
    pub fn tasks_completed_by(&self) -> &[String] {
        &self.tasks_completed_by
    }

    /// Ranking from the last day phase.
    pub fn ranking(&self) -> &[(String, f64)] {
        &self.ranking
    }

    /// Tally of the last meeting.
    pub fn last_tally(&self) -> Option<&VoteTally> {
        self.last_tally.as_ref()
    }
}

fn validate_roster(agents: &[Agent]) -> Result<()> {
    if agents.is_empty() {
        return Err(GameError::invalid_roster("roster is empty"));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = agents.iter().find(|a| !seen.insert(a.name())) {
        return Err(GameError::invalid_roster(format!(
            "duplicate agent name '{}'",
            dup.name()
        )));
    }

    let impostors = agents.iter().filter(|a| a.is_impostor()).count();
    if impostors != 1 {
        return Err(GameError::invalid_roster(format!(
            "expected exactly one impostor, found {impostors}"
        )));
    }
    let players = agents.iter().filter(|a| a.is_player()).count();
    if players != 1 {
        return Err(GameError::invalid_roster(format!(
            "expected exactly one player, found {players}"
        )));
    }
    Ok(())
}
