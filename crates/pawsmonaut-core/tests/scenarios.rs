//! # Pawsmonaut Game Scenarios
//!
//! End-to-end games driven through the public API.
//!
//! ## Coverage
//!
//! | Behaviour | Test |
//! |-----------|------|
//! | Quiet night report | `test_night_report_without_sabotage` |
//! | Tie keeps everybody aboard | `test_tied_vote_ejects_nobody` |
//! | Sabotage blocks the player's task | `test_sabotage_blocks_player_task` |
//! | Crew down to parity | `test_crew_ejection_to_parity_hands_impostor_the_win` |
//! | Turn limit | `test_turn_limit_hands_impostor_the_win` |
//! | Impostor ejected | `test_ejecting_impostor_wins_for_crew` |
//! | Ejected agents keep their score | `test_dead_agents_keep_their_last_score` |
//! | Seeded replay | `test_seeded_replay_is_identical` |
//! | Invariants over random play | `test_invariants_hold_over_random_games` |

use pawsmonaut_core::{
    Agent, Game, GameConfig, GameError, GameHost, GameSnapshot, Location, LogKind, Phase,
    PlayerAction, Team, DEFAULT_PLAYER_NAME,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn seeded(seed: u64) -> GameConfig {
    GameConfig::default().with_seed(seed)
}

/// Impostor first, then one crew member, then the player.
fn trio() -> Vec<Agent> {
    vec![
        Agent::impostor("Commander Rex"),
        Agent::crew("Dr. Bubbles"),
        Agent::player(DEFAULT_PLAYER_NAME),
    ]
}

fn living_suspicion_total(snapshot: &GameSnapshot) -> f64 {
    snapshot.living().map(|a| a.suspicion_score).sum()
}

// =============================================================================
// NIGHT AND DAY
// =============================================================================

#[test]
fn test_night_report_without_sabotage() {
    let mut host = GameHost::new(seeded(2024));
    let start = host.start_game(None).unwrap();
    assert_eq!(start.agents.len(), 5);
    assert_eq!(start.agents.iter().filter(|a| a.is_impostor).count(), 1);
    assert_eq!(start.agents.iter().filter(|a| a.player_controlled).count(), 1);

    // The planner sabotages the Bridge, so MedBay is quiet.
    let day = host
        .submit_action(PlayerAction::night(Location::MedBay))
        .unwrap();

    assert_eq!(day.turn, 1);
    assert!(day.log_contains(LogKind::Player, "You head to the MedBay to work."));
    assert!(day.log_contains(LogKind::System, "--- Day 1: Morning Report ---"));
    assert!(day.log_contains(LogKind::Normal, "Location Report:"));
    assert!(day.log_contains(LogKind::Normal, "MedBay: "));
    assert!(day.log_contains(LogKind::Detective, "Detective's Analysis:"));
    assert!((living_suspicion_total(&day) - 1.0).abs() < 1e-9);
}

#[test]
fn test_sabotage_blocks_player_task() {
    for seed in 0..50 {
        let mut game = Game::new(seeded(seed), None).unwrap();
        let day = game.submit(PlayerAction::night(Location::Bridge)).unwrap();

        assert_eq!(game.sabotaged_location(), Some(Location::Bridge));
        assert!(day.log_contains(LogKind::Sabotage, "SABOTAGE in the Bridge!"));
        assert!(
            !game.tasks_completed_by().iter().any(|n| n == DEFAULT_PLAYER_NAME),
            "seed {seed}: player finished a task in a sabotaged room"
        );
    }
}

#[test]
fn test_night_and_day_leave_turn_alone() {
    let mut game = Game::new(seeded(5), None).unwrap();
    for location in Location::ALL {
        let day = game.submit(PlayerAction::night(location)).unwrap();
        assert_eq!(day.turn, 1);
    }
    assert_eq!(game.phase(), Phase::AwaitingVote);
}

// =============================================================================
// VOTING
// =============================================================================

#[test]
fn test_tied_vote_ejects_nobody() {
    // With three aboard and the player abstaining, the top suspect and the
    // other AI agent vote against each other.
    for seed in 0..30 {
        let mut game = Game::with_roster(seeded(seed), trio()).unwrap();
        game.submit(PlayerAction::night(Location::Cafeteria)).unwrap();

        let vote = game.submit(PlayerAction::abstain()).unwrap();
        assert!(vote.log_contains(LogKind::System, "Vote tied between"));
        assert!(vote.agents.iter().all(|a| a.alive));
        assert_eq!(vote.turn, 2);
        assert!(!vote.game_over);
    }
}

#[test]
fn test_ejecting_impostor_wins_for_crew() {
    let mut game = Game::with_roster(seeded(1), trio()).unwrap();
    let vote = game.submit(PlayerAction::vote("Commander Rex")).unwrap();

    assert!(vote.game_over);
    assert_eq!(vote.winner, Some(Team::Crew));
    assert!(!vote.agent("Commander Rex").unwrap().alive);
    assert_eq!(
        game.submit(PlayerAction::night(Location::Bridge)),
        Err(GameError::GameAlreadyOver)
    );
}

#[test]
fn test_crew_ejection_to_parity_hands_impostor_the_win() {
    let mut game = Game::with_roster(seeded(1), trio()).unwrap();
    let vote = game.submit(PlayerAction::vote("Dr. Bubbles")).unwrap();

    assert!(!vote.agent("Dr. Bubbles").unwrap().alive);
    assert!(vote.game_over);
    assert_eq!(vote.winner, Some(Team::Impostor));
    assert!(vote.log_contains(LogKind::System, "Dr. Bubbles was a Pawsmonaut."));
}

#[test]
fn test_crew_ejection_alone_does_not_end_full_game() {
    let agents = vec![
        Agent::crew("Captain Whiskers"),
        Agent::impostor("Commander Rex"),
        Agent::crew("Dr. Bubbles"),
        Agent::crew("Engineer Squeaky"),
        Agent::player(DEFAULT_PLAYER_NAME),
    ];
    let mut game = Game::with_roster(seeded(3), agents).unwrap();
    let vote = game.submit(PlayerAction::abstain()).unwrap();

    assert_eq!(vote.agents.iter().filter(|a| !a.alive).count(), 1);
    assert!(!vote.agent("Captain Whiskers").unwrap().alive);
    assert!(!vote.game_over);
}

#[test]
fn test_turn_limit_hands_impostor_the_win() {
    let mut game = Game::with_roster(seeded(77), trio()).unwrap();

    for round in 1..=10 {
        game.submit(PlayerAction::night(Location::Hydroponics)).unwrap();
        let vote = game.submit(PlayerAction::abstain()).unwrap();
        assert_eq!(vote.turn, round + 1);
        assert!(vote.agents.iter().all(|a| a.alive));

        if round < 10 {
            assert!(!vote.game_over, "ended early in round {round}");
        } else {
            assert!(vote.game_over);
            assert_eq!(vote.winner, Some(Team::Impostor));
        }
    }
}

#[test]
fn test_dead_agents_keep_their_last_score() {
    let agents = vec![
        Agent::crew("Captain Whiskers"),
        Agent::impostor("Commander Rex"),
        Agent::crew("Dr. Bubbles"),
        Agent::crew("Engineer Squeaky"),
        Agent::player(DEFAULT_PLAYER_NAME),
    ];
    let mut game = Game::with_roster(seeded(8), agents).unwrap();

    // No day yet, so the ranking is roster order and Whiskers goes first.
    let vote = game.submit(PlayerAction::abstain()).unwrap();
    assert!(!vote.game_over);
    let ejected = vote.agent("Captain Whiskers").unwrap();
    assert!(!ejected.alive);
    let frozen = ejected.suspicion_score;

    for location in [Location::MedBay, Location::Bridge] {
        let day = game.submit(PlayerAction::night(location)).unwrap();
        assert_eq!(day.agent("Captain Whiskers").unwrap().suspicion_score, frozen);
        assert!((living_suspicion_total(&day) - 1.0).abs() < 1e-9);
        assert!(!day.log_contains(LogKind::Detective, "Captain Whiskers"));
    }
}

// =============================================================================
// REJECTIONS
// =============================================================================

#[test]
fn test_no_active_game() {
    let mut host = GameHost::new(seeded(1));
    assert_eq!(
        host.submit_action(PlayerAction::abstain()),
        Err(GameError::NoActiveGame)
    );
}

#[test]
fn test_malformed_payloads_leave_state_untouched() {
    let mut game = Game::new(seeded(6), None).unwrap();
    game.submit(PlayerAction::night(Location::Bridge)).unwrap();
    let before = game.snapshot();

    let payloads = [
        serde_json::json!({"type": "night_action"}),
        serde_json::json!({"type": "vote"}),
        serde_json::json!({"type": "sleep"}),
        serde_json::json!({"type": "night_action", "location": "Airlock"}),
        serde_json::json!({"type": "vote", "vote": "Nobody Special"}),
        serde_json::json!("vote"),
    ];
    for payload in payloads {
        let err = game.submit_json(payload).unwrap_err();
        assert!(matches!(err, GameError::InvalidAction(_)), "{err}");
        assert_eq!(game.snapshot(), before);
    }
}

// =============================================================================
// DETERMINISM AND INVARIANTS
// =============================================================================

fn scripted_run(seed: u64) -> Vec<GameSnapshot> {
    let mut game = Game::new(seeded(seed), Some("Tester")).unwrap();
    let mut snapshots = vec![game.snapshot()];
    let script = [
        Location::Bridge,
        Location::Cafeteria,
        Location::EngineRoom,
        Location::MedBay,
        Location::Hydroponics,
    ];
    for location in script {
        for action in [PlayerAction::night(location), PlayerAction::abstain()] {
            match game.submit(action) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(GameError::GameAlreadyOver) => return snapshots,
                Err(other) => panic!("unexpected rejection: {other}"),
            }
        }
    }
    snapshots
}

#[test]
fn test_seeded_replay_is_identical() {
    for seed in [0, 1, 99, 31337] {
        assert_eq!(scripted_run(seed), scripted_run(seed));
    }
}

#[test]
fn test_invariants_hold_over_random_games() {
    let mut chooser = StdRng::seed_from_u64(12345);

    for seed in 0..40 {
        let mut game = Game::new(seeded(seed), None).unwrap();
        let mut last_turn = game.turn();

        for _ in 0..40 {
            if game.is_over() {
                break;
            }
            let action = if game.phase() == Phase::AwaitingVote {
                let living: Vec<String> = game
                    .agents()
                    .iter()
                    .filter(|a| a.is_alive())
                    .map(|a| a.name().to_string())
                    .collect();
                let player_alive = game.player().is_some_and(|p| p.is_alive());
                match living.choose(&mut chooser) {
                    Some(target) if player_alive => PlayerAction::vote(target.clone()),
                    _ => PlayerAction::abstain(),
                }
            } else {
                let location = *Location::ALL.choose(&mut chooser).unwrap();
                PlayerAction::night(location)
            };

            let was_vote = matches!(action, PlayerAction::Vote { .. });
            let alive_before: Vec<bool> = game.agents().iter().map(|a| a.is_alive()).collect();
            let snapshot = game.submit(action).unwrap();

            assert_eq!(snapshot.agents.iter().filter(|a| a.is_impostor).count(), 1);
            if was_vote {
                assert_eq!(snapshot.turn, last_turn + 1);
                let ejected = alive_before
                    .iter()
                    .zip(&snapshot.agents)
                    .filter(|(before, now)| **before && !now.alive)
                    .count();
                assert!(ejected <= 1);
                if snapshot.log_contains(LogKind::System, "Vote tied") {
                    assert_eq!(ejected, 0);
                }
            } else {
                assert_eq!(snapshot.turn, last_turn);
                let total = living_suspicion_total(&snapshot);
                assert!((total - 1.0).abs() < 1e-9, "seed {seed}: total {total}");
            }
            last_turn = snapshot.turn;
        }

        assert!(game.is_over(), "seed {seed} did not finish");
        assert!(game.turn() <= game.config().max_turns + 1);
    }
}
