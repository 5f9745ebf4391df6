//! Win conditions.

use crate::agent::{Agent, Team};

/// Checks the end-of-game rules in order and returns the first winner.
///
/// 1. No living impostor: the crew wins.
/// 2. Living impostors at least match the living crew: the impostor wins.
/// 3. `turn` is past `max_turns`: the impostor wins.
pub fn check_winner(agents: &[Agent], turn: u32, max_turns: u32) -> Option<Team> {
    let living_impostors = agents.iter().filter(|a| a.is_alive() && a.is_impostor()).count();
    let living_crew = agents.iter().filter(|a| a.is_living_crew()).count();

    if living_impostors == 0 {
        Some(Team::Crew)
    } else if living_impostors >= living_crew {
        Some(Team::Impostor)
    } else if turn > max_turns {
        Some(Team::Impostor)
    } else {
        None
    }
}
