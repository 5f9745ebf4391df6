//! Entity model: locations, roles, and agents.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// Default identity of the player-controlled agent.
pub const DEFAULT_PLAYER_NAME: &str = "Pawsmonaut Prime";

/// Glyph shown for the player-controlled agent.
pub const PLAYER_AVATAR: &str = "🧑‍🚀";

/// Glyph for names missing from [`ROSTER`].
pub const FALLBACK_AVATAR: &str = "🐾";

/// Known crew names and their glyphs.
pub const ROSTER: [(&str, &str); 6] = [
    ("Captain Whiskers", "😼"),
    ("Commander Rex", "🐶"),
    ("Dr. Bubbles", "🐠"),
    ("Navigator Nibbles", "🐹"),
    ("Engineer Squeaky", "🐭"),
    (DEFAULT_PLAYER_NAME, PLAYER_AVATAR),
];

/// Looks up the glyph for a crew name.
pub fn avatar_for(name: &str) -> &'static str {
    ROSTER
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(FALLBACK_AVATAR)
}

/// A room on the ship.
///
/// Serialized by display name. Deserializing goes through [`FromStr`], so
/// any casing of the display name is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Location {
    #[serde(rename = "Bridge")]
    Bridge,
    #[serde(rename = "Engine Room")]
    EngineRoom,
    #[serde(rename = "Hydroponics")]
    Hydroponics,
    #[serde(rename = "Cafeteria")]
    Cafeteria,
    #[serde(rename = "MedBay")]
    MedBay,
}

impl Location {
    /// Every location, in board order.
    pub const ALL: [Location; 5] = [
        Location::Bridge,
        Location::EngineRoom,
        Location::Hydroponics,
        Location::Cafeteria,
        Location::MedBay,
    ];

    /// Display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Location::Bridge => "Bridge",
            Location::EngineRoom => "Engine Room",
            Location::Hydroponics => "Hydroponics",
            Location::Cafeteria => "Cafeteria",
            Location::MedBay => "MedBay",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Location {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Location::ALL
            .iter()
            .copied()
            .find(|loc| loc.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GameError::invalid_action(format!("unknown location '{s}'")))
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// What an agent is and who drives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Crew member driven by the human player's input.
    PlayerCrew,
    /// Crew member moving at random.
    Crew,
    /// The hidden adversary, driven by the planner.
    Impostor,
}

impl Role {
    /// Which side this role plays for.
    pub const fn team(&self) -> Team {
        match self {
            Role::PlayerCrew | Role::Crew => Team::Crew,
            Role::Impostor => Team::Impostor,
        }
    }
}

/// The two winning sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Crew,
    Impostor,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Crew => f.write_str("Crew"),
            Team::Impostor => f.write_str("Impostor"),
        }
    }
}

/// One crew member on the ship.
///
/// `name`, `avatar` and `role` are fixed at creation; the rest changes as
/// the game runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    name: String,
    avatar: String,
    role: Role,
    pub(crate) alive: bool,
    pub(crate) location: Option<Location>,
    pub(crate) suspicion: f64,
}

impl Agent {
    /// Creates a living agent with no location and zero suspicion.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        let name = name.into();
        let avatar = match role {
            Role::PlayerCrew => PLAYER_AVATAR,
            _ => avatar_for(&name),
        };
        Self {
            avatar: avatar.to_string(),
            name,
            role,
            alive: true,
            location: None,
            suspicion: 0.0,
        }
    }

    /// The player-controlled crew member.
    pub fn player(name: impl Into<String>) -> Self {
        Self::new(name, Role::PlayerCrew)
    }

    /// A randomly moving crew member.
    pub fn crew(name: impl Into<String>) -> Self {
        Self::new(name, Role::Crew)
    }

    /// The impostor.
    pub fn impostor(name: impl Into<String>) -> Self {
        Self::new(name, Role::Impostor)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Suspicion score from the last day phase this agent survived.
    pub fn suspicion(&self) -> f64 {
        self.suspicion
    }

    pub fn is_impostor(&self) -> bool {
        self.role == Role::Impostor
    }

    pub fn is_player(&self) -> bool {
        self.role == Role::PlayerCrew
    }

    /// Alive and on the crew side.
    pub fn is_living_crew(&self) -> bool {
        self.alive && self.role.team() == Team::Crew
    }
}
