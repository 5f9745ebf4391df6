//! Player actions accepted by the game.

use serde::{Deserialize, Serialize};

use crate::agent::Location;
use crate::error::GameError;
use crate::Result;

/// An action submitted on behalf of the player.
///
/// Wire form:
///
/// ```json
/// {"type": "night_action", "location": "Bridge"}
/// {"type": "vote", "vote": "Dr. Bubbles"}
/// {"type": "vote", "vote": null}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Spend the night at `location`.
    NightAction { location: Location },
    /// Vote for an agent, or abstain with `None`.
    Vote { vote: Option<String> },
}

impl PlayerAction {
    pub fn night(location: Location) -> Self {
        Self::NightAction { location }
    }

    pub fn vote(target: impl Into<String>) -> Self {
        Self::Vote {
            vote: Some(target.into()),
        }
    }

    pub fn abstain() -> Self {
        Self::Vote { vote: None }
    }

    /// Parses a JSON payload. Any shape problem is an `InvalidAction`.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        if let serde_json::Value::Object(map) = &value {
            // `vote` must be present, even when null.
            if map.get("type").and_then(|t| t.as_str()) == Some("vote")
                && !map.contains_key("vote")
            {
                return Err(GameError::invalid_action("missing field `vote`"));
            }
        }
        serde_json::from_value(value).map_err(|e| GameError::invalid_action(e.to_string()))
    }

    /// Parses a JSON string.
    pub fn from_json_str(payload: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| GameError::invalid_action(e.to_string()))?;
        Self::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_night_action() {
        let action = PlayerAction::from_json(json!({"type": "night_action", "location": "Engine Room"}))
            .unwrap();
        assert_eq!(action, PlayerAction::night(Location::EngineRoom));
    }

    #[test]
    fn test_parse_night_action_any_case() {
        let action = PlayerAction::from_json(json!({"type": "night_action", "location": "engine room"}))
            .unwrap();
        assert_eq!(action, PlayerAction::night(Location::EngineRoom));
        let action = PlayerAction::from_json_str(r#"{"type":"night_action","location":"bridge"}"#)
            .unwrap();
        assert_eq!(action, PlayerAction::night(Location::Bridge));
    }

    #[test]
    fn test_parse_votes() {
        let action = PlayerAction::from_json(json!({"type": "vote", "vote": "Commander Rex"})).unwrap();
        assert_eq!(action, PlayerAction::vote("Commander Rex"));
        let action = PlayerAction::from_json(json!({"type": "vote", "vote": null})).unwrap();
        assert_eq!(action, PlayerAction::abstain());
    }

    #[test]
    fn test_reject_unknown_type() {
        let err = PlayerAction::from_json(json!({"type": "dance"})).unwrap_err();
        assert!(matches!(err, GameError::InvalidAction(_)));
    }

    #[test]
    fn test_reject_missing_fields() {
        assert!(PlayerAction::from_json(json!({"type": "night_action"})).is_err());
        assert!(PlayerAction::from_json(json!({"type": "vote"})).is_err());
        assert!(PlayerAction::from_json(json!({"location": "Bridge"})).is_err());
    }

    #[test]
    fn test_reject_unknown_location() {
        let err = PlayerAction::from_json(json!({"type": "night_action", "location": "Galley"}))
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidAction(_)));
    }

    #[test]
    fn test_reject_malformed_string() {
        assert!(PlayerAction::from_json_str("{not json").is_err());
        assert!(PlayerAction::from_json_str(r#"{"type":"vote","vote":null}"#).is_ok());
    }

    #[test]
    fn test_wire_form() {
        let json = serde_json::to_value(PlayerAction::night(Location::MedBay)).unwrap();
        assert_eq!(json, json!({"type": "night_action", "location": "MedBay"}));
    }
}
