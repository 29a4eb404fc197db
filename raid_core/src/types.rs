//! Core identifiers and small enums shared across the engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque participant identifier supplied by the chat platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub u64);

impl ParticipantId {
    /// Reserved id carried by the boss combatant
    pub const BOSS: ParticipantId = ParticipantId(0);
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ParticipantId {
    fn from(id: u64) -> Self {
        ParticipantId(id)
    }
}

/// Chat context (channel, group) hosting at most one encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContextId(pub u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ContextId {
    fn from(id: u64) -> Self {
        ContextId(id)
    }
}

/// Action a player picks for a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Attack,
    Heal,
    Defend,
}

impl Action {
    /// Get all actions in menu order
    pub fn all() -> &'static [Action] {
        &[Action::Attack, Action::Heal, Action::Defend]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Attack => "attack",
            Action::Heal => "heal",
            Action::Defend => "defend",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing an unknown action name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0}")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attack" | "atk" => Ok(Action::Attack),
            "heal" => Ok(Action::Heal),
            "defend" | "def" => Ok(Action::Defend),
            other => Err(ParseActionError(other.to_string())),
        }
    }
}

/// How a resolved encounter ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory,
    Wipe,
    Cancelled,
}

/// Lifecycle phase of an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum EncounterPhase {
    Idle,
    JoinWindow,
    Turn { number: u32 },
    Resolved { outcome: Outcome },
}

impl EncounterPhase {
    pub fn is_resolved(&self) -> bool {
        matches!(self, EncounterPhase::Resolved { .. })
    }

    /// Outcome if the encounter has resolved
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            EncounterPhase::Resolved { outcome } => Some(*outcome),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        assert_eq!("attack".parse::<Action>(), Ok(Action::Attack));
        assert_eq!(" Heal ".parse::<Action>(), Ok(Action::Heal));
        assert_eq!("DEF".parse::<Action>(), Ok(Action::Defend));
        assert!("dance".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_display_round_trips() {
        for action in Action::all() {
            assert_eq!(action.to_string().parse::<Action>(), Ok(*action));
        }
    }

    #[test]
    fn test_phase_outcome() {
        assert_eq!(EncounterPhase::Turn { number: 3 }.outcome(), None);
        let resolved = EncounterPhase::Resolved { outcome: Outcome::Wipe };
        assert!(resolved.is_resolved());
        assert_eq!(resolved.outcome(), Some(Outcome::Wipe));
    }
}
