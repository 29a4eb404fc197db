//! Read-only view of a combatant

use super::CombatantKind;
use crate::types::ParticipantId;
use serde::{Deserialize, Serialize};

/// Combatant state as returned by status queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub id: ParticipantId,
    pub display_name: String,
    pub kind: CombatantKind,
    pub hp: i64,
    pub max_hp: i64,
    pub attack: i64,
    pub defense: i64,
    pub alive: bool,
    pub is_defending: bool,
    pub afk_streak: u32,
}

impl CombatantSnapshot {
    /// One-line status, e.g. "Ravager 750/1000 HP"
    pub fn summary(&self) -> String {
        if self.alive {
            format!("{} {}/{} HP", self.display_name, self.hp, self.max_hp)
        } else {
            format!("{} (defeated)", self.display_name)
        }
    }
}
