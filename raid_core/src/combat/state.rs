//! BattleState - Everything the turn resolver reads and writes

use super::BossPhase;
use crate::combatant::Combatant;
use crate::types::ParticipantId;
use serde::{Deserialize, Serialize};

/// Combat state of an in-progress encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    /// Turn about to be resolved (starts at 1)
    pub turn: u32,
    /// Players in join order
    pub roster: Vec<Combatant>,
    pub boss: Combatant,
    /// Set once, the first time the boss drops to 10% HP
    pub berserk: bool,
    /// Phase observed at the end of the last resolved turn
    pub phase: BossPhase,
}

impl BattleState {
    pub fn new(roster: Vec<Combatant>, boss: Combatant) -> Self {
        BattleState {
            turn: 1,
            roster,
            boss,
            berserk: false,
            phase: BossPhase::Calm,
        }
    }

    pub fn player(&self, id: ParticipantId) -> Option<&Combatant> {
        self.roster.iter().find(|p| p.id == id)
    }

    pub fn alive_count(&self) -> usize {
        self.roster.iter().filter(|p| p.is_alive()).count()
    }

    pub fn any_alive(&self) -> bool {
        self.roster.iter().any(|p| p.is_alive())
    }

    /// Ids of living players in join order
    pub fn survivors(&self) -> Vec<ParticipantId> {
        self.roster
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| p.id)
            .collect()
    }

    /// Roster indices of living players
    pub(crate) fn alive_indices(&self) -> Vec<usize> {
        self.roster
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_alive())
            .map(|(i, _)| i)
            .collect()
    }
}
