//! Combatant - A player or the boss, with health and combat stats

mod scaling;
mod snapshot;

pub use scaling::{scale_boss_stats, ScaledStats};
pub use snapshot::CombatantSnapshot;

use crate::config::EncounterProfile;
use crate::types::{Action, ParticipantId};
use serde::{Deserialize, Serialize};

/// Whether a combatant is a player or the boss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantKind {
    Player,
    Boss,
}

/// A single participant in a raid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    // === Identity ===
    pub id: ParticipantId,
    pub display_name: String,
    pub kind: CombatantKind,

    // === Resources ===
    hp: i64,
    max_hp: i64,
    alive: bool,

    // === Stats ===
    pub attack: i64,
    pub defense: i64,

    // === Turn State ===
    /// Set only for the turn in which the player chose to defend
    pub is_defending: bool,
    /// Consecutive turns without a submitted action
    pub afk_streak: u32,
    /// Action chosen for the turn being resolved
    pub action: Option<Action>,
}

impl Combatant {
    /// Create a player at full health
    pub fn player(
        id: ParticipantId,
        display_name: impl Into<String>,
        hp: i64,
        attack: i64,
        defense: i64,
    ) -> Self {
        Self::new(id, display_name.into(), CombatantKind::Player, hp, attack, defense)
    }

    /// Create the boss from an unscaled profile
    pub fn boss(profile: &EncounterProfile) -> Self {
        Self::new(
            ParticipantId::BOSS,
            profile.name.clone(),
            CombatantKind::Boss,
            profile.base_hp,
            profile.base_atk,
            profile.base_def,
        )
    }

    fn new(
        id: ParticipantId,
        display_name: String,
        kind: CombatantKind,
        hp: i64,
        attack: i64,
        defense: i64,
    ) -> Self {
        let max_hp = hp.max(0);
        Combatant {
            id,
            display_name,
            kind,
            hp: max_hp,
            max_hp,
            alive: max_hp > 0,
            attack,
            defense,
            is_defending: false,
            afk_streak: 0,
            action: None,
        }
    }

    pub fn hp(&self) -> i64 {
        self.hp
    }

    pub fn max_hp(&self) -> i64 {
        self.max_hp
    }

    /// Alive until HP first reaches 0; never revives
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_boss(&self) -> bool {
        self.kind == CombatantKind::Boss
    }

    /// Current HP as a fraction of max HP
    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64
    }

    /// Apply damage, floored at 0 HP. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: i64) -> i64 {
        let amount = amount.max(0);
        let before = self.hp;
        self.hp = (self.hp - amount).max(0);
        if self.hp == 0 {
            self.alive = false;
        }
        before - self.hp
    }

    /// Heal, capped at max HP. Dead combatants cannot be healed. Returns HP gained.
    pub fn heal(&mut self, amount: i64) -> i64 {
        if !self.alive {
            return 0;
        }
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    /// Clear per-turn flags at the start of a turn
    pub fn reset_turn(&mut self) {
        self.is_defending = false;
        self.action = None;
    }

    /// Replace stats with party-scaled values; HP is refilled to the new max
    pub fn apply_scaling(&mut self, scaled: ScaledStats) {
        self.max_hp = scaled.hp.max(0);
        self.hp = self.max_hp;
        self.alive = self.hp > 0;
        self.attack = scaled.attack;
        self.defense = scaled.defense;
    }

    /// Point-in-time copy for status queries
    pub fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            id: self.id,
            display_name: self.display_name.clone(),
            kind: self.kind,
            hp: self.hp,
            max_hp: self.max_hp,
            attack: self.attack,
            defense: self.defense,
            alive: self.alive,
            is_defending: self.is_defending,
            afk_streak: self.afk_streak,
        }
    }
}
