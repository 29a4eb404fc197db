//! Combat - Resolve a raid turn against the battle state

pub mod constants;
mod phase;
mod resolution;
mod result;
mod state;
mod targeting;

pub use phase::BossPhase;
pub use resolution::{
    afk_penalty, boss_armour, boss_hit_damage, resolve_turn, roll_boss_attack, roll_boss_crit,
    roll_heal, roll_player_attack,
};
pub use result::{
    AfkLine, AttackLine, BossHitLine, HealLine, PhaseChange, ReportEntry, TurnOutcome, TurnReport,
};
pub use state::BattleState;
pub use targeting::{select_targets, target_count};
