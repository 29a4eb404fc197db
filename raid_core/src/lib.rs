//! raid_core - Turn-based raid boss engine for group chat minigames
//!
//! This library provides:
//! - RaidRegistry: One live encounter per chat context, driven by timers
//! - Encounter: The synchronous lifecycle (join window, turns, resolution)
//! - Turn resolution: Player actions, AFK penalties, boss phases and counterattacks
//! - Rewards: Participant-scaled pools split among survivors
//! - Config: Boss profiles and reward rules from TOML

pub mod combat;
pub mod combatant;
pub mod config;
pub mod encounter;
pub mod error;
pub mod host;
pub mod intake;
pub mod prelude;
pub mod reward;
pub mod types;

// Re-export core types for convenience
pub use combat::{resolve_turn, BattleState, BossPhase, TurnOutcome, TurnReport};
pub use combatant::{Combatant, CombatantKind, CombatantSnapshot};
pub use config::{ConfigError, EncounterProfile, RaidSettings, StaticConfig, TomlConfigProvider};
pub use encounter::{
    CancelReason, Encounter, EncounterSnapshot, EncounterStarted, JoinOutcome, RaidEvent,
    RaidRegistry,
};
pub use error::RaidError;
pub use host::{ConfigProvider, RaidHost, SilentHost};
pub use intake::{ActionIntake, SubmitReceipt};
pub use reward::{RewardConfig, RewardResult};
pub use types::{Action, ContextId, EncounterPhase, Outcome, ParticipantId};
