//! Prelude module for convenient imports
//!
//! ```rust
//! use raid_core::prelude::*;
//! ```

// Identifiers and lifecycle
pub use crate::types::{Action, ContextId, EncounterPhase, Outcome, ParticipantId};
pub use crate::error::RaidError;

// Registry and events
pub use crate::encounter::{EncounterSnapshot, JoinOutcome, RaidEvent, RaidRegistry};
pub use crate::host::{ConfigProvider, RaidHost};

// Combat
pub use crate::combat::{BossPhase, TurnReport};
pub use crate::combatant::CombatantSnapshot;

// Config
pub use crate::config::{EncounterProfile, RaidSettings, StaticConfig, TomlConfigProvider};
pub use crate::reward::{RewardConfig, RewardResult};
