//! Host - Traits for the chat platform collaborator
//!
//! The engine never renders or loads files on its own. It hands structured
//! events to a `RaidHost` and pulls configuration from a `ConfigProvider`.

use crate::config::EncounterProfile;
use crate::encounter::RaidEvent;
use crate::reward::RewardConfig;
use crate::types::{ContextId, ParticipantId};

/// Chat platform side of a raid
pub trait RaidHost: Send + Sync {
    /// Render an event for the given context.
    ///
    /// Fire-and-forget: implementations must not block and must swallow their
    /// own rendering failures.
    fn announce(&self, context: ContextId, event: &RaidEvent);

    /// Best-effort display name lookup
    fn resolve_display_name(&self, _participant: ParticipantId) -> Option<String> {
        None
    }
}

/// Source of boss profiles and reward rules
pub trait ConfigProvider: Send + Sync {
    /// Available boss profiles; empty when nothing usable is configured
    fn load_encounter_profiles(&self) -> Vec<EncounterProfile>;

    /// Reward rules; fully disabled when nothing usable is configured
    fn load_reward_config(&self) -> RewardConfig;
}

/// Host that drops every event, for headless use
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentHost;

impl RaidHost for SilentHost {
    fn announce(&self, _context: ContextId, _event: &RaidEvent) {}
}
