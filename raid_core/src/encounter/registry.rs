//! RaidRegistry - At most one live encounter per chat context
//!
//! Each slot holds the encounter behind an async mutex together with a watch
//! channel that flips to `Some(outcome)` once the encounter resolves. Runner
//! tasks and force-end both resolve through that channel, so waiting on it
//! is the only thing a runner needs to observe cancellation.

use super::events::{CancelReason, EncounterSnapshot, EncounterStarted, JoinOutcome, RaidEvent};
use super::machine::{make_rng, Encounter};
use super::runner::run_encounter;
use crate::combatant::CombatantSnapshot;
use crate::config::{EncounterProfile, RaidSettings};
use crate::error::RaidError;
use crate::host::{ConfigProvider, RaidHost};
use crate::intake::SubmitReceipt;
use crate::types::{Action, ContextId, Outcome, ParticipantId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::time::Instant;

/// Live encounter slot
pub(crate) struct EncounterHandle {
    pub(crate) encounter: AsyncMutex<Encounter>,
    pub(crate) resolved: watch::Sender<Option<Outcome>>,
}

impl EncounterHandle {
    fn new(encounter: Encounter) -> Self {
        let (resolved, _) = watch::channel(None);
        EncounterHandle {
            encounter: AsyncMutex::new(encounter),
            resolved,
        }
    }
}

pub(crate) struct Shared {
    pub(crate) host: Arc<dyn RaidHost>,
    pub(crate) config: Arc<dyn ConfigProvider>,
    pub(crate) settings: RaidSettings,
    slots: Mutex<HashMap<ContextId, Arc<EncounterHandle>>>,
}

impl Shared {
    fn slots(&self) -> MutexGuard<'_, HashMap<ContextId, Arc<EncounterHandle>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, context: ContextId) -> Option<Arc<EncounterHandle>> {
        self.slots().get(&context).cloned()
    }

    /// Free the slot held by `handle` and publish its outcome
    pub(crate) fn release(&self, context: ContextId, handle: &Arc<EncounterHandle>, outcome: Outcome) {
        {
            let mut slots = self.slots();
            if slots
                .get(&context)
                .map_or(false, |current| Arc::ptr_eq(current, handle))
            {
                slots.remove(&context);
            }
        }
        handle.resolved.send_replace(Some(outcome));
        tracing::debug!(context = %context, ?outcome, "Encounter slot released");
    }
}

/// Entry point for every raid operation
#[derive(Clone)]
pub struct RaidRegistry {
    shared: Arc<Shared>,
}

impl RaidRegistry {
    pub fn new(
        host: Arc<dyn RaidHost>,
        config: Arc<dyn ConfigProvider>,
        settings: RaidSettings,
    ) -> Self {
        RaidRegistry {
            shared: Arc::new(Shared {
                host,
                config,
                settings,
                slots: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn settings(&self) -> &RaidSettings {
        &self.shared.settings
    }

    pub fn is_active(&self, context: ContextId) -> bool {
        self.shared.slots().contains_key(&context)
    }

    pub fn active_count(&self) -> usize {
        self.shared.slots().len()
    }

    /// Start a raid and open its join window.
    ///
    /// Picks `profile` by name, or a random profile when `None`. The runner
    /// task is spawned on the current tokio runtime.
    pub async fn start_encounter(
        &self,
        context: ContextId,
        profile: Option<&str>,
        requester_authorized: bool,
    ) -> Result<EncounterStarted, RaidError> {
        if !requester_authorized {
            return Err(RaidError::NotAuthorized);
        }
        if self.is_active(context) {
            return Err(RaidError::AlreadyActive);
        }

        let profiles = self.shared.config.load_encounter_profiles();
        let mut rng = make_rng(&self.shared.settings);
        let profile = pick_profile(&profiles, profile, &mut rng)?;
        let rewards = self.shared.config.load_reward_config();

        let mut encounter = Encounter::new(context, profile, self.shared.settings.clone(), rng);
        encounter.open_join_window(Instant::now())?;
        let started = EncounterStarted {
            context,
            boss_name: encounter.profile().name.clone(),
            image_ref: encounter.profile().image_ref.clone(),
            join_window_secs: self.shared.settings.join_window_secs,
        };

        let handle = Arc::new(EncounterHandle::new(encounter));
        {
            let mut slots = self.shared.slots();
            if slots.contains_key(&context) {
                return Err(RaidError::AlreadyActive);
            }
            slots.insert(context, Arc::clone(&handle));
        }

        self.shared.host.announce(
            context,
            &RaidEvent::JoinWindowOpened {
                boss_name: started.boss_name.clone(),
                image_ref: started.image_ref.clone(),
                window_secs: started.join_window_secs,
            },
        );
        tokio::spawn(run_encounter(
            Arc::clone(&self.shared),
            context,
            handle,
            rewards,
        ));
        tracing::info!(context = %context, boss = %started.boss_name, "Encounter started");
        Ok(started)
    }

    /// Join the raid during its join window.
    ///
    /// An empty `display_name` falls back to the host lookup, then to a
    /// generic "Player <id>".
    pub async fn join(
        &self,
        context: ContextId,
        participant: ParticipantId,
        display_name: &str,
    ) -> Result<JoinOutcome, RaidError> {
        let handle = self
            .shared
            .handle(context)
            .ok_or(RaidError::NotInJoinWindow)?;
        let name = self.display_name(participant, display_name);

        let mut encounter = handle.encounter.lock().await;
        let outcome = encounter.join(participant, name.clone(), Instant::now())?;
        if let JoinOutcome::Joined {
            roster_size,
            seconds_left,
        } = outcome
        {
            self.shared.host.announce(
                context,
                &RaidEvent::PlayerJoined {
                    participant,
                    display_name: name,
                    roster_size,
                    seconds_left,
                },
            );
        }
        Ok(outcome)
    }

    /// Submit (or replace) an action for the turn currently collecting
    pub async fn submit_action(
        &self,
        context: ContextId,
        participant: ParticipantId,
        action: Action,
    ) -> Result<SubmitReceipt, RaidError> {
        let handle = self.shared.handle(context).ok_or(RaidError::NoActiveTurn)?;
        let mut encounter = handle.encounter.lock().await;
        encounter.submit_action(participant, action, Instant::now())
    }

    /// Cancel the raid immediately; no rewards are paid
    pub async fn force_end(
        &self,
        context: ContextId,
        requester: ParticipantId,
        requester_authorized: bool,
    ) -> Result<(), RaidError> {
        if !requester_authorized {
            return Err(RaidError::NotAuthorized);
        }
        let handle = self
            .shared
            .handle(context)
            .ok_or(RaidError::NoActiveEncounter)?;
        {
            let mut encounter = handle.encounter.lock().await;
            encounter.force_end()?;
        }
        self.shared.release(context, &handle, Outcome::Cancelled);
        self.shared.host.announce(
            context,
            &RaidEvent::Cancelled(CancelReason::ForceEnded { by: requester }),
        );
        tracing::info!(context = %context, by = %requester, "Encounter force ended");
        Ok(())
    }

    pub async fn get_status(&self, context: ContextId) -> Result<EncounterSnapshot, RaidError> {
        let handle = self
            .shared
            .handle(context)
            .ok_or(RaidError::NoActiveEncounter)?;
        let encounter = handle.encounter.lock().await;
        Ok(encounter.snapshot())
    }

    pub async fn get_participant_stats(
        &self,
        context: ContextId,
        participant: ParticipantId,
    ) -> Result<CombatantSnapshot, RaidError> {
        let handle = self
            .shared
            .handle(context)
            .ok_or(RaidError::NoActiveEncounter)?;
        let encounter = handle.encounter.lock().await;
        encounter.participant_stats(participant)
    }

    /// Resolves with the outcome once the live encounter in `context` ends.
    ///
    /// Returns `None` if no encounter is live.
    pub async fn wait_resolved(&self, context: ContextId) -> Option<Outcome> {
        let handle = self.shared.handle(context)?;
        let mut resolved = handle.resolved.subscribe();
        let outcome = resolved.wait_for(Option::is_some).await.ok()?;
        *outcome
    }

    fn display_name(&self, participant: ParticipantId, given: &str) -> String {
        let given = given.trim();
        if !given.is_empty() {
            return given.to_string();
        }
        self.shared
            .host
            .resolve_display_name(participant)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("Player {}", participant))
    }
}

/// Named lookup, or a uniform random pick
pub fn pick_profile(
    profiles: &[EncounterProfile],
    name: Option<&str>,
    rng: &mut impl Rng,
) -> Result<EncounterProfile, RaidError> {
    if profiles.is_empty() {
        return Err(RaidError::NoProfilesAvailable);
    }
    match name {
        Some(name) => profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| RaidError::ProfileNotFound(name.to_string())),
        None => profiles
            .choose(rng)
            .cloned()
            .ok_or(RaidError::NoProfilesAvailable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn profiles() -> Vec<EncounterProfile> {
        vec![
            EncounterProfile::new("Ravager", 1000, 200, 50),
            EncounterProfile::new("Lich Queen", 1400, 180, 70),
        ]
    }

    #[test]
    fn test_pick_named_profile() {
        let mut rng = StdRng::seed_from_u64(42);
        let picked = pick_profile(&profiles(), Some("lich queen"), &mut rng).unwrap();
        assert_eq!(picked.name, "Lich Queen");

        assert_eq!(
            pick_profile(&profiles(), Some("Hydra"), &mut rng),
            Err(RaidError::ProfileNotFound("Hydra".to_string()))
        );
    }

    #[test]
    fn test_pick_random_profile() {
        let mut rng = StdRng::seed_from_u64(42);
        let all = profiles();
        for _ in 0..20 {
            let picked = pick_profile(&all, None, &mut rng).unwrap();
            assert!(all.contains(&picked));
        }
    }

    #[test]
    fn test_pick_from_empty() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(
            pick_profile(&[], None, &mut rng),
            Err(RaidError::NoProfilesAvailable)
        );
        assert_eq!(
            pick_profile(&[], Some("Ravager"), &mut rng),
            Err(RaidError::NoProfilesAvailable)
        );
    }
}
