//! Runner - Timer task driving one encounter to resolution
//!
//! The encounter lock is held only for short synchronous steps. Collection
//! windows always run their full length; a force end during one discards
//! whatever was submitted.

use super::events::{CancelReason, RaidEvent};
use super::registry::{EncounterHandle, Shared};
use crate::combatant::Combatant;
use crate::reward::RewardConfig;
use crate::types::{ContextId, EncounterPhase, Outcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep, Instant};

pub(crate) async fn run_encounter(
    shared: Arc<Shared>,
    context: ContextId,
    handle: Arc<EncounterHandle>,
    rewards: RewardConfig,
) {
    let mut resolved = handle.resolved.subscribe();

    if pause_unless_resolved(&mut resolved, shared.settings.join_window()).await {
        return;
    }

    let began = {
        let mut encounter = handle.encounter.lock().await;
        if encounter.phase().is_resolved() {
            return;
        }
        match encounter.close_join_window() {
            Ok(EncounterPhase::Turn { .. }) => encounter.battle().map(|battle| RaidEvent::RaidBegan {
                boss: battle.boss.snapshot(),
                players: battle.roster.iter().map(Combatant::snapshot).collect(),
            }),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(context = %context, error = %e, "Could not close join window");
                shared.release(context, &handle, Outcome::Cancelled);
                return;
            }
        }
    };

    let Some(began) = began else {
        shared
            .host
            .announce(context, &RaidEvent::Cancelled(CancelReason::NoParticipants));
        shared.release(context, &handle, Outcome::Cancelled);
        return;
    };
    shared.host.announce(context, &began);

    loop {
        {
            let mut encounter = handle.encounter.lock().await;
            if encounter.phase().is_resolved() {
                return;
            }
            match encounter.open_turn(Instant::now()) {
                Ok(opening) => shared.host.announce(context, &RaidEvent::TurnOpened(opening)),
                Err(e) => {
                    tracing::warn!(context = %context, error = %e, "Could not open turn");
                    shared.release(context, &handle, Outcome::Cancelled);
                    return;
                }
            }
        }

        sleep(shared.settings.action_window()).await;

        let finished = {
            let mut encounter = handle.encounter.lock().await;
            if encounter.phase().is_resolved() {
                return;
            }
            let report = match encounter.resolve_turn() {
                Ok(report) => report,
                Err(e) => {
                    tracing::warn!(context = %context, error = %e, "Could not resolve turn");
                    shared.release(context, &handle, Outcome::Cancelled);
                    return;
                }
            };
            shared.host.announce(context, &RaidEvent::TurnResolved(report));

            encounter.phase().outcome().map(|outcome| {
                let payout = encounter.allocate_rewards(&rewards);
                let survivors = encounter
                    .players()
                    .iter()
                    .filter(|p| p.is_alive())
                    .map(Combatant::snapshot)
                    .collect();
                (
                    outcome,
                    RaidEvent::Finished {
                        outcome,
                        survivors,
                        rewards: payout,
                    },
                )
            })
        };

        if let Some((outcome, event)) = finished {
            shared.host.announce(context, &event);
            shared.release(context, &handle, outcome);
            return;
        }

        if pause_unless_resolved(&mut resolved, shared.settings.turn_pause()).await {
            return;
        }
    }
}

/// Sleep for `duration`; true if the encounter resolved first
async fn pause_unless_resolved(
    resolved: &mut watch::Receiver<Option<Outcome>>,
    duration: Duration,
) -> bool {
    tokio::select! {
        _ = sleep(duration) => false,
        changed = resolved.wait_for(Option::is_some) => changed.is_ok(),
    }
}
