//! Simulation - Synthetic players driving one raid through the registry
//!
//! Every bot follows the intake contract a chat transport would: at most one
//! submission per window, sent at an independently random offset. Some bots
//! idle through a turn and take the AFK penalty.

use raid_core::prelude::*;
use raid_core::reward::{RewardKind, ScalingRule};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;

/// Below this HP ratio bots lean towards healing
const LOW_HP_RATIO: f64 = 0.35;

/// Submissions land in the first three quarters of a window
const SUBMIT_WINDOW_SHARE: f64 = 0.75;

const BOT_NAMES: [&str; 8] = ["Aria", "Bram", "Cato", "Dara", "Eli", "Faye", "Gus", "Hana"];

/// Host forwarding every event into a channel
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<(ContextId, RaidEvent)>,
}

impl ChannelHost {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<(ContextId, RaidEvent)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelHost { tx }, rx)
    }
}

impl RaidHost for ChannelHost {
    fn announce(&self, context: ContextId, event: &RaidEvent) {
        if self.tx.send((context, event.clone())).is_err() {
            tracing::debug!(context = %context, "Event receiver dropped");
        }
    }
}

/// Knobs for one simulated raid
#[derive(Debug, Clone)]
pub struct SimOptions {
    pub players: u64,
    /// Chance a bot skips a turn
    pub afk_chance: f64,
    pub boss: Option<String>,
}

impl Default for SimOptions {
    fn default() -> Self {
        SimOptions {
            players: 5,
            afk_chance: 0.1,
            boss: None,
        }
    }
}

pub fn bot_name(id: u64) -> String {
    let base = BOT_NAMES[(id as usize).saturating_sub(1) % BOT_NAMES.len()];
    let round = (id.saturating_sub(1)) / BOT_NAMES.len() as u64;
    if round == 0 {
        base.to_string()
    } else {
        format!("{} {}", base, round + 1)
    }
}

/// Pick a bot's action, or `None` to idle this turn
pub fn choose_action(afk_chance: f64, hp_ratio: f64, rng: &mut impl Rng) -> Option<Action> {
    if rng.gen_bool(afk_chance.clamp(0.0, 1.0)) {
        return None;
    }
    if hp_ratio < LOW_HP_RATIO && rng.gen_bool(0.6) {
        return Some(Action::Heal);
    }
    Some(match rng.gen_range(0..100) {
        0..=69 => Action::Attack,
        70..=84 => Action::Defend,
        _ => Action::Heal,
    })
}

/// Bosses used when no config directory is given
pub fn builtin_profiles() -> Vec<EncounterProfile> {
    vec![
        EncounterProfile::new("Ravager", 1000, 200, 50),
        EncounterProfile::new("Lich Queen", 1400, 180, 70),
        EncounterProfile::new("Mire Hydra", 1800, 150, 40),
    ]
}

pub fn builtin_rewards() -> RewardConfig {
    RewardConfig {
        primary: RewardKind::new(
            "crowns",
            vec![
                ScalingRule::new(1, 3, 2),
                ScalingRule::new(4, 8, 5),
                ScalingRule::new(9, 1000, 10),
            ],
        ),
        secondary: vec![RewardKind::new("gold", vec![ScalingRule::new(1, 1000, 500)])],
    }
}

/// Running tally built from the event stream
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationSummary {
    pub boss: Option<String>,
    pub outcome: Option<Outcome>,
    pub joined: usize,
    pub turns: u32,

    // === Totals ===
    pub total_damage: i64,
    pub total_healing: i64,
    pub critical_hits: usize,
    pub afk_penalties: i64,

    // === Result ===
    pub survivors: Vec<String>,
    pub rewards: Option<RewardResult>,
}

impl SimulationSummary {
    pub fn record(&mut self, event: &RaidEvent) {
        match event {
            RaidEvent::JoinWindowOpened { boss_name, .. } => self.boss = Some(boss_name.clone()),
            RaidEvent::PlayerJoined { roster_size, .. } => self.joined = *roster_size,
            RaidEvent::TurnResolved(report) => {
                self.turns = report.turn;
                self.total_damage += report.total_player_damage;
                self.total_healing += report.heals.iter().map(|h| h.healed).sum::<i64>();
                self.critical_hits += report.critical_hits();
                self.afk_penalties += report.afk.iter().map(|a| a.penalty).sum::<i64>();
            }
            RaidEvent::Finished {
                outcome,
                survivors,
                rewards,
            } => {
                self.outcome = Some(*outcome);
                self.survivors = survivors.iter().map(|s| s.display_name.clone()).collect();
                self.rewards = rewards.clone();
            }
            RaidEvent::Cancelled(_) => self.outcome = Some(Outcome::Cancelled),
            RaidEvent::RaidBegan { .. } | RaidEvent::TurnOpened(_) => {}
        }
    }

    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "{} vs {} players: {}",
            self.boss.as_deref().unwrap_or("?"),
            self.joined,
            self.outcome
                .map_or("unfinished".to_string(), |o| format!("{:?}", o))
        )];
        lines.push(format!(
            "Turns: {}  Damage: {}  Healing: {}  Crits taken: {}  AFK HP lost: {}",
            self.turns, self.total_damage, self.total_healing, self.critical_hits, self.afk_penalties
        ));
        if !self.survivors.is_empty() {
            lines.push(format!("Survivors: {}", self.survivors.join(", ")));
        }
        if let Some(rewards) = &self.rewards {
            for allocation in &rewards.allocations {
                lines.push(format!(
                    "{}: {} of {} handed out",
                    allocation.kind,
                    allocation.distributed(),
                    allocation.total
                ));
            }
        }
        lines.join("\n")
    }
}

/// Run one raid in `context` until it resolves.
///
/// `events` must be the receiving end of the registry's `ChannelHost`.
pub async fn run_simulation(
    registry: &RaidRegistry,
    events: &mut mpsc::UnboundedReceiver<(ContextId, RaidEvent)>,
    context: ContextId,
    options: &SimOptions,
    rng: &mut StdRng,
    mut on_event: impl FnMut(&RaidEvent),
) -> Result<SimulationSummary, RaidError> {
    let mut summary = SimulationSummary::default();

    registry
        .start_encounter(context, options.boss.as_deref(), true)
        .await?;
    for id in 1..=options.players {
        registry
            .join(context, ParticipantId(id), &bot_name(id))
            .await?;
    }

    while let Some((event_context, event)) = events.recv().await {
        if event_context != context {
            continue;
        }
        on_event(&event);
        summary.record(&event);

        if let RaidEvent::TurnOpened(opening) = &event {
            schedule_submissions(registry, context, options, opening.window_secs, rng).await;
        }
        if summary.is_complete() {
            break;
        }
    }

    Ok(summary)
}

async fn schedule_submissions(
    registry: &RaidRegistry,
    context: ContextId,
    options: &SimOptions,
    window_secs: u64,
    rng: &mut StdRng,
) {
    let window_ms = ((window_secs * 1000) as f64 * SUBMIT_WINDOW_SHARE) as u64;

    for id in 1..=options.players {
        let participant = ParticipantId(id);
        let Ok(stats) = registry.get_participant_stats(context, participant).await else {
            continue;
        };
        if !stats.alive {
            continue;
        }
        let hp_ratio = stats.hp as f64 / stats.max_hp.max(1) as f64;
        let Some(action) = choose_action(options.afk_chance, hp_ratio, rng) else {
            tracing::debug!(participant = %participant, "Bot idles this turn");
            continue;
        };

        let delay = Duration::from_millis(rng.gen_range(0..window_ms.max(1)));
        let registry = registry.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match registry.submit_action(context, participant, action).await {
                Ok(receipt) => tracing::debug!(
                    participant = %participant,
                    turn = receipt.turn,
                    %action,
                    "Bot submitted"
                ),
                Err(e) => tracing::warn!(participant = %participant, error = %e, "Bot submission rejected"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn fast_settings(seed: u64) -> RaidSettings {
        RaidSettings {
            join_window_secs: 2,
            action_window_secs: 1,
            turn_pause_secs: 0,
            seed: Some(seed),
            ..RaidSettings::default()
        }
    }

    fn sim_registry(
        profiles: Vec<EncounterProfile>,
        seed: u64,
    ) -> (RaidRegistry, mpsc::UnboundedReceiver<(ContextId, RaidEvent)>) {
        let (host, rx) = ChannelHost::channel();
        let config = StaticConfig::new(profiles, builtin_rewards());
        let registry = RaidRegistry::new(Arc::new(host), Arc::new(config), fast_settings(seed));
        (registry, rx)
    }

    #[test]
    fn test_choose_action() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(choose_action(1.0, 1.0, &mut rng), None);
            assert!(choose_action(0.0, 1.0, &mut rng).is_some());
        }

        let heals = (0..1000)
            .filter(|_| choose_action(0.0, 0.1, &mut rng) == Some(Action::Heal))
            .count();
        // 60% forced plus the 15% base share of the rest
        assert!(heals > 550, "only {} heals at low HP", heals);
    }

    #[test]
    fn test_bot_names() {
        assert_eq!(bot_name(1), "Aria");
        assert_eq!(bot_name(8), "Hana");
        assert_eq!(bot_name(9), "Aria 2");
    }

    #[test]
    fn test_summary_tally() {
        let mut summary = SimulationSummary::default();
        summary.record(&RaidEvent::JoinWindowOpened {
            boss_name: "Ravager".to_string(),
            image_ref: None,
            window_secs: 60,
        });
        summary.record(&RaidEvent::PlayerJoined {
            participant: ParticipantId(1),
            display_name: "Aria".to_string(),
            roster_size: 1,
            seconds_left: 59,
        });
        let mut report = TurnReport::new(1, "Ravager");
        report.total_player_damage = 120;
        summary.record(&RaidEvent::TurnResolved(report));
        assert!(!summary.is_complete());

        summary.record(&RaidEvent::Finished {
            outcome: Outcome::Wipe,
            survivors: Vec::new(),
            rewards: None,
        });
        assert!(summary.is_complete());
        assert_eq!(summary.turns, 1);
        assert_eq!(summary.total_damage, 120);
        assert!(summary.summary().starts_with("Ravager vs 1 players: Wipe"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_victory() {
        let (registry, mut rx) =
            sim_registry(vec![EncounterProfile::new("Practice Golem", 50, 10, 0)], 7);
        let options = SimOptions {
            players: 4,
            afk_chance: 0.0,
            boss: None,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = 0;

        let summary = run_simulation(&registry, &mut rx, ContextId(1), &options, &mut rng, |_| {
            seen += 1
        })
        .await
        .unwrap();

        assert_eq!(summary.outcome, Some(Outcome::Victory));
        assert_eq!(summary.joined, 4);
        assert_eq!(summary.survivors.len(), 4);
        assert!(summary.turns >= 1);
        assert_eq!(summary.afk_penalties, 0);
        let crowns = summary.rewards.as_ref().unwrap().allocation("crowns").unwrap();
        assert_eq!(crowns.distributed(), 5);
        assert!(seen >= 4);
        assert!(!registry.is_active(ContextId(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulation_without_players() {
        let (registry, mut rx) = sim_registry(builtin_profiles(), 3);
        let options = SimOptions {
            players: 0,
            ..SimOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(3);

        let summary = run_simulation(&registry, &mut rx, ContextId(1), &options, &mut rng, |_| {})
            .await
            .unwrap();

        assert_eq!(summary.outcome, Some(Outcome::Cancelled));
        assert_eq!(summary.turns, 0);
    }
}
