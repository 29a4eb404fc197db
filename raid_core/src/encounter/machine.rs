//! Encounter - Synchronous raid lifecycle
//!
//! Idle -> JoinWindow -> Turn(1..n) -> Resolved(Victory | Wipe | Cancelled)
//!
//! Every transition takes the current time as an argument so the machine can
//! be driven without a runtime. The async runner owns the timers.

use super::events::{EncounterSnapshot, JoinOutcome, TurnOpening};
use crate::combat::{resolve_turn, BattleState, TurnOutcome, TurnReport};
use crate::combatant::{scale_boss_stats, Combatant, CombatantSnapshot};
use crate::config::{EncounterProfile, RaidSettings};
use crate::error::RaidError;
use crate::intake::{ActionIntake, SubmitReceipt};
use crate::reward::{allocate_rewards, RewardConfig, RewardResult};
use crate::types::{Action, ContextId, EncounterPhase, Outcome, ParticipantId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::Instant;

/// One raid from start to resolution
#[derive(Debug)]
pub struct Encounter {
    context: ContextId,
    profile: EncounterProfile,
    settings: RaidSettings,
    phase: EncounterPhase,
    /// Players gathered during the join window
    pending_roster: Vec<Combatant>,
    /// Present from the close of the join window onward
    battle: Option<BattleState>,
    intake: ActionIntake,
    join_deadline: Option<Instant>,
    rng: StdRng,
}

/// RNG for an encounter: seeded when the settings pin a seed
pub fn make_rng(settings: &RaidSettings) -> StdRng {
    match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl Encounter {
    pub fn new(
        context: ContextId,
        profile: EncounterProfile,
        settings: RaidSettings,
        rng: StdRng,
    ) -> Self {
        Encounter {
            context,
            profile,
            settings,
            phase: EncounterPhase::Idle,
            pending_roster: Vec::new(),
            battle: None,
            intake: ActionIntake::new(),
            join_deadline: None,
            rng,
        }
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn phase(&self) -> EncounterPhase {
        self.phase
    }

    pub fn profile(&self) -> &EncounterProfile {
        &self.profile
    }

    pub fn battle(&self) -> Option<&BattleState> {
        self.battle.as_ref()
    }

    /// Players in join order
    pub fn players(&self) -> &[Combatant] {
        match &self.battle {
            Some(battle) => &battle.roster,
            None => &self.pending_roster,
        }
    }

    pub fn joined_count(&self) -> usize {
        self.players().len()
    }

    pub fn survivors(&self) -> Vec<ParticipantId> {
        self.players()
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| p.id)
            .collect()
    }

    /// Idle -> JoinWindow
    pub fn open_join_window(&mut self, now: Instant) -> Result<(), RaidError> {
        if self.phase != EncounterPhase::Idle {
            return Err(RaidError::AlreadyActive);
        }
        self.phase = EncounterPhase::JoinWindow;
        self.join_deadline = Some(now + self.settings.join_window());
        tracing::info!(context = %self.context, boss = %self.profile.name, "Join window opened");
        Ok(())
    }

    /// The window is half-open: a join landing on the deadline is late
    fn join_open_at(&self, now: Instant) -> bool {
        self.join_deadline.map_or(false, |deadline| now < deadline)
    }

    /// Add a player with freshly rolled stats
    pub fn join(
        &mut self,
        participant: ParticipantId,
        display_name: impl Into<String>,
        now: Instant,
    ) -> Result<JoinOutcome, RaidError> {
        if self.phase != EncounterPhase::JoinWindow || !self.join_open_at(now) {
            return Err(RaidError::NotInJoinWindow);
        }
        if participant == ParticipantId::BOSS {
            return Err(RaidError::ReservedParticipant(participant));
        }
        if self.pending_roster.iter().any(|p| p.id == participant) {
            return Ok(JoinOutcome::AlreadyJoined);
        }

        let attack = self.settings.player_attack.roll(&mut self.rng);
        let defense = self.settings.player_defense.roll(&mut self.rng);
        let player = Combatant::player(
            participant,
            display_name,
            self.settings.player_hp,
            attack,
            defense,
        );
        tracing::debug!(
            context = %self.context,
            participant = %participant,
            attack,
            defense,
            "Player joined"
        );
        self.pending_roster.push(player);

        let seconds_left = self
            .join_deadline
            .map(|deadline| deadline.saturating_duration_since(now).as_secs())
            .unwrap_or(0);
        Ok(JoinOutcome::Joined {
            roster_size: self.pending_roster.len(),
            seconds_left,
        })
    }

    /// JoinWindow -> Turn(1), or Resolved(Cancelled) if nobody joined.
    ///
    /// The boss is created and scaled here, exactly once.
    pub fn close_join_window(&mut self) -> Result<EncounterPhase, RaidError> {
        if self.phase != EncounterPhase::JoinWindow {
            return Err(RaidError::NotInJoinWindow);
        }
        self.join_deadline = None;

        if self.pending_roster.is_empty() {
            self.phase = EncounterPhase::Resolved {
                outcome: Outcome::Cancelled,
            };
            tracing::info!(context = %self.context, "No players joined, raid cancelled");
            return Ok(self.phase);
        }

        let roster = std::mem::take(&mut self.pending_roster);
        let mut boss = Combatant::boss(&self.profile);
        boss.apply_scaling(scale_boss_stats(
            self.profile.base_hp,
            self.profile.base_atk,
            self.profile.base_def,
            roster.len(),
        ));
        tracing::info!(
            context = %self.context,
            players = roster.len(),
            boss_hp = boss.max_hp(),
            boss_atk = boss.attack,
            boss_def = boss.defense,
            "Raid begins"
        );

        self.battle = Some(BattleState::new(roster, boss));
        self.phase = EncounterPhase::Turn { number: 1 };
        Ok(self.phase)
    }

    /// Open the action intake gate for the current turn
    pub fn open_turn(&mut self, now: Instant) -> Result<TurnOpening, RaidError> {
        let (EncounterPhase::Turn { number }, Some(battle)) = (self.phase, &self.battle) else {
            return Err(RaidError::NoActiveTurn);
        };
        let eligible = battle.survivors();
        let deadline = now + self.settings.action_window();
        let opening = TurnOpening {
            turn: number,
            eligible: eligible.len(),
            window_secs: self.settings.action_window_secs,
            boss: battle.boss.snapshot(),
        };
        self.intake.open(number, eligible, deadline);
        tracing::debug!(context = %self.context, turn = number, "Collecting actions");
        Ok(opening)
    }

    /// Route a choice into the open intake gate
    pub fn submit_action(
        &mut self,
        participant: ParticipantId,
        action: Action,
        now: Instant,
    ) -> Result<SubmitReceipt, RaidError> {
        let (EncounterPhase::Turn { .. }, Some(battle)) = (self.phase, &self.battle) else {
            return Err(RaidError::NoActiveTurn);
        };
        let player = battle
            .player(participant)
            .ok_or(RaidError::NotInEncounter(participant))?;
        if !player.is_alive() {
            return Err(RaidError::NotAlive(participant));
        }
        self.intake.submit(participant, action, now)
    }

    /// Close the gate and resolve the turn atomically
    pub fn resolve_turn(&mut self) -> Result<TurnReport, RaidError> {
        let EncounterPhase::Turn { number } = self.phase else {
            return Err(RaidError::NoActiveTurn);
        };
        let Some(battle) = self.battle.as_ref() else {
            return Err(RaidError::NoActiveTurn);
        };

        let actions = self.intake.close();
        let (next, report) = resolve_turn(battle, &actions, &mut self.rng);

        self.phase = match report.outcome {
            TurnOutcome::Continue => EncounterPhase::Turn { number: next.turn },
            TurnOutcome::Victory => EncounterPhase::Resolved {
                outcome: Outcome::Victory,
            },
            TurnOutcome::Wipe => EncounterPhase::Resolved {
                outcome: Outcome::Wipe,
            },
        };
        self.battle = Some(next);

        tracing::debug!(
            context = %self.context,
            turn = number,
            submitted = actions.len(),
            damage = report.total_player_damage,
            boss_hp = report.boss_hp,
            "Turn resolved"
        );
        if let Some(outcome) = self.phase.outcome() {
            tracing::info!(context = %self.context, turn = number, ?outcome, "Raid resolved");
        }
        Ok(report)
    }

    /// Split rewards among survivors of a fought-out raid
    pub fn allocate_rewards(&mut self, config: &RewardConfig) -> Option<RewardResult> {
        match self.phase.outcome() {
            Some(Outcome::Victory) | Some(Outcome::Wipe) => {
                let survivors = self.survivors();
                let joined = self.joined_count();
                Some(allocate_rewards(joined, &survivors, config, &mut self.rng))
            }
            _ => None,
        }
    }

    /// Any -> Resolved(Cancelled)
    pub fn force_end(&mut self) -> Result<(), RaidError> {
        if self.phase.is_resolved() {
            return Err(RaidError::NoActiveEncounter);
        }
        self.intake.close();
        self.join_deadline = None;
        self.phase = EncounterPhase::Resolved {
            outcome: Outcome::Cancelled,
        };
        tracing::info!(context = %self.context, "Raid force ended");
        Ok(())
    }

    pub fn participant_stats(&self, participant: ParticipantId) -> Result<CombatantSnapshot, RaidError> {
        self.players()
            .iter()
            .find(|p| p.id == participant)
            .map(Combatant::snapshot)
            .ok_or(RaidError::NotInEncounter(participant))
    }

    pub fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            context: self.context,
            phase: self.phase,
            boss_name: self.profile.name.clone(),
            image_ref: self.profile.image_ref.clone(),
            boss: self.battle.as_ref().map(|b| b.boss.snapshot()),
            boss_phase: self.battle.as_ref().map(|b| b.phase),
            berserk: self.battle.as_ref().map_or(false, |b| b.berserk),
            players: self.players().iter().map(Combatant::snapshot).collect(),
        }
    }
}
