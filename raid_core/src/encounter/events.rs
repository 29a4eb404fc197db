//! Events and read-only views handed to the host

use crate::combat::{BossPhase, TurnReport};
use crate::combatant::CombatantSnapshot;
use crate::reward::RewardResult;
use crate::types::{ContextId, EncounterPhase, Outcome, ParticipantId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reply to a join request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum JoinOutcome {
    Joined {
        roster_size: usize,
        /// Whole seconds until the join window closes
        seconds_left: u64,
    },
    AlreadyJoined,
}

/// Reply to a successful start request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterStarted {
    pub context: ContextId,
    pub boss_name: String,
    pub image_ref: Option<String>,
    pub join_window_secs: u64,
}

/// Data for announcing an open turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOpening {
    pub turn: u32,
    /// Living players allowed to submit
    pub eligible: usize,
    pub window_secs: u64,
    pub boss: CombatantSnapshot,
}

/// Why an encounter ended without being fought out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CancelReason {
    /// Join window closed with an empty roster
    NoParticipants,
    ForceEnded { by: ParticipantId },
}

/// Something the host should render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RaidEvent {
    JoinWindowOpened {
        boss_name: String,
        image_ref: Option<String>,
        window_secs: u64,
    },
    PlayerJoined {
        participant: ParticipantId,
        display_name: String,
        roster_size: usize,
        seconds_left: u64,
    },
    RaidBegan {
        boss: CombatantSnapshot,
        players: Vec<CombatantSnapshot>,
    },
    TurnOpened(TurnOpening),
    TurnResolved(TurnReport),
    Finished {
        outcome: Outcome,
        survivors: Vec<CombatantSnapshot>,
        rewards: Option<RewardResult>,
    },
    Cancelled(CancelReason),
}

impl RaidEvent {
    /// Short machine-friendly name
    pub fn kind(&self) -> &'static str {
        match self {
            RaidEvent::JoinWindowOpened { .. } => "join_window_opened",
            RaidEvent::PlayerJoined { .. } => "player_joined",
            RaidEvent::RaidBegan { .. } => "raid_began",
            RaidEvent::TurnOpened(_) => "turn_opened",
            RaidEvent::TurnResolved(_) => "turn_resolved",
            RaidEvent::Finished { .. } => "finished",
            RaidEvent::Cancelled(_) => "cancelled",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for RaidEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaidEvent::JoinWindowOpened {
                boss_name,
                window_secs,
                ..
            } => write!(
                f,
                "{} appears! Join within {} seconds.",
                boss_name, window_secs
            ),
            RaidEvent::PlayerJoined {
                display_name,
                roster_size,
                seconds_left,
                ..
            } => write!(
                f,
                "{} joined the raid ({} in party, {}s left).",
                display_name, roster_size, seconds_left
            ),
            RaidEvent::RaidBegan { boss, players } => write!(
                f,
                "The raid begins: {} players against {} ({} HP).",
                players.len(),
                boss.display_name,
                boss.max_hp
            ),
            RaidEvent::TurnOpened(opening) => write!(
                f,
                "Turn {}: {}. Choose attack, heal or defend within {}s.",
                opening.turn,
                opening.boss.summary(),
                opening.window_secs
            ),
            RaidEvent::TurnResolved(report) => {
                writeln!(f, "Turn {} results:", report.turn)?;
                write!(f, "{}", report.summary())
            }
            RaidEvent::Finished {
                outcome, survivors, ..
            } => match outcome {
                Outcome::Victory => write!(f, "Victory! {} survivors.", survivors.len()),
                Outcome::Wipe => write!(f, "The party was wiped out."),
                Outcome::Cancelled => write!(f, "The raid was cancelled."),
            },
            RaidEvent::Cancelled(CancelReason::NoParticipants) => {
                write!(f, "Nobody joined. The raid is cancelled.")
            }
            RaidEvent::Cancelled(CancelReason::ForceEnded { .. }) => {
                write!(f, "The raid was ended early.")
            }
        }
    }
}

/// Read-only view of an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub context: ContextId,
    pub phase: EncounterPhase,
    pub boss_name: String,
    pub image_ref: Option<String>,
    /// Absent until the join window closes with players
    pub boss: Option<CombatantSnapshot>,
    pub boss_phase: Option<BossPhase>,
    pub berserk: bool,
    pub players: Vec<CombatantSnapshot>,
}

impl EncounterSnapshot {
    pub fn alive_players(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        match self.phase {
            EncounterPhase::Idle => lines.push(format!("{} is waking up.", self.boss_name)),
            EncounterPhase::JoinWindow => lines.push(format!(
                "Gathering a party against {} ({} joined).",
                self.boss_name,
                self.players.len()
            )),
            EncounterPhase::Turn { number } => lines.push(format!("Turn {}", number)),
            EncounterPhase::Resolved { outcome } => {
                lines.push(format!("Raid over: {:?}", outcome))
            }
        }
        if let Some(boss) = &self.boss {
            let phase = self.boss_phase.map_or("", |p| p.name());
            lines.push(format!("{} [{}]", boss.summary(), phase));
        }
        lines.extend(self.players.iter().map(CombatantSnapshot::summary));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_tagging() {
        let event = RaidEvent::PlayerJoined {
            participant: ParticipantId(7),
            display_name: "Ana".to_string(),
            roster_size: 2,
            seconds_left: 41,
        };
        let json: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();

        assert_eq!(json["event"], "player_joined");
        assert_eq!(json["participant"], 7);
        assert_eq!(json["seconds_left"], 41);
        assert_eq!(event.kind(), "player_joined");
    }

    #[test]
    fn test_cancel_reason_json() {
        let event = RaidEvent::Cancelled(CancelReason::ForceEnded {
            by: ParticipantId(3),
        });
        let json: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();

        assert_eq!(json["event"], "cancelled");
        assert_eq!(json["reason"], "force_ended");
        assert_eq!(json["by"], 3);
    }

    #[test]
    fn test_display_text() {
        let event = RaidEvent::JoinWindowOpened {
            boss_name: "Ravager".to_string(),
            image_ref: None,
            window_secs: 60,
        };
        assert_eq!(event.to_string(), "Ravager appears! Join within 60 seconds.");

        let joined = JoinOutcome::Joined {
            roster_size: 1,
            seconds_left: 30,
        };
        assert_ne!(joined, JoinOutcome::AlreadyJoined);
    }
}
