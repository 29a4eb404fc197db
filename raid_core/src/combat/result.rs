//! TurnReport - Outcome of resolving one turn

use super::BossPhase;
use crate::types::ParticipantId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happens after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Boss and at least one player still standing
    Continue,
    /// Boss HP reached 0 from player attacks
    Victory,
    /// No player alive after the boss counterattack
    Wipe,
}

/// A player's attack on the boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackLine {
    pub attacker: ParticipantId,
    pub name: String,
    pub rolled: i64,
    /// Damage after boss defense
    pub damage: i64,
}

/// A player's self-heal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealLine {
    pub healer: ParticipantId,
    pub name: String,
    pub rolled: i64,
    /// HP actually restored after the max HP cap
    pub healed: i64,
}

/// HP penalty for not submitting an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfkLine {
    pub participant: ParticipantId,
    pub name: String,
    pub streak: u32,
    pub penalty: i64,
    pub defeated: bool,
}

/// Boss escalation observed this turn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub from: BossPhase,
    pub to: BossPhase,
    pub multiplier: f64,
    /// Berserk triggered this turn (boss attack permanently raised)
    pub berserk_triggered: bool,
}

/// A single boss hit on a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossHitLine {
    pub target: ParticipantId,
    pub name: String,
    pub rolled: i64,
    pub critical: bool,
    pub defended: bool,
    /// Damage applied after multipliers, defense and defending
    pub damage: i64,
    pub hp_after: i64,
    pub max_hp: i64,
    pub defeated: bool,
}

/// Full result of one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u32,
    pub boss_name: String,
    pub total_player_damage: i64,
    pub attacks: Vec<AttackLine>,
    pub heals: Vec<HealLine>,
    pub phase_change: Option<PhaseChange>,
    pub afk: Vec<AfkLine>,
    pub boss_hits: Vec<BossHitLine>,
    pub boss_hp: i64,
    pub boss_max_hp: i64,
    pub outcome: TurnOutcome,
}

/// One line of a report, in presentation order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportEntry<'a> {
    TotalDamage { boss: &'a str, amount: i64 },
    Attack(&'a AttackLine),
    Heal(&'a HealLine),
    Phase(&'a PhaseChange),
    Afk(&'a AfkLine),
    BossHit { boss: &'a str, hit: &'a BossHitLine },
}

impl TurnReport {
    pub fn new(turn: u32, boss_name: impl Into<String>) -> Self {
        TurnReport {
            turn,
            boss_name: boss_name.into(),
            total_player_damage: 0,
            attacks: Vec::new(),
            heals: Vec::new(),
            phase_change: None,
            afk: Vec::new(),
            boss_hits: Vec::new(),
            boss_hp: 0,
            boss_max_hp: 0,
            outcome: TurnOutcome::Continue,
        }
    }

    /// Entries ordered: total damage, attacks, heals, phase note, AFK notices, boss hits
    pub fn entries(&self) -> Vec<ReportEntry<'_>> {
        let mut entries = Vec::new();
        if self.total_player_damage > 0 {
            entries.push(ReportEntry::TotalDamage {
                boss: &self.boss_name,
                amount: self.total_player_damage,
            });
        }
        entries.extend(self.attacks.iter().map(ReportEntry::Attack));
        entries.extend(self.heals.iter().map(ReportEntry::Heal));
        if let Some(change) = &self.phase_change {
            entries.push(ReportEntry::Phase(change));
        }
        entries.extend(self.afk.iter().map(ReportEntry::Afk));
        entries.extend(self.boss_hits.iter().map(|hit| ReportEntry::BossHit {
            boss: &self.boss_name,
            hit,
        }));
        entries
    }

    pub fn critical_hits(&self) -> usize {
        self.boss_hits.iter().filter(|h| h.critical).count()
    }

    /// Plain-text rendering, one entry per line
    pub fn summary(&self) -> String {
        let lines: Vec<String> = self.entries().iter().map(|e| e.to_string()).collect();
        if lines.is_empty() {
            "No actions this turn.".to_string()
        } else {
            lines.join("\n")
        }
    }
}

impl fmt::Display for ReportEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportEntry::TotalDamage { boss, amount } => {
                write!(f, "Players dealt {} total damage to {}.", amount, boss)
            }
            ReportEntry::Attack(a) => write!(f, "{} attacked for {} damage.", a.name, a.damage),
            ReportEntry::Heal(h) => write!(f, "{} healed themselves for {} HP.", h.name, h.healed),
            ReportEntry::Phase(p) => {
                if p.berserk_triggered {
                    write!(f, "The boss goes BERSERK! Damage x{:.2} and attack permanently raised.", p.multiplier)
                } else {
                    write!(f, "The boss grows {} (damage x{:.2}).", p.to.name(), p.multiplier)
                }
            }
            ReportEntry::Afk(a) => {
                write!(f, "{} idled ({} turns) and lost {} HP.", a.name, a.streak, a.penalty)?;
                if a.defeated {
                    write!(f, " FATAL")?;
                }
                Ok(())
            }
            ReportEntry::BossHit { boss, hit } => {
                let crit = if hit.critical { "CRITICAL " } else { "" };
                write!(
                    f,
                    "{} {}hit {} for {} damage. ({}/{})",
                    boss, crit, hit.name, hit.damage, hit.hp_after, hit.max_hp
                )?;
                if hit.defeated {
                    write!(f, " FATAL")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> TurnReport {
        let mut report = TurnReport::new(4, "Ravager");
        report.total_player_damage = 210;
        report.attacks.push(AttackLine {
            attacker: ParticipantId(1),
            name: "Ana".to_string(),
            rolled: 215,
            damage: 210,
        });
        report.heals.push(HealLine {
            healer: ParticipantId(2),
            name: "Bo".to_string(),
            rolled: 150,
            healed: 80,
        });
        report.afk.push(AfkLine {
            participant: ParticipantId(3),
            name: "Cy".to_string(),
            streak: 2,
            penalty: 100,
            defeated: false,
        });
        report.phase_change = Some(PhaseChange {
            from: BossPhase::Calm,
            to: BossPhase::Agitated,
            multiplier: 1.15,
            berserk_triggered: false,
        });
        report.boss_hits.push(BossHitLine {
            target: ParticipantId(2),
            name: "Bo".to_string(),
            rolled: 230,
            critical: true,
            defended: false,
            damage: 300,
            hp_after: 0,
            max_hp: 1750,
            defeated: true,
        });
        report
    }

    #[test]
    fn test_entry_order() {
        let report = sample_report();
        let entries = report.entries();

        assert!(matches!(entries[0], ReportEntry::TotalDamage { amount: 210, .. }));
        assert!(matches!(entries[1], ReportEntry::Attack(_)));
        assert!(matches!(entries[2], ReportEntry::Heal(_)));
        assert!(matches!(entries[3], ReportEntry::Phase(_)));
        assert!(matches!(entries[4], ReportEntry::Afk(_)));
        assert!(matches!(entries[5], ReportEntry::BossHit { .. }));
    }

    #[test]
    fn test_summary_text() {
        let summary = sample_report().summary();
        assert!(summary.contains("Players dealt 210"));
        assert!(summary.contains("CRITICAL"));
        assert!(summary.contains("FATAL"));
        assert_eq!(summary.lines().count(), 6);
    }

    #[test]
    fn test_empty_summary() {
        let report = TurnReport::new(1, "Ravager");
        assert_eq!(report.summary(), "No actions this turn.");
        assert_eq!(report.critical_hits(), 0);
    }
}
