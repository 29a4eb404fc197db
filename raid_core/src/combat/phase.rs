//! Boss phases - Damage escalation as the boss loses HP
//!
//! | HP ratio | Phase     | Multiplier |
//! |----------|-----------|------------|
//! | > 0.75   | Calm      | 1.00       |
//! | <= 0.75  | Agitated  | 1.15       |
//! | <= 0.50  | Enraged   | 1.25       |
//! | <= 0.25  | Frenzied  | 1.35       |
//! | <= 0.10  | Berserk   | 1.45       |

use serde::{Deserialize, Serialize};

/// Boss escalation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossPhase {
    Calm,
    Agitated,
    Enraged,
    Frenzied,
    Berserk,
}

impl BossPhase {
    /// Thresholds in descending severity; first match wins
    const THRESHOLDS: [(f64, BossPhase); 4] = [
        (0.10, BossPhase::Berserk),
        (0.25, BossPhase::Frenzied),
        (0.50, BossPhase::Enraged),
        (0.75, BossPhase::Agitated),
    ];

    /// Phase for a boss HP ratio
    pub fn from_hp_ratio(ratio: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(threshold, _)| ratio <= *threshold)
            .map(|(_, phase)| *phase)
            .unwrap_or(BossPhase::Calm)
    }

    /// Multiplier applied to every boss hit in this phase
    pub fn damage_multiplier(&self) -> f64 {
        match self {
            BossPhase::Calm => 1.0,
            BossPhase::Agitated => 1.15,
            BossPhase::Enraged => 1.25,
            BossPhase::Frenzied => 1.35,
            BossPhase::Berserk => 1.45,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BossPhase::Calm => "calm",
            BossPhase::Agitated => "agitated",
            BossPhase::Enraged => "enraged",
            BossPhase::Frenzied => "frenzied",
            BossPhase::Berserk => "berserk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(BossPhase::from_hp_ratio(1.0), BossPhase::Calm);
        assert_eq!(BossPhase::from_hp_ratio(0.76), BossPhase::Calm);
        assert_eq!(BossPhase::from_hp_ratio(0.75), BossPhase::Agitated);
        assert_eq!(BossPhase::from_hp_ratio(0.5), BossPhase::Enraged);
        assert_eq!(BossPhase::from_hp_ratio(0.26), BossPhase::Enraged);
        assert_eq!(BossPhase::from_hp_ratio(0.25), BossPhase::Frenzied);
        assert_eq!(BossPhase::from_hp_ratio(0.10), BossPhase::Berserk);
        assert_eq!(BossPhase::from_hp_ratio(0.0), BossPhase::Berserk);
    }

    #[test]
    fn test_multipliers_escalate() {
        let phases = [
            BossPhase::Calm,
            BossPhase::Agitated,
            BossPhase::Enraged,
            BossPhase::Frenzied,
            BossPhase::Berserk,
        ];
        for pair in phases.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].damage_multiplier() < pair[1].damage_multiplier());
        }
    }
}
