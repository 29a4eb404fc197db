//! Boss scaling - Stats grow with party size
//!
//! Applied exactly once, when the join window closes:
//! - hp  = base_hp  * (1 + 0.25 * (n - 1))
//! - atk = base_atk * (1 + 0.07 * (n - 1))
//! - def = base_def * (1 + 0.05 * (n - 1))
//!
//! All results are truncated to integers.

use crate::combat::constants::{ATK_SCALE_PER_PLAYER, DEF_SCALE_PER_PLAYER, HP_SCALE_PER_PLAYER};
use serde::{Deserialize, Serialize};

/// Boss stats after party scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaledStats {
    pub hp: i64,
    pub attack: i64,
    pub defense: i64,
}

/// Scale base boss stats for a roster of `party_size` players
pub fn scale_boss_stats(base_hp: i64, base_atk: i64, base_def: i64, party_size: usize) -> ScaledStats {
    let extra = party_size.saturating_sub(1) as f64;
    ScaledStats {
        hp: scale(base_hp, HP_SCALE_PER_PLAYER, extra),
        attack: scale(base_atk, ATK_SCALE_PER_PLAYER, extra),
        defense: scale(base_def, DEF_SCALE_PER_PLAYER, extra),
    }
}

fn scale(base: i64, per_player: f64, extra_players: f64) -> i64 {
    (base as f64 * (1.0 + per_player * extra_players)) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_player_is_unscaled() {
        let stats = scale_boss_stats(1000, 200, 50, 1);
        assert_eq!(stats, ScaledStats { hp: 1000, attack: 200, defense: 50 });
    }

    #[test]
    fn test_five_players() {
        // hp: 1000 * 2.0, atk: 200 * 1.28, def: 50 * 1.2
        let stats = scale_boss_stats(1000, 200, 50, 5);
        assert_eq!(stats.hp, 2000);
        assert_eq!(stats.attack, 256);
        assert_eq!(stats.defense, 60);
    }

    #[test]
    fn test_truncation() {
        // 333 * 1.25 = 416.25, 99 * 1.07 = 105.93, 77 * 1.05 = 80.85
        let stats = scale_boss_stats(333, 99, 77, 2);
        assert_eq!(stats.hp, 416);
        assert_eq!(stats.attack, 105);
        assert_eq!(stats.defense, 80);
    }

    #[test]
    fn test_scaling_is_deterministic() {
        for n in 1..=40 {
            assert_eq!(scale_boss_stats(5000, 300, 120, n), scale_boss_stats(5000, 300, 120, n));
        }
    }
}
