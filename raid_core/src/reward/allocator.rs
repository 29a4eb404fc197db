//! Reward allocation among survivors
//!
//! For each enabled reward kind the pool size comes from the first scaling
//! rule matching the number of players who joined. Then:
//! - survivors >= pool: every survivor gets exactly 1 unit and the excess is
//!   dropped (house rule, nobody receives more than one scarce reward)
//! - otherwise everyone gets `pool / survivors` and `pool % survivors`
//!   randomly chosen survivors get one extra unit

use super::{RewardAllocation, RewardConfig, RewardResult};
use crate::types::ParticipantId;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Compute payouts for every enabled reward kind
pub fn allocate_rewards(
    joined_count: usize,
    survivors: &[ParticipantId],
    config: &RewardConfig,
    rng: &mut impl Rng,
) -> RewardResult {
    let allocations = config
        .enabled_kinds()
        .map(|kind| {
            let total = kind.total_for(joined_count);
            RewardAllocation {
                kind: kind.name.clone(),
                total,
                awards: distribute_units(total, survivors, rng),
            }
        })
        .collect();

    RewardResult { allocations }
}

/// Split `total` units among `survivors`
pub fn distribute_units(
    total: u32,
    survivors: &[ParticipantId],
    rng: &mut impl Rng,
) -> BTreeMap<ParticipantId, u32> {
    let mut awards = BTreeMap::new();
    if total == 0 || survivors.is_empty() {
        return awards;
    }

    let count = survivors.len() as u32;
    if count >= total {
        for id in survivors {
            awards.insert(*id, 1);
        }
        return awards;
    }

    let base = total / count;
    let remainder = (total % count) as usize;
    for id in survivors {
        awards.insert(*id, base);
    }

    let mut shuffled = survivors.to_vec();
    shuffled.shuffle(rng);
    for id in shuffled.iter().take(remainder) {
        if let Some(units) = awards.get_mut(id) {
            *units += 1;
        }
    }

    awards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::{RewardKind, ScalingRule};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ids(n: u64) -> Vec<ParticipantId> {
        (1..=n).map(ParticipantId).collect()
    }

    #[test]
    fn test_abundant_pool_caps_at_one() {
        // 5 units, 8 survivors: each survivor gets exactly 1
        let mut rng = StdRng::seed_from_u64(1);
        let awards = distribute_units(5, &ids(8), &mut rng);

        assert_eq!(awards.len(), 8);
        assert!(awards.values().all(|&units| units == 1));
    }

    #[test]
    fn test_scarce_pool_remainder() {
        // 13 units, 5 survivors: base 2, remainder 3
        let mut rng = StdRng::seed_from_u64(7);
        let awards = distribute_units(13, &ids(5), &mut rng);

        let threes = awards.values().filter(|&&u| u == 3).count();
        let twos = awards.values().filter(|&&u| u == 2).count();
        assert_eq!(threes, 3);
        assert_eq!(twos, 2);
        assert_eq!(awards.values().sum::<u32>(), 13);
    }

    #[test]
    fn test_equal_pool_and_survivors_seed_independent() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let awards = distribute_units(10, &ids(10), &mut rng);
            assert!(awards.values().all(|&units| units == 1));
        }
    }

    #[test]
    fn test_no_survivors_or_empty_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(distribute_units(10, &[], &mut rng).is_empty());
        assert!(distribute_units(0, &ids(4), &mut rng).is_empty());
    }

    #[test]
    fn test_allocate_uses_joined_count_for_rules() {
        let config = RewardConfig {
            primary: RewardKind::new(
                "crowns",
                vec![ScalingRule::new(1, 3, 1), ScalingRule::new(4, 10, 6)],
            ),
            secondary: vec![RewardKind::new("coins", vec![ScalingRule::new(1, 100, 100)])],
        };
        let mut rng = StdRng::seed_from_u64(11);

        // 6 joined, 2 survived: rule for 6 players gives 6 crowns
        let result = allocate_rewards(6, &ids(2), &config, &mut rng);

        assert_eq!(result.allocations.len(), 2);
        let crowns = result.allocation("crowns").unwrap();
        assert_eq!(crowns.total, 6);
        assert_eq!(crowns.distributed(), 6);
        assert_eq!(result.units_for("crowns", ParticipantId(1)), 3);
        assert_eq!(result.units_for("coins", ParticipantId(2)), 50);
    }

    #[test]
    fn test_disabled_secondary_has_no_entry() {
        let mut config = RewardConfig {
            primary: RewardKind::new("crowns", vec![ScalingRule::new(1, 10, 2)]),
            secondary: vec![RewardKind::new("coins", vec![ScalingRule::new(1, 10, 9)])],
        };
        config.secondary[0].enabled = false;
        let mut rng = StdRng::seed_from_u64(5);

        let result = allocate_rewards(3, &ids(3), &config, &mut rng);
        assert!(result.allocation("coins").is_none());
        assert_eq!(result.allocation("crowns").unwrap().distributed(), 3);
    }

    proptest! {
        #[test]
        fn prop_distribution_conserves_units(total in 0u32..500, survivors in 1u64..60, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let awards = distribute_units(total, &ids(survivors), &mut rng);
            let sum: u32 = awards.values().sum();
            let s = survivors as u32;

            if total == 0 {
                prop_assert_eq!(sum, 0);
            } else if s >= total {
                prop_assert_eq!(sum, s);
                prop_assert!(awards.values().all(|&u| u == 1));
            } else {
                prop_assert_eq!(sum, total);
                let base = total / s;
                prop_assert!(awards.values().all(|&u| u == base || u == base + 1));
            }
        }
    }
}
