//! Boss target selection

use super::constants::{
    BERSERK_EXTRA_TARGETS_MAX, BERSERK_EXTRA_TARGETS_MIN, MAX_TARGETS, TARGET_TIERS,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Number of distinct targets for a given alive-player count
pub fn target_count(alive: usize) -> usize {
    let tier = TARGET_TIERS
        .iter()
        .find(|(max_alive, _)| alive <= *max_alive)
        .map(|(_, targets)| *targets)
        .unwrap_or(MAX_TARGETS);
    tier.min(alive)
}

/// Pick boss targets from `alive` (roster indices).
///
/// The first draw is without replacement. While berserk, a second
/// independent draw of 1-2 targets is appended; it may repeat players from
/// the first draw.
pub fn select_targets(alive: &[usize], berserk: bool, rng: &mut impl Rng) -> Vec<usize> {
    let mut targets: Vec<usize> = alive
        .choose_multiple(rng, target_count(alive.len()))
        .copied()
        .collect();

    if berserk && !alive.is_empty() {
        let extra = rng
            .gen_range(BERSERK_EXTRA_TARGETS_MIN..=BERSERK_EXTRA_TARGETS_MAX)
            .min(alive.len());
        targets.extend(alive.choose_multiple(rng, extra).copied());
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_target_tiers() {
        assert_eq!(target_count(0), 0);
        assert_eq!(target_count(1), 1);
        assert_eq!(target_count(3), 1);
        assert_eq!(target_count(4), 2);
        assert_eq!(target_count(6), 2);
        assert_eq!(target_count(9), 3);
        assert_eq!(target_count(12), 4);
        assert_eq!(target_count(13), 5);
        assert_eq!(target_count(100), 5);
    }

    #[test]
    fn test_first_draw_is_distinct() {
        let mut rng = StdRng::seed_from_u64(9);
        let alive: Vec<usize> = (0..20).collect();
        for _ in 0..100 {
            let targets = select_targets(&alive, false, &mut rng);
            assert_eq!(targets.len(), 5);
            let unique: HashSet<_> = targets.iter().collect();
            assert_eq!(unique.len(), 5);
        }
    }

    #[test]
    fn test_berserk_adds_one_or_two() {
        let mut rng = StdRng::seed_from_u64(21);
        let alive: Vec<usize> = (0..5).collect();
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let targets = select_targets(&alive, true, &mut rng);
            // 2 regular targets plus 1-2 extra
            assert!(targets.len() == 3 || targets.len() == 4);
            assert!(targets.iter().all(|t| alive.contains(t)));
            seen.insert(targets.len());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_berserk_single_survivor_hit_twice() {
        let mut rng = StdRng::seed_from_u64(4);
        let targets = select_targets(&[3], true, &mut rng);
        // Extra draw is capped at the alive count and may repeat
        assert_eq!(targets, vec![3, 3]);
    }

    #[test]
    fn test_no_alive_no_targets() {
        let mut rng = StdRng::seed_from_u64(4);
        assert!(select_targets(&[], true, &mut rng).is_empty());
    }
}
