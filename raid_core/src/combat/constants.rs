//! Combat formula constants

/// Extra boss HP per additional player (25%)
pub const HP_SCALE_PER_PLAYER: f64 = 0.25;
/// Extra boss attack per additional player (7%)
pub const ATK_SCALE_PER_PLAYER: f64 = 0.07;
/// Extra boss defense per additional player (5%)
pub const DEF_SCALE_PER_PLAYER: f64 = 0.05;

/// Player attack roll spread: [atk - LOW, atk + HIGH]
pub const PLAYER_ATTACK_SPREAD_LOW: i64 = 20;
pub const PLAYER_ATTACK_SPREAD_HIGH: i64 = 25;
/// Fraction of boss defense subtracted from each player hit
pub const BOSS_DEFENSE_FACTOR: f64 = 0.1;

/// Heal roll range as multiples of the healer's attack
pub const HEAL_MIN_FACTOR: f64 = 0.9;
pub const HEAL_MAX_FACTOR: f64 = 1.8;

/// AFK penalty grows by this much per consecutive idle turn
pub const AFK_PENALTY_STEP: i64 = 50;
/// Per-turn AFK penalty ceiling
pub const AFK_PENALTY_CAP: i64 = 150;

/// Boss attack roll spread: [atk - SPREAD, atk + SPREAD]
pub const BOSS_ATTACK_SPREAD: i64 = 50;
/// Chance for a boss hit to be critical
pub const BOSS_CRIT_CHANCE: f64 = 0.10;
/// Critical multiplier is rolled in [MIN, MAX)
pub const BOSS_CRIT_MIN: f64 = 1.5;
pub const BOSS_CRIT_MAX: f64 = 2.0;

/// Permanent boss attack multiplier applied when berserk first triggers
pub const BERSERK_ATTACK_MULTIPLIER: f64 = 1.5;
/// Extra berserk targets are rolled in [MIN, MAX]
pub const BERSERK_EXTRA_TARGETS_MIN: usize = 1;
pub const BERSERK_EXTRA_TARGETS_MAX: usize = 2;

/// Boss target count by alive-player tier: (max alive, targets)
pub const TARGET_TIERS: [(usize, usize); 4] = [(3, 1), (6, 2), (9, 3), (12, 4)];
/// Target count above the last tier
pub const MAX_TARGETS: usize = 5;
