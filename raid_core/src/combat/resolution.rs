//! Turn resolution - Apply one turn of player actions and boss counterattack

use super::constants::*;
use super::result::{AfkLine, AttackLine, BossHitLine, HealLine, PhaseChange, TurnOutcome, TurnReport};
use super::state::BattleState;
use super::targeting::select_targets;
use super::BossPhase;
use crate::types::{Action, ParticipantId};
use rand::Rng;
use std::collections::HashMap;

/// Resolve one turn (immutable API)
///
/// Returns the new battle state and the turn report. Steps run in a fixed order:
/// 1. Reset per-turn flags of living players
/// 2. Assign submitted actions (absent = none)
/// 3. AFK accounting and penalties
/// 4. Player attacks, heals and defends
/// 5. Victory check (no counterattack on a dead boss)
/// 6. Boss phase / berserk update
/// 7. Target selection
/// 8. Boss counterattack
/// 9. Wipe check
pub fn resolve_turn(
    state: &BattleState,
    actions: &HashMap<ParticipantId, Action>,
    rng: &mut impl Rng,
) -> (BattleState, TurnReport) {
    let mut next = state.clone();
    let mut report = TurnReport::new(state.turn, next.boss.display_name.clone());

    // Steps 1-2: reset flags and assign actions
    for player in next.roster.iter_mut().filter(|p| p.is_alive()) {
        player.reset_turn();
        player.action = actions.get(&player.id).copied();
    }

    // Step 3: AFK accounting
    for player in next.roster.iter_mut().filter(|p| p.is_alive()) {
        if player.action.is_some() {
            player.afk_streak = 0;
            continue;
        }
        player.afk_streak += 1;
        let penalty = afk_penalty(player.afk_streak);
        let lost = player.take_damage(penalty);
        report.afk.push(AfkLine {
            participant: player.id,
            name: player.display_name.clone(),
            streak: player.afk_streak,
            penalty: lost,
            defeated: !player.is_alive(),
        });
    }

    // Step 4: player actions
    let armour = boss_armour(next.boss.defense);
    let BattleState { roster, boss, .. } = &mut next;
    for player in roster.iter_mut().filter(|p| p.is_alive()) {
        match player.action {
            Some(Action::Attack) => {
                let rolled = roll_player_attack(player.attack, rng);
                let damage = (rolled - armour).max(0);
                boss.take_damage(damage);
                report.total_player_damage += damage;
                report.attacks.push(AttackLine {
                    attacker: player.id,
                    name: player.display_name.clone(),
                    rolled,
                    damage,
                });
            }
            Some(Action::Heal) => {
                let rolled = roll_heal(player.attack, rng);
                let healed = player.heal(rolled);
                report.heals.push(HealLine {
                    healer: player.id,
                    name: player.display_name.clone(),
                    rolled,
                    healed,
                });
            }
            Some(Action::Defend) => player.is_defending = true,
            None => {}
        }
    }

    // Step 5: boss defeated before it can strike back
    if next.boss.hp() == 0 {
        report.outcome = TurnOutcome::Victory;
        return finish(next, report);
    }

    // Step 6: phase and berserk
    let phase = BossPhase::from_hp_ratio(next.boss.hp_ratio());
    let mut berserk_triggered = false;
    if phase == BossPhase::Berserk && !next.berserk {
        next.berserk = true;
        next.boss.attack = (next.boss.attack as f64 * BERSERK_ATTACK_MULTIPLIER) as i64;
        berserk_triggered = true;
    }
    if phase != next.phase {
        report.phase_change = Some(PhaseChange {
            from: next.phase,
            to: phase,
            multiplier: phase.damage_multiplier(),
            berserk_triggered,
        });
        next.phase = phase;
    }

    // Step 7: targets
    let targets = select_targets(&next.alive_indices(), next.berserk, rng);

    // Step 8: counterattack
    let multiplier = phase.damage_multiplier();
    let boss_attack = next.boss.attack;
    for index in targets {
        let target = &mut next.roster[index];
        let rolled = roll_boss_attack(boss_attack, rng);
        let crit = roll_boss_crit(rng);
        let damage = boss_hit_damage(rolled, crit, multiplier, target.defense, target.is_defending);
        let lost = target.take_damage(damage);
        report.boss_hits.push(BossHitLine {
            target: target.id,
            name: target.display_name.clone(),
            rolled,
            critical: crit.is_some(),
            defended: target.is_defending,
            damage: lost,
            hp_after: target.hp(),
            max_hp: target.max_hp(),
            defeated: !target.is_alive(),
        });
    }

    // Step 9: wipe check
    report.outcome = if next.any_alive() {
        TurnOutcome::Continue
    } else {
        TurnOutcome::Wipe
    };
    finish(next, report)
}

fn finish(mut next: BattleState, mut report: TurnReport) -> (BattleState, TurnReport) {
    report.boss_hp = next.boss.hp();
    report.boss_max_hp = next.boss.max_hp();
    if report.outcome == TurnOutcome::Continue {
        next.turn += 1;
    }
    (next, report)
}

/// HP lost for the given consecutive idle-turn count
pub fn afk_penalty(streak: u32) -> i64 {
    (AFK_PENALTY_STEP * streak as i64).min(AFK_PENALTY_CAP)
}

/// Flat reduction applied to every player hit: floor(defense * 0.1)
pub fn boss_armour(boss_defense: i64) -> i64 {
    (boss_defense as f64 * BOSS_DEFENSE_FACTOR).floor() as i64
}

/// Roll a player attack in [atk - 20, atk + 25]
pub fn roll_player_attack(attack: i64, rng: &mut impl Rng) -> i64 {
    rng.gen_range(attack - PLAYER_ATTACK_SPREAD_LOW..=attack + PLAYER_ATTACK_SPREAD_HIGH)
}

/// Roll a self-heal in [floor(atk * 0.9), floor(atk * 1.8)]
pub fn roll_heal(attack: i64, rng: &mut impl Rng) -> i64 {
    let min = (attack as f64 * HEAL_MIN_FACTOR).floor() as i64;
    let max = (attack as f64 * HEAL_MAX_FACTOR).floor() as i64;
    if min >= max {
        max
    } else {
        rng.gen_range(min..=max)
    }
}

/// Roll a boss hit in [atk - 50, atk + 50]
pub fn roll_boss_attack(attack: i64, rng: &mut impl Rng) -> i64 {
    rng.gen_range(attack - BOSS_ATTACK_SPREAD..=attack + BOSS_ATTACK_SPREAD)
}

/// Critical multiplier if the hit crits
pub fn roll_boss_crit(rng: &mut impl Rng) -> Option<f64> {
    if rng.gen::<f64>() < BOSS_CRIT_CHANCE {
        Some(rng.gen_range(BOSS_CRIT_MIN..BOSS_CRIT_MAX))
    } else {
        None
    }
}

/// Final damage of a boss hit on a player
///
/// roll * crit * phase multiplier, minus the target's defense (floored at 0),
/// halved (integer division) if the target is defending.
pub fn boss_hit_damage(
    rolled: i64,
    crit_multiplier: Option<f64>,
    phase_multiplier: f64,
    target_defense: i64,
    defending: bool,
) -> i64 {
    let raw = (rolled as f64 * crit_multiplier.unwrap_or(1.0) * phase_multiplier) as i64;
    let after_defense = (raw - target_defense).max(0);
    if defending {
        after_defense / 2
    } else {
        after_defense
    }
}
