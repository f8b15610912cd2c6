//! Damage and heal calculation - pure functions over fighter stats

use crate::config::{BattleConstants, DamageConstants};
use crate::fighter::Fighter;
use crate::rng::RandomSource;
use crate::types::StatusType;

/// Attack after an active attack_up is applied
pub fn effective_attack(attacker: &Fighter, constants: &DamageConstants) -> f64 {
    let attack = attacker.stats.attack as f64;
    if attacker.has_status(StatusType::AttackUp) {
        attack * constants.buff_multiplier
    } else {
        attack
    }
}

/// Defense after an active defense_up is applied
pub fn effective_defense(defender: &Fighter, constants: &DamageConstants) -> f64 {
    let defense = defender.stats.defense as f64;
    if defender.has_status(StatusType::DefenseUp) {
        defense * constants.buff_multiplier
    } else {
        defense
    }
}

/// Damage before variance: `attack * multiplier - defense * 0.5`
///
/// May be zero or negative; the floor is applied after variance.
pub fn raw_damage(attacker: &Fighter, defender: &Fighter, multiplier: f64, constants: &DamageConstants) -> f64 {
    effective_attack(attacker, constants) * multiplier
        - effective_defense(defender, constants) * constants.defense_factor
}

/// Calculate the damage of one hit. Never less than 1.
///
/// Draws one value from `rng` for the variance roll.
pub fn calculate_damage(
    attacker: &Fighter,
    defender: &Fighter,
    multiplier: f64,
    constants: &DamageConstants,
    rng: &mut dyn RandomSource,
) -> u32 {
    debug_assert!(
        multiplier.is_finite() && multiplier >= 0.0,
        "damage multiplier must be finite and non-negative, got {}",
        multiplier
    );
    let multiplier = if multiplier.is_finite() { multiplier.max(0.0) } else { 0.0 };

    let raw = raw_damage(attacker, defender, multiplier, constants);
    let variance = constants.variance_min + rng.next_f64() * constants.variance_spread;
    let damage = (raw * variance).floor();

    if !(damage >= 1.0) {
        1
    } else {
        damage as u32
    }
}

/// Heal amount for a share of max hp, floored
pub fn heal_amount(max_hp: u32, ratio: f64) -> u32 {
    (max_hp as f64 * ratio).floor() as u32
}

/// Apply a ratio heal, returning the healed fighter and the nominal amount
///
/// The nominal amount is reported even when the heal is capped at max hp.
pub fn apply_heal(fighter: &Fighter, ratio: f64) -> (Fighter, u32) {
    let mut new_fighter = fighter.clone();
    let amount = heal_amount(new_fighter.stats.max_hp(), ratio);
    new_fighter.stats.heal(amount);
    (new_fighter, amount)
}

/// Initiative roll: speed plus a uniform bonus in `[0, jitter)`
pub fn initiative(fighter: &Fighter, constants: &BattleConstants, rng: &mut dyn RandomSource) -> f64 {
    fighter.stats.speed as f64 + rng.next_range(constants.initiative.jitter)
}
