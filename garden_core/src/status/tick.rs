//! End-of-turn status processing

use super::StatusEffect;
use crate::config::PoisonConstants;
use crate::fighter::Fighter;
use crate::log::{BattleLog, LogCategory};
use crate::types::StatusType;

/// Result of processing a fighter's end-of-turn effects
#[derive(Debug, Clone)]
pub struct TurnEndResult {
    /// The fighter after ticking
    pub fighter: Fighter,
    /// Total poison damage dealt this tick
    pub poison_damage: u32,
    /// Effects removed this tick
    pub expired: Vec<StatusType>,
    /// False when the fighter held no effects and is returned unchanged
    pub changed: bool,
}

/// Close out a fighter's turn: poison ticks, then every effect decays by one
///
/// An effect whose duration was 1 before the decay is removed. Runs whether
/// or not the fighter acted this turn.
pub fn process_turn_end_effects(
    fighter: &Fighter,
    poison: &PoisonConstants,
    log: &mut BattleLog,
) -> TurnEndResult {
    if fighter.status_effects().is_empty() {
        return TurnEndResult {
            fighter: fighter.clone(),
            poison_damage: 0,
            expired: Vec::new(),
            changed: false,
        };
    }

    let mut new_fighter = fighter.clone();
    let mut poison_damage = 0;
    let mut expired = Vec::new();
    let mut remaining: Vec<StatusEffect> = Vec::with_capacity(fighter.status_effects().len());

    for effect in fighter.status_effects() {
        if effect.effect_type == StatusType::Poison {
            let damage = effect
                .value
                .unwrap_or_else(|| poison.tick_damage(new_fighter.stats.max_hp()));
            new_fighter.stats.take_damage(damage);
            poison_damage += damage;
            log.push(
                format!("{} takes {} poison damage!", new_fighter.name, damage),
                LogCategory::Damage,
            );
        }

        if effect.duration > 1 {
            remaining.push(StatusEffect {
                duration: effect.duration - 1,
                ..effect.clone()
            });
        } else {
            expired.push(effect.effect_type);
            log.push(
                format!("{}'s {} wore off.", new_fighter.name, effect.name()),
                LogCategory::Info,
            );
        }
    }

    *new_fighter.status_effects_mut() = remaining;

    TurnEndResult {
        fighter: new_fighter,
        poison_damage,
        expired,
        changed: true,
    }
}
