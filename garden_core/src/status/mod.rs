//! Status effect system: application with refresh-not-stack, and per-turn decay

mod effect;
pub mod tick;

pub use effect::StatusEffect;
pub use tick::{process_turn_end_effects, TurnEndResult};

use crate::fighter::Fighter;
use crate::log::{BattleLog, LogCategory};
use crate::types::StatusType;

/// Apply a status effect, returning the updated fighter
///
/// A fighter holds at most one effect per type. Re-applying a held type
/// extends it to the longer of the two durations instead of stacking.
/// `duration` must be at least 1.
pub fn apply_status_effect(
    fighter: &Fighter,
    effect_type: StatusType,
    duration: u32,
    value: Option<u32>,
    log: &mut BattleLog,
) -> Fighter {
    debug_assert!(duration >= 1, "status durations start at 1 turn");
    let duration = duration.max(1);

    let mut new_fighter = fighter.clone();
    let name = new_fighter.name.clone();
    let effects = new_fighter.status_effects_mut();

    if let Some(existing) = effects.iter_mut().find(|e| e.effect_type == effect_type) {
        existing.refresh(duration);
        log.push(
            format!("{}'s {} was extended!", name, effect_type.name()),
            LogCategory::Effect,
        );
    } else {
        effects.push(StatusEffect::new(effect_type, duration, value));
        log.push(
            format!("{} gained {}!", name, effect_type.name()),
            LogCategory::Effect,
        );
    }

    new_fighter
}
