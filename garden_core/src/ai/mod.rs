//! Enemy decision policy
//!
//! One uniform roll per enemy turn picks exactly one branch:
//!
//! | roll                          | hp below half | branch       |
//! |-------------------------------|---------------|--------------|
//! | `< heal_roll_threshold`       | yes           | heal-defend  |
//! | `> ultimate_roll_threshold`   | any           | ultimate     |
//! | anything else                 | any           | attack       |
//!
//! A low roll while healthy falls through to the ultimate/attack checks, so
//! the branches cover `[0, 1)` with no gap and no overlap.

use crate::battle::Action;
use crate::config::AiConstants;
use crate::fighter::Fighter;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

/// Branch chosen by the enemy for its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiDecision {
    /// Heal a share of max hp and raise defense
    HealDefend,
    Ultimate,
    Attack,
}

impl AiDecision {
    /// The battle action this branch performs
    pub fn action(&self) -> Action {
        match self {
            AiDecision::HealDefend => Action::Heal,
            AiDecision::Ultimate => Action::Ultimate,
            AiDecision::Attack => Action::Attack,
        }
    }
}

/// Whether the enemy is hurt enough to consider healing
pub fn is_wounded(enemy: &Fighter, constants: &AiConstants) -> bool {
    (enemy.stats.hp() as f64) < enemy.stats.max_hp() as f64 * constants.heal_hp_fraction
}

/// Pick a branch for a given roll in `[0, 1)`
pub fn decide(enemy: &Fighter, roll: f64, constants: &AiConstants) -> AiDecision {
    if roll < constants.heal_roll_threshold && is_wounded(enemy, constants) {
        AiDecision::HealDefend
    } else if roll > constants.ultimate_roll_threshold {
        AiDecision::Ultimate
    } else {
        AiDecision::Attack
    }
}

/// Draw one roll and pick a branch
pub fn choose_action(enemy: &Fighter, constants: &AiConstants, rng: &mut dyn RandomSource) -> AiDecision {
    let roll = rng.next_f64();
    let decision = decide(enemy, roll, constants);
    tracing::debug!(enemy = %enemy.name, roll, ?decision, "enemy chose action");
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fighter::{FighterStats, UltimateMove};
    use crate::rng::SequenceRandom;
    use crate::types::Side;
    use proptest::prelude::*;

    fn make_enemy(hp: u32) -> Fighter {
        let mut enemy = Fighter::new(
            Side::Enemy,
            "Private Potato",
            FighterStats::new(100, 15, 5, 8),
            UltimateMove::new("Starch Slam", 2.0),
        );
        enemy.stats.set_hp(hp);
        enemy
    }

    #[test]
    fn test_low_roll_wounded_heals() {
        let decision = decide(&make_enemy(40), 0.1, &AiConstants::default());
        assert_eq!(decision, AiDecision::HealDefend);
    }

    #[test]
    fn test_low_roll_healthy_attacks() {
        let decision = decide(&make_enemy(60), 0.1, &AiConstants::default());
        assert_eq!(decision, AiDecision::Attack);
    }

    #[test]
    fn test_exactly_half_hp_is_not_wounded() {
        let decision = decide(&make_enemy(50), 0.1, &AiConstants::default());
        assert_eq!(decision, AiDecision::Attack);
    }

    #[test]
    fn test_heal_threshold_boundary() {
        let decision = decide(&make_enemy(10), 0.2, &AiConstants::default());
        assert_eq!(decision, AiDecision::Attack);
    }

    #[test]
    fn test_high_roll_ultimate() {
        assert_eq!(decide(&make_enemy(100), 0.8, &AiConstants::default()), AiDecision::Ultimate);
        assert_eq!(decide(&make_enemy(10), 0.8, &AiConstants::default()), AiDecision::Ultimate);
    }

    #[test]
    fn test_ultimate_threshold_is_exclusive() {
        let decision = decide(&make_enemy(100), 0.75, &AiConstants::default());
        assert_eq!(decision, AiDecision::Attack);
    }

    #[test]
    fn test_choose_action_draws_once() {
        let mut rng = SequenceRandom::new(vec![0.9, 0.1]);
        let decision = choose_action(&make_enemy(100), &AiConstants::default(), &mut rng);
        assert_eq!(decision, AiDecision::Ultimate);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_decision_actions() {
        assert_eq!(AiDecision::HealDefend.action(), Action::Heal);
        assert_eq!(AiDecision::Ultimate.action(), Action::Ultimate);
        assert_eq!(AiDecision::Attack.action(), Action::Attack);
    }

    proptest! {
        #[test]
        fn prop_heal_only_when_wounded(hp in 0u32..=100, roll in 0.0f64..1.0) {
            let enemy = make_enemy(hp);
            let constants = AiConstants::default();
            let decision = decide(&enemy, roll, &constants);
            if decision == AiDecision::HealDefend {
                prop_assert!(roll < 0.2);
                prop_assert!(hp < 50);
            }
            if roll > 0.75 {
                prop_assert_eq!(decision, AiDecision::Ultimate);
            }
        }
    }
}
