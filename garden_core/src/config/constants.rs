//! Battle constants configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable battle constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleConstants {
    #[serde(default)]
    pub damage: DamageConstants,
    #[serde(default)]
    pub healing: HealingConstants,
    #[serde(default)]
    pub poison: PoisonConstants,
    #[serde(default)]
    pub ultimate: UltimateConstants,
    #[serde(default)]
    pub initiative: InitiativeConstants,
    #[serde(default)]
    pub ai: AiConstants,
    #[serde(default)]
    pub timing: TimingConstants,
}

impl BattleConstants {
    /// Reject values that would break the battle rules
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratios = [
            ("healing.player_ratio", self.healing.player_ratio),
            ("healing.enemy_ratio", self.healing.enemy_ratio),
            ("poison.damage_ratio", self.poison.damage_ratio),
            ("ultimate.status_chance", self.ultimate.status_chance),
            ("ai.heal_roll_threshold", self.ai.heal_roll_threshold),
            ("ai.heal_hp_fraction", self.ai.heal_hp_fraction),
            ("ai.ultimate_roll_threshold", self.ai.ultimate_roll_threshold),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.damage.buff_multiplier < 0.0 || self.damage.variance_min < 0.0 || self.damage.variance_spread < 0.0 {
            return Err(ConfigError::ValidationError(
                "damage multipliers must be non-negative".to_string(),
            ));
        }

        let durations = [
            ("healing.defense_up_duration", self.healing.defense_up_duration),
            ("ultimate.poison_duration", self.ultimate.poison_duration),
            ("ultimate.stun_duration", self.ultimate.stun_duration),
        ];
        for (name, value) in durations {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!("{} must be at least 1 turn", name)));
            }
        }

        if self.ai.ultimate_roll_threshold < self.ai.heal_roll_threshold {
            return Err(ConfigError::ValidationError(
                "ai.ultimate_roll_threshold must not be below ai.heal_roll_threshold".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageConstants {
    /// Multiplier applied by attack_up / defense_up
    #[serde(default = "default_buff_multiplier")]
    pub buff_multiplier: f64,
    /// Share of the defender's defense subtracted from the attack
    #[serde(default = "default_defense_factor")]
    pub defense_factor: f64,
    #[serde(default = "default_variance_min")]
    pub variance_min: f64,
    /// Width of the variance window above `variance_min`
    #[serde(default = "default_variance_spread")]
    pub variance_spread: f64,
}

impl Default for DamageConstants {
    fn default() -> Self {
        DamageConstants {
            buff_multiplier: 1.3,
            defense_factor: 0.5,
            variance_min: 0.9,
            variance_spread: 0.2,
        }
    }
}

fn default_buff_multiplier() -> f64 {
    1.3
}
fn default_defense_factor() -> f64 {
    0.5
}
fn default_variance_min() -> f64 {
    0.9
}
fn default_variance_spread() -> f64 {
    0.2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealingConstants {
    #[serde(default = "default_player_ratio")]
    pub player_ratio: f64,
    #[serde(default = "default_enemy_ratio")]
    pub enemy_ratio: f64,
    /// defense_up turns granted alongside a heal
    #[serde(default = "default_defense_up_duration")]
    pub defense_up_duration: u32,
    /// hp restored when walking back into the garden
    #[serde(default = "default_post_battle_restore")]
    pub post_battle_restore: u32,
}

impl Default for HealingConstants {
    fn default() -> Self {
        HealingConstants {
            player_ratio: 0.2,
            enemy_ratio: 0.15,
            defense_up_duration: 2,
            post_battle_restore: 20,
        }
    }
}

fn default_player_ratio() -> f64 {
    0.2
}
fn default_enemy_ratio() -> f64 {
    0.15
}
fn default_defense_up_duration() -> u32 {
    2
}
fn default_post_battle_restore() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoisonConstants {
    /// Share of max hp lost per tick
    #[serde(default = "default_poison_ratio")]
    pub damage_ratio: f64,
    #[serde(default = "default_poison_flat")]
    pub flat_damage: u32,
}

impl Default for PoisonConstants {
    fn default() -> Self {
        PoisonConstants {
            damage_ratio: 0.05,
            flat_damage: 1,
        }
    }
}

impl PoisonConstants {
    /// Poison tick damage for a fighter with `max_hp`
    pub fn tick_damage(&self, max_hp: u32) -> u32 {
        ((max_hp as f64 * self.damage_ratio).floor() as u32).saturating_add(self.flat_damage)
    }
}

fn default_poison_ratio() -> f64 {
    0.05
}
fn default_poison_flat() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UltimateConstants {
    /// Chance that an ultimate also inflicts a status effect
    #[serde(default = "default_status_chance")]
    pub status_chance: f64,
    #[serde(default = "default_poison_duration")]
    pub poison_duration: u32,
    #[serde(default = "default_stun_duration")]
    pub stun_duration: u32,
}

impl Default for UltimateConstants {
    fn default() -> Self {
        UltimateConstants {
            status_chance: 0.5,
            poison_duration: 3,
            stun_duration: 1,
        }
    }
}

fn default_status_chance() -> f64 {
    0.5
}
fn default_poison_duration() -> u32 {
    3
}
fn default_stun_duration() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiativeConstants {
    /// Upper bound of the random bonus added to speed
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

impl Default for InitiativeConstants {
    fn default() -> Self {
        InitiativeConstants { jitter: 5.0 }
    }
}

fn default_jitter() -> f64 {
    5.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConstants {
    /// Rolls below this may pick heal-defend
    #[serde(default = "default_heal_roll")]
    pub heal_roll_threshold: f64,
    /// Heal-defend needs hp below this share of max hp
    #[serde(default = "default_heal_hp_fraction")]
    pub heal_hp_fraction: f64,
    /// Rolls above this pick the ultimate
    #[serde(default = "default_ultimate_roll")]
    pub ultimate_roll_threshold: f64,
}

impl Default for AiConstants {
    fn default() -> Self {
        AiConstants {
            heal_roll_threshold: 0.2,
            heal_hp_fraction: 0.5,
            ultimate_roll_threshold: 0.75,
        }
    }
}

fn default_heal_roll() -> f64 {
    0.2
}
fn default_heal_hp_fraction() -> f64 {
    0.5
}
fn default_ultimate_roll() -> f64 {
    0.75
}

/// Presentation delays, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConstants {
    #[serde(default = "default_ai_think_ms")]
    pub ai_think_ms: u64,
    #[serde(default = "default_stun_skip_ms")]
    pub stun_skip_ms: u64,
    #[serde(default = "default_walk_ms")]
    pub walk_then_talk_ms: u64,
    #[serde(default = "default_action_cue_ms")]
    pub action_cue_ms: u64,
}

impl Default for TimingConstants {
    fn default() -> Self {
        TimingConstants {
            ai_think_ms: 1500,
            stun_skip_ms: 1000,
            walk_then_talk_ms: 500,
            action_cue_ms: 500,
        }
    }
}

impl TimingConstants {
    pub fn ai_think(&self) -> Duration {
        Duration::from_millis(self.ai_think_ms)
    }

    pub fn stun_skip(&self) -> Duration {
        Duration::from_millis(self.stun_skip_ms)
    }

    pub fn walk_then_talk(&self) -> Duration {
        Duration::from_millis(self.walk_then_talk_ms)
    }

    pub fn action_cue(&self) -> Duration {
        Duration::from_millis(self.action_cue_ms)
    }
}

fn default_ai_think_ms() -> u64 {
    1500
}
fn default_stun_skip_ms() -> u64 {
    1000
}
fn default_walk_ms() -> u64 {
    500
}
fn default_action_cue_ms() -> u64 {
    500
}
