//! FighterStats - Stat block with clamped hit points

use serde::{Deserialize, Serialize};

/// Stat block of a fighter
///
/// `hp` and `max_hp` are private so every mutation goes through a method
/// that keeps `0 <= hp <= max_hp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterStats {
    hp: u32,
    max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl FighterStats {
    /// Create a stat block at full health
    pub fn new(max_hp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        FighterStats {
            hp: max_hp,
            max_hp,
            attack,
            defense,
            speed,
        }
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Set hp, clamped to `max_hp`
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }

    /// Remove hp, floored at 0. Returns the hp actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_sub(amount);
        before - self.hp
    }

    /// Restore hp, capped at `max_hp`. Returns the hp actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    /// Current hp as a fraction of max hp (0.0 when max hp is 0)
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64
    }
}
