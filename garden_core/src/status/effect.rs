//! StatusEffect - A timed modifier on a fighter

use crate::types::StatusType;
use serde::{Deserialize, Serialize};

/// An active status effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub effect_type: StatusType,
    /// Turns remaining, at least 1 while the effect is held
    pub duration: u32,
    /// Optional magnitude. For poison this overrides the per-tick damage.
    #[serde(default)]
    pub value: Option<u32>,
}

impl StatusEffect {
    pub fn new(effect_type: StatusType, duration: u32, value: Option<u32>) -> Self {
        StatusEffect {
            effect_type,
            duration,
            value,
        }
    }

    pub fn name(&self) -> &'static str {
        self.effect_type.name()
    }

    pub fn icon(&self) -> &'static str {
        self.effect_type.icon()
    }

    /// Whether the next end-of-turn tick removes this effect
    pub fn is_expiring(&self) -> bool {
        self.duration <= 1
    }

    /// Extend to the longer of the current and the new duration
    pub fn refresh(&mut self, duration: u32) {
        self.duration = self.duration.max(duration);
    }
}
