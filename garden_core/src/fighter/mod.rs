//! Fighter - A vegetable warrior taking part in battles

mod stats;

pub use stats::FighterStats;

use crate::status::StatusEffect;
use crate::types::{Side, StatusType};
use serde::{Deserialize, Serialize};

/// A fighter's signature move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UltimateMove {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Damage multiplier, at least 1.0
    pub multiplier: f64,
}

impl UltimateMove {
    pub fn new(name: impl Into<String>, multiplier: f64) -> Self {
        UltimateMove {
            name: name.into(),
            description: String::new(),
            multiplier: multiplier.max(1.0),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A combat participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub side: Side,
    pub name: String,
    pub description: String,
    /// Map sprite
    pub emoji: String,
    /// English keyword for image lookups
    pub image_keyword: String,
    pub nutritional_highlight: String,
    pub stats: FighterStats,
    pub ultimate: UltimateMove,
    /// At most one effect per type
    status_effects: Vec<StatusEffect>,
}

impl Fighter {
    /// Create a fighter with no status effects and empty flavor text
    pub fn new(side: Side, name: impl Into<String>, stats: FighterStats, ultimate: UltimateMove) -> Self {
        Fighter {
            side,
            name: name.into(),
            description: String::new(),
            emoji: "🥬".to_string(),
            image_keyword: "vegetable".to_string(),
            nutritional_highlight: String::new(),
            stats,
            ultimate,
            status_effects: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn with_image_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.image_keyword = keyword.into();
        self
    }

    pub fn with_highlight(mut self, highlight: impl Into<String>) -> Self {
        self.nutritional_highlight = highlight.into();
        self
    }

    pub fn is_alive(&self) -> bool {
        self.stats.hp() > 0
    }

    pub fn status_effects(&self) -> &[StatusEffect] {
        &self.status_effects
    }

    /// Get the active effect of a type, if any
    pub fn status(&self, effect_type: StatusType) -> Option<&StatusEffect> {
        self.status_effects.iter().find(|e| e.effect_type == effect_type)
    }

    pub fn has_status(&self, effect_type: StatusType) -> bool {
        self.status(effect_type).is_some()
    }

    pub fn is_stunned(&self) -> bool {
        self.has_status(StatusType::Stun)
    }

    pub fn clear_status_effects(&mut self) {
        self.status_effects.clear();
    }

    pub(crate) fn status_effects_mut(&mut self) -> &mut Vec<StatusEffect> {
        &mut self.status_effects
    }

    /// Reset after leaving a battle: partial heal and no lingering effects
    pub fn restore_after_battle(&mut self, amount: u32) {
        self.stats.heal(amount);
        self.clear_status_effects();
    }
}
