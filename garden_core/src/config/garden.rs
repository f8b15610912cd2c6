//! Garden (exploration layer) configuration

use super::ConfigError;
use crate::explore::{Npc, Position};
use serde::{Deserialize, Serialize};

/// Map geometry and NPC roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GardenConfig {
    /// Side length of the square map
    #[serde(default = "default_map_size")]
    pub map_size: f64,
    /// The player cannot walk closer than this to the map edge
    #[serde(default = "default_edge_margin")]
    pub edge_margin: f64,
    #[serde(default = "default_spawn")]
    pub spawn: Position,
    /// NPCs within this distance can be talked to without walking
    #[serde(default = "default_talk_radius")]
    pub talk_radius: f64,
    /// How far from an NPC the player stops after walking over
    #[serde(default = "default_approach_distance")]
    pub approach_distance: f64,
    #[serde(default = "default_npcs")]
    pub npcs: Vec<Npc>,
}

impl Default for GardenConfig {
    fn default() -> Self {
        GardenConfig {
            map_size: default_map_size(),
            edge_margin: default_edge_margin(),
            spawn: default_spawn(),
            talk_radius: default_talk_radius(),
            approach_distance: default_approach_distance(),
            npcs: default_npcs(),
        }
    }
}

impl GardenConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_size <= 2.0 * self.edge_margin {
            return Err(ConfigError::ValidationError(format!(
                "map_size {} leaves no walkable area with edge_margin {}",
                self.map_size, self.edge_margin
            )));
        }
        if self.approach_distance > self.talk_radius {
            return Err(ConfigError::ValidationError(
                "approach_distance must not exceed talk_radius".to_string(),
            ));
        }

        let mut ids: Vec<&str> = self.npcs.iter().map(|n| n.id.as_str()).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConfigError::ValidationError(format!("duplicate npc id '{}'", pair[0])));
        }

        Ok(())
    }
}

fn default_map_size() -> f64 {
    2000.0
}
fn default_edge_margin() -> f64 {
    50.0
}
fn default_spawn() -> Position {
    Position::new(1000.0, 1000.0)
}
fn default_talk_radius() -> f64 {
    150.0
}
fn default_approach_distance() -> f64 {
    80.0
}

fn default_npcs() -> Vec<Npc> {
    vec![
        Npc::new("1", "Elder Broccoli", "🥦", Position::new(800.0, 800.0))
            .with_dialog("Back in my day, we had far more dietary fiber!"),
        Npc::new("2", "Private Potato", "🥔", Position::new(1200.0, 1200.0))
            .with_dialog("I am the guardian of starch! Halt!")
            .aggressive(),
        Npc::new("3", "General Garlic", "🧄", Position::new(600.0, 1400.0))
            .with_dialog("Without enough bite, you shall not pass!")
            .aggressive(),
        Npc::new("4", "Lady Corn", "🌽", Position::new(1500.0, 500.0))
            .with_dialog("We have ears everywhere around here."),
        Npc::new("5", "Ninja Eggplant", "🍆", Position::new(400.0, 1600.0))
            .with_dialog("...")
            .aggressive(),
        Npc::new("6", "Grumpy Pumpkin", "🎃", Position::new(1600.0, 1600.0))
            .with_dialog("Don't make trouble on my patch!")
            .aggressive(),
    ]
}
