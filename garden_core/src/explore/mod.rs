//! Garden exploration: player movement and NPC encounters

use crate::config::GardenConfig;
use serde::{Deserialize, Serialize};

/// A point on the garden map
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A garden resident the player can talk to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub position: Position,
    #[serde(default)]
    pub dialog: String,
    /// Aggressive NPCs are drawn as a threat on the map
    #[serde(default)]
    pub aggressive: bool,
}

impl Npc {
    pub fn new(id: impl Into<String>, name: impl Into<String>, emoji: impl Into<String>, position: Position) -> Self {
        Npc {
            id: id.into(),
            name: name.into(),
            emoji: emoji.into(),
            position,
            dialog: String::new(),
            aggressive: false,
        }
    }

    pub fn with_dialog(mut self, dialog: impl Into<String>) -> Self {
        self.dialog = dialog.into();
        self
    }

    pub fn aggressive(mut self) -> Self {
        self.aggressive = true;
        self
    }
}

/// Outcome of asking to talk to an NPC
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// Close enough, the dialog opens now
    Immediate,
    /// The player walked over; the dialog opens once the walk finishes
    WalkThenTalk { destination: Position },
}

/// Map bounds, NPC roster and the player's position
#[derive(Debug, Clone)]
pub struct Garden {
    config: GardenConfig,
    player: Position,
}

impl Garden {
    pub fn new(config: GardenConfig) -> Self {
        let spawn = config.spawn;
        let mut garden = Garden { config, player: spawn };
        garden.player = garden.clamp(spawn);
        garden
    }

    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    pub fn player_position(&self) -> Position {
        self.player
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.config.npcs
    }

    pub fn npc(&self, id: &str) -> Option<&Npc> {
        self.config.npcs.iter().find(|n| n.id == id)
    }

    /// Clamp a point into the walkable area
    pub fn clamp(&self, target: Position) -> Position {
        let min = self.config.edge_margin;
        let max = self.config.map_size - self.config.edge_margin;
        Position::new(target.x.clamp(min, max), target.y.clamp(min, max))
    }

    /// Move the player toward a target, stopping at the edge margin
    pub fn move_player(&mut self, target: Position) -> Position {
        self.player = self.clamp(target);
        self.player
    }

    /// Move the player by an offset
    pub fn step_player(&mut self, dx: f64, dy: f64) -> Position {
        let target = Position::new(self.player.x + dx, self.player.y + dy);
        self.move_player(target)
    }

    /// Send the player back to the spawn point
    pub fn respawn(&mut self) {
        self.player = self.clamp(self.config.spawn);
    }

    /// Start talking to an NPC, walking over first if it is out of reach
    ///
    /// Returns None for an unknown NPC id.
    pub fn interact(&mut self, npc_id: &str) -> Option<Interaction> {
        let npc_position = self.npc(npc_id)?.position;
        let distance = self.player.distance(&npc_position);
        if distance <= self.config.talk_radius {
            return Some(Interaction::Immediate);
        }

        // Stop on the NPC->player line, approach_distance short of the NPC
        let angle = (self.player.y - npc_position.y).atan2(self.player.x - npc_position.x);
        let approach = self.config.approach_distance;
        let destination = self.move_player(Position::new(
            npc_position.x + approach * angle.cos(),
            npc_position.y + approach * angle.sin(),
        ));

        tracing::debug!(npc = npc_id, distance, ?destination, "walking to npc");
        Some(Interaction::WalkThenTalk { destination })
    }

    /// The closest NPC and its distance from the player
    pub fn nearest_npc(&self) -> Option<(&Npc, f64)> {
        self.config
            .npcs
            .iter()
            .map(|npc| (npc, self.player.distance(&npc.position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
