//! Core enums shared by the battle and exploration layers

use serde::{Deserialize, Serialize};

/// Which side of a battle a fighter fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    /// The other side
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Kind of timed status effect a fighter can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusType {
    Poison,
    Stun,
    AttackUp,
    DefenseUp,
}

impl StatusType {
    /// Get all status types
    pub fn all() -> &'static [StatusType] {
        &[
            StatusType::Poison,
            StatusType::Stun,
            StatusType::AttackUp,
            StatusType::DefenseUp,
        ]
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            StatusType::Poison => "Poison",
            StatusType::Stun => "Stun",
            StatusType::AttackUp => "Attack Up",
            StatusType::DefenseUp => "Defense Up",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StatusType::Poison => "☠️",
            StatusType::Stun => "💫",
            StatusType::AttackUp => "⚔️",
            StatusType::DefenseUp => "🛡️",
        }
    }

    /// Whether this effect hurts its holder
    pub fn is_debuff(&self) -> bool {
        matches!(self, StatusType::Poison | StatusType::Stun)
    }
}

/// Kind of action behind a transient presentation cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Hit,
    Ultimate,
    Heal,
}

impl ActionKind {
    /// Whether the target of this action took damage
    pub fn is_offensive(&self) -> bool {
        matches!(self, ActionKind::Hit | ActionKind::Ultimate)
    }
}
