//! Battle phase, turn bookkeeping and turn reports

use crate::types::{ActionKind, Side, StatusType};
use serde::{Deserialize, Serialize};

/// Where the battle state machine is
///
/// `Victory` and `Defeat` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    PlayerTurn,
    EnemyTurn,
    /// Enemy hp reached 0
    Victory,
    /// Player hp reached 0
    Defeat,
}

impl BattlePhase {
    /// The phase in which `side` acts
    pub fn turn_of(side: Side) -> BattlePhase {
        match side {
            Side::Player => BattlePhase::PlayerTurn,
            Side::Enemy => BattlePhase::EnemyTurn,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BattlePhase::Victory | BattlePhase::Defeat)
    }

    /// Side holding the turn, None once the battle is over
    pub fn active_side(&self) -> Option<Side> {
        match self {
            BattlePhase::PlayerTurn => Some(Side::Player),
            BattlePhase::EnemyTurn => Some(Side::Enemy),
            BattlePhase::Victory | BattlePhase::Defeat => None,
        }
    }
}

/// An action a fighter can take on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Attack,
    Ultimate,
    /// Heal a share of max hp and gain defense_up
    Heal,
}

impl Action {
    pub fn all() -> &'static [Action] {
        &[Action::Attack, Action::Ultimate, Action::Heal]
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Attack => ActionKind::Hit,
            Action::Ultimate => ActionKind::Ultimate,
            Action::Heal => ActionKind::Heal,
        }
    }
}

/// Transient cue describing the most recent action, for presentation only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAction {
    pub source: Side,
    pub target: Side,
    pub kind: ActionKind,
}

/// Turn counter and the latest action cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnState {
    /// Starts at 1, +1 per completed turn by either side
    pub number: u32,
    pub last_action: Option<LastAction>,
}

impl Default for TurnState {
    fn default() -> Self {
        TurnState {
            number: 1,
            last_action: None,
        }
    }
}

/// What the acting side did on a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolvedAction {
    Attack { damage: u32 },
    Ultimate { damage: u32, inflicted: Option<StatusType> },
    Heal { amount: u32 },
    /// Stunned, no action taken
    Stunned,
}

/// End-of-turn tick applied to the acting side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    pub poison_damage: u32,
    pub expired: Vec<StatusType>,
}

/// Outcome of one resolved turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Turn number that was resolved
    pub turn: u32,
    pub actor: Side,
    pub action: ResolvedAction,
    /// None when the action itself ended the battle
    pub tick: Option<TickSummary>,
    /// Phase after the turn
    pub phase: BattlePhase,
}

impl TurnReport {
    /// Whether this turn ended the battle
    pub fn ended_battle(&self) -> bool {
        self.phase.is_terminal()
    }
}
