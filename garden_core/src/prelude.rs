//! Prelude module for convenient imports
//!
//! ```rust
//! use garden_core::prelude::*;
//! ```

// Core types
pub use crate::fighter::{Fighter, FighterStats, UltimateMove};
pub use crate::types::{ActionKind, Side, StatusType};
pub use crate::status::StatusEffect;

// Battle
pub use crate::battle::{Action, BattleError, BattlePhase, BattleSession, ResolvedAction, TurnReport};
pub use crate::log::{BattleLog, LogCategory};
pub use crate::rng::{RandomSource, RngSource};

// Game flow
pub use crate::explore::{Interaction, Position};
pub use crate::game::{GameError, GameEvent, GameSession, Screen};

// Generation
pub use crate::generate::{generate_fighter, FighterGenerator, LlmFighterGenerator, OfflineGenerator};

// Config
pub use crate::config::{BattleConstants, GardenConfig};
