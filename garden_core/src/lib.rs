//! garden_core - Turn-based vegetable battles in a garden
//!
//! This library provides:
//! - Fighter: A vegetable warrior with stats, an ultimate move and status effects
//! - Status effects: Refresh-not-stack application and per-turn decay
//! - Damage/heal calculation over an injectable random source
//! - BattleSession: The turn resolution state machine
//! - Enemy AI: One roll per turn picks heal-defend, ultimate or attack
//! - GameSession: Menu, garden exploration, NPC encounters and battles
//! - Fighter generation through an LLM, with a fixed fallback fighter

pub mod ai;
pub mod battle;
pub mod config;
pub mod damage;
pub mod explore;
pub mod fighter;
pub mod game;
pub mod generate;
pub mod log;
pub mod prelude;
pub mod rng;
pub mod schedule;
pub mod status;
pub mod types;

// Re-export core types for convenience
pub use ai::AiDecision;
pub use battle::{Action, BattleError, BattlePhase, BattleSession, ResolvedAction, TurnReport, TurnState};
pub use config::{BattleConstants, ConfigError, GardenConfig};
pub use explore::{Garden, Interaction, Npc, Position};
pub use fighter::{Fighter, FighterStats, UltimateMove};
pub use game::{GameError, GameEvent, GameSession, Screen};
pub use generate::{generate_fighter, random_vegetable_name, FighterGenerator, GenerationError};
pub use log::{BattleLog, BattleLogEntry, LogCategory};
pub use rng::{RandomSource, RngSource, SequenceRandom};
pub use status::{apply_status_effect, process_turn_end_effects, StatusEffect};
pub use types::{ActionKind, Side, StatusType};
