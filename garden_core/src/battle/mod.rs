//! Turn-based battle resolution

mod error;
mod session;
mod state;

pub use error::BattleError;
pub use session::{BattleSession, BattleView};
pub use state::{Action, BattlePhase, LastAction, ResolvedAction, TickSummary, TurnReport, TurnState};
