//! Rejected battle invocations

use super::BattlePhase;
use thiserror::Error;

/// A call that does not fit the current battle state
///
/// A rejected call leaves the session untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleError {
    #[error("the battle is already over ({0:?})")]
    BattleOver(BattlePhase),
    #[error("it is not the player's turn")]
    NotPlayersTurn,
    #[error("waiting for the player to choose an action")]
    AwaitingPlayerInput,
    #[error("the player is stunned and cannot act")]
    PlayerStunned,
}
