//! Engine error taxonomy.

use crate::protocol::GameId;
use duel_token::{Address, TokenError};
use thiserror::Error;

/// Errors returned by engine entry points.
///
/// Any error leaves the ledger exactly as it was before the call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Insufficient credit: balance {balance}, required {required}")]
    InsufficientCredit { balance: u64, required: u64 },

    #[error("Deposit failed: {0}")]
    DepositFailed(#[source] TokenError),

    #[error("Payout failed: {0}")]
    PayoutFailed(#[source] TokenError),

    #[error("Game {0} is unknown or already resolved")]
    UnknownOrResolvedGame(GameId),

    #[error("Caller {0} is not the engine owner")]
    Unauthorized(Address),

    #[error("Stake must be greater than zero")]
    InvalidStake,

    #[error("Credit balance overflow")]
    BalanceOverflow,
}
