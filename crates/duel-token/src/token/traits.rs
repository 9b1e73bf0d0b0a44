//! Token client trait definition.

use crate::address::{Address, TokenId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from token operations
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Insufficient allowance")]
    InsufficientAllowance,

    #[error("Unknown token: {0}")]
    UnknownToken(TokenId),

    #[error("Transfer rejected: {0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Receipt for a completed transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(Uuid);

impl TransferId {
    /// Create a new random transfer ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for fungible-token operations
///
/// Every call either moves exactly `amount` units or fails with no effect.
/// Implementations:
/// - MockTokenClient for tests and the demo service
/// - RpcTokenClient for a token node reachable over JSON-RPC
#[async_trait]
pub trait TokenClient: Send + Sync {
    /// Pull `amount` from `payer` into `recipient`, spending the allowance
    /// `payer` granted to `recipient`
    async fn transfer_from(
        &self,
        token: &TokenId,
        payer: &Address,
        recipient: &Address,
        amount: u64,
    ) -> Result<TransferId, TokenError>;

    /// Push `amount` from `sender` (the escrow) to `recipient`
    async fn transfer(
        &self,
        token: &TokenId,
        sender: &Address,
        recipient: &Address,
        amount: u64,
    ) -> Result<TransferId, TokenError>;

    /// Current balance of `owner`
    async fn balance_of(&self, token: &TokenId, owner: &Address) -> Result<u64, TokenError>;
}
