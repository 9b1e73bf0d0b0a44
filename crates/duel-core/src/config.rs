//! Engine configuration.

use crate::error::EngineError;
use crate::games::TiePolicy;
use duel_token::{Address, TokenId};
use serde::{Deserialize, Serialize};

/// Process-wide settings read by every entry point.
///
/// `accepted_token` and `stake` can be changed by `owner` at runtime; a
/// change applies to games opened afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Only this address may change the token or the stake
    pub owner: Address,
    /// Address that holds escrowed deposits on the token ledger
    pub escrow_address: Address,
    pub accepted_token: TokenId,
    /// Amount each party deposits per game
    pub stake: u64,
    #[serde(default)]
    pub tie_policy: TiePolicy,
}

impl EngineConfig {
    pub fn new(owner: Address, escrow_address: Address, accepted_token: TokenId, stake: u64) -> Self {
        Self {
            owner,
            escrow_address,
            accepted_token,
            stake,
            tie_policy: TiePolicy::default(),
        }
    }

    pub fn with_tie_policy(mut self, tie_policy: TiePolicy) -> Self {
        self.tie_policy = tie_policy;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.stake == 0 {
            return Err(EngineError::InvalidStake);
        }
        Ok(())
    }

    pub(crate) fn ensure_owner(&self, caller: &Address) -> Result<(), EngineError> {
        if *caller == self.owner {
            Ok(())
        } else {
            Err(EngineError::Unauthorized(*caller))
        }
    }
}
