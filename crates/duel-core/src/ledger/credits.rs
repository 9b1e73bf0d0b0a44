//! Per-party balances of unclaimed winnings.

use crate::error::EngineError;
use duel_token::Address;
use std::collections::HashMap;

/// Pre-validated set of balance changes.
///
/// Built by [`CreditLedger::plan`] against the current balances and applied
/// with [`CreditLedger::apply`]; applying cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditPlan {
    new_balances: Vec<(Address, u64)>,
}

#[derive(Debug, Default)]
pub struct CreditLedger {
    balances: HashMap<Address, u64>,
}

impl CreditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, party: &Address) -> u64 {
        self.balances.get(party).copied().unwrap_or(0)
    }

    /// Add `amount` to `party`
    pub fn credit(&mut self, party: Address, amount: u64) -> Result<u64, EngineError> {
        let plan = self.plan(None, &[(party, amount)])?;
        self.apply(plan);
        Ok(self.balance(&party))
    }

    /// Subtract `amount` from `party`; fails without effect if the balance is short
    pub fn debit(&mut self, party: Address, amount: u64) -> Result<u64, EngineError> {
        let plan = self.plan(Some((party, amount)), &[])?;
        self.apply(plan);
        Ok(self.balance(&party))
    }

    /// Validate a debit followed by credits, without mutating anything
    pub fn plan(
        &self,
        debit: Option<(Address, u64)>,
        credits: &[(Address, u64)],
    ) -> Result<CreditPlan, EngineError> {
        let mut new_balances: Vec<(Address, u64)> = Vec::new();

        if let Some((party, amount)) = debit {
            let balance = self.balance(&party);
            let remaining =
                balance
                    .checked_sub(amount)
                    .ok_or(EngineError::InsufficientCredit {
                        balance,
                        required: amount,
                    })?;
            new_balances.push((party, remaining));
        }

        for (party, amount) in credits {
            match new_balances.iter_mut().find(|(p, _)| p == party) {
                Some((_, balance)) => {
                    *balance = balance
                        .checked_add(*amount)
                        .ok_or(EngineError::BalanceOverflow)?;
                }
                None => {
                    let balance = self
                        .balance(party)
                        .checked_add(*amount)
                        .ok_or(EngineError::BalanceOverflow)?;
                    new_balances.push((*party, balance));
                }
            }
        }

        Ok(CreditPlan { new_balances })
    }

    pub fn apply(&mut self, plan: CreditPlan) {
        for (party, balance) in plan.new_balances {
            if balance == 0 {
                self.balances.remove(&party);
            } else {
                self.balances.insert(party, balance);
            }
        }
    }

    /// Sum of all balances
    pub fn total(&self) -> u128 {
        self.balances.values().map(|b| *b as u128).sum()
    }

    /// Parties with a non-zero balance
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &u64)> {
        self.balances.iter()
    }
}
