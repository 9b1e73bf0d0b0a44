//! Mock token client for testing.

use super::traits::{TokenClient, TokenError, TransferId};
use crate::address::{Address, TokenId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockLedger {
    tokens: HashSet<TokenId>,
    balances: HashMap<(TokenId, Address), u64>,
    /// (token, owner, spender) -> allowance
    allowances: HashMap<(TokenId, Address, Address), u64>,
    fail_next_in: bool,
    fail_next_out: bool,
}

impl MockLedger {
    fn ensure_known(&self, token: &TokenId) -> Result<(), TokenError> {
        if self.tokens.contains(token) {
            Ok(())
        } else {
            Err(TokenError::UnknownToken(*token))
        }
    }

    fn balance(&self, token: &TokenId, owner: &Address) -> u64 {
        self.balances.get(&(*token, *owner)).copied().unwrap_or(0)
    }

    fn move_funds(
        &mut self,
        token: &TokenId,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), TokenError> {
        let from_balance = self.balance(token, from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance);
        }
        let to_balance = self.balance(token, to);
        if from != to {
            let credited = to_balance
                .checked_add(amount)
                .ok_or_else(|| TokenError::Rejected("balance overflow".to_string()))?;
            self.balances.insert((*token, *from), from_balance - amount);
            self.balances.insert((*token, *to), credited);
        }
        Ok(())
    }
}

/// In-memory token ledger for testing
#[derive(Clone, Default)]
pub struct MockTokenClient {
    ledger: Arc<Mutex<MockLedger>>,
}

impl MockTokenClient {
    /// Create an empty mock ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a token known to the ledger without minting
    pub fn register_token(&self, token: TokenId) {
        self.ledger.lock().unwrap().tokens.insert(token);
    }

    /// Mint `amount` of `token` to `owner`
    pub fn mint(&self, token: TokenId, owner: Address, amount: u64) {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.tokens.insert(token);
        let entry = ledger.balances.entry((token, owner)).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Set the allowance `owner` grants to `spender`
    pub fn approve(&self, token: TokenId, owner: Address, spender: Address, amount: u64) {
        self.ledger
            .lock()
            .unwrap()
            .allowances
            .insert((token, owner, spender), amount);
    }

    /// Get current allowance
    pub fn allowance(&self, token: TokenId, owner: Address, spender: Address) -> u64 {
        self.ledger
            .lock()
            .unwrap()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(0)
    }

    /// Get current balance
    pub fn balance(&self, token: TokenId, owner: Address) -> u64 {
        self.ledger.lock().unwrap().balance(&token, &owner)
    }

    /// Sum of all balances of `token`
    pub fn total_supply(&self, token: TokenId) -> u64 {
        self.ledger
            .lock()
            .unwrap()
            .balances
            .iter()
            .filter(|((t, _), _)| *t == token)
            .map(|(_, amount)| *amount)
            .sum()
    }

    /// Reject the next `transfer_from` call
    pub fn fail_next_transfer_in(&self) {
        self.ledger.lock().unwrap().fail_next_in = true;
    }

    /// Reject the next `transfer` call
    pub fn fail_next_transfer_out(&self) {
        self.ledger.lock().unwrap().fail_next_out = true;
    }
}

#[async_trait]
impl TokenClient for MockTokenClient {
    async fn transfer_from(
        &self,
        token: &TokenId,
        payer: &Address,
        recipient: &Address,
        amount: u64,
    ) -> Result<TransferId, TokenError> {
        let mut ledger = self.ledger.lock().unwrap();
        if std::mem::take(&mut ledger.fail_next_in) {
            return Err(TokenError::Rejected("injected transfer_from failure".to_string()));
        }
        ledger.ensure_known(token)?;

        let key = (*token, *payer, *recipient);
        let allowance = ledger.allowances.get(&key).copied().unwrap_or(0);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance);
        }

        ledger.move_funds(token, payer, recipient, amount)?;
        ledger.allowances.insert(key, allowance - amount);

        Ok(TransferId::new())
    }

    async fn transfer(
        &self,
        token: &TokenId,
        sender: &Address,
        recipient: &Address,
        amount: u64,
    ) -> Result<TransferId, TokenError> {
        let mut ledger = self.ledger.lock().unwrap();
        if std::mem::take(&mut ledger.fail_next_out) {
            return Err(TokenError::Rejected("injected transfer failure".to_string()));
        }
        ledger.ensure_known(token)?;
        ledger.move_funds(token, sender, recipient, amount)?;

        Ok(TransferId::new())
    }

    async fn balance_of(&self, token: &TokenId, owner: &Address) -> Result<u64, TokenError> {
        let ledger = self.ledger.lock().unwrap();
        ledger.ensure_known(token)?;
        Ok(ledger.balance(token, owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (MockTokenClient, TokenId, Address, Address) {
        let client = MockTokenClient::new();
        let token = TokenId::new(Address::from_label("token"));
        let payer = Address::from_label("payer");
        let escrow = Address::from_label("escrow");
        client.mint(token, payer, 1000);
        (client, token, payer, escrow)
    }

    #[tokio::test]
    async fn test_transfer_from_spends_allowance() {
        let (client, token, payer, escrow) = setup();
        client.approve(token, payer, escrow, 300);

        client.transfer_from(&token, &payer, &escrow, 200).await.unwrap();

        assert_eq!(client.balance(token, payer), 800);
        assert_eq!(client.balance(token, escrow), 200);
        assert_eq!(client.allowance(token, payer, escrow), 100);
    }

    #[tokio::test]
    async fn test_transfer_from_without_allowance_fails() {
        let (client, token, payer, escrow) = setup();

        let result = client.transfer_from(&token, &payer, &escrow, 1).await;
        assert!(matches!(result, Err(TokenError::InsufficientAllowance)));
        assert_eq!(client.balance(token, payer), 1000);
    }

    #[tokio::test]
    async fn test_transfer_from_insufficient_balance_keeps_allowance() {
        let (client, token, payer, escrow) = setup();
        client.approve(token, payer, escrow, 5000);

        let result = client.transfer_from(&token, &payer, &escrow, 2000).await;
        assert!(matches!(result, Err(TokenError::InsufficientBalance)));
        assert_eq!(client.allowance(token, payer, escrow), 5000);
        assert_eq!(client.balance(token, payer), 1000);
    }

    #[tokio::test]
    async fn test_transfer_out() {
        let (client, token, payer, escrow) = setup();
        client.approve(token, payer, escrow, 500);
        client.transfer_from(&token, &payer, &escrow, 500).await.unwrap();

        let winner = Address::from_label("winner");
        client.transfer(&token, &escrow, &winner, 400).await.unwrap();

        assert_eq!(client.balance(token, escrow), 100);
        assert_eq!(client.balance(token, winner), 400);
        assert_eq!(client.total_supply(token), 1000);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let client = MockTokenClient::new();
        let token = TokenId::new(Address::from_label("nothing"));
        let result = client.balance_of(&token, &Address::from_label("x")).await;
        assert!(matches!(result, Err(TokenError::UnknownToken(_))));
    }

    #[tokio::test]
    async fn test_injected_failures_are_one_shot() {
        let (client, token, payer, escrow) = setup();
        client.approve(token, payer, escrow, 1000);

        client.fail_next_transfer_in();
        assert!(client.transfer_from(&token, &payer, &escrow, 10).await.is_err());
        assert!(client.transfer_from(&token, &payer, &escrow, 10).await.is_ok());

        client.fail_next_transfer_out();
        assert!(client.transfer(&token, &escrow, &payer, 10).await.is_err());
        assert!(client.transfer(&token, &escrow, &payer, 10).await.is_ok());
        assert_eq!(client.balance(token, payer), 1000);
    }
}
