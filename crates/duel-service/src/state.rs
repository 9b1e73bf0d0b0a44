//! Application state management.

use crate::config::{ServiceConfig, DEMO_FUNDS, DEMO_PARTIES};
use duel_core::{DuelEngine, EngineConfig, EngineError};
use duel_token::{Address, MockTokenClient, RpcTokenClient, TokenClient};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    engine: Arc<DuelEngine>,
    /// Same client the engine uses, for wallet balance queries
    token_client: Arc<dyn TokenClient>,
}

impl AppState {
    /// Build the engine over the configured token backend
    pub fn from_config(config: &ServiceConfig) -> Result<Self, EngineError> {
        match &config.token_rpc_url {
            Some(url) => {
                tracing::info!("Token RPC enabled: {}", url);
                Self::with_token_client(config.engine.clone(), Arc::new(RpcTokenClient::new(url)))
            }
            None => {
                tracing::info!("Token RPC not configured (set TOKEN_RPC_URL to enable), using in-memory ledger");
                let mock = MockTokenClient::new();
                seed_demo_parties(&mock, &config.engine);
                Self::with_token_client(config.engine.clone(), Arc::new(mock))
            }
        }
    }

    pub fn with_token_client(
        config: EngineConfig,
        token_client: Arc<dyn TokenClient>,
    ) -> Result<Self, EngineError> {
        let engine = DuelEngine::new(config, token_client.clone())?;
        Ok(Self {
            engine: Arc::new(engine),
            token_client,
        })
    }

    pub fn engine(&self) -> &DuelEngine {
        &self.engine
    }

    pub fn token_client(&self) -> &dyn TokenClient {
        self.token_client.as_ref()
    }
}

/// Mint demo funds and approve the escrow to pull them
pub fn seed_demo_parties(mock: &MockTokenClient, config: &EngineConfig) {
    for label in DEMO_PARTIES {
        let party = Address::from_label(label);
        mock.mint(config.accepted_token, party, DEMO_FUNDS);
        mock.approve(config.accepted_token, party, config.escrow_address, DEMO_FUNDS);
        tracing::info!("Seeded demo party {} ({})", label, party);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_token::TokenId;

    #[tokio::test]
    async fn test_demo_parties_can_play() {
        let config = EngineConfig::new(
            Address::from_label("owner"),
            Address::from_label("escrow"),
            TokenId::new(Address::from_label("token")),
            100,
        );
        let mock = MockTokenClient::new();
        seed_demo_parties(&mock, &config);
        let state = AppState::with_token_client(config.clone(), Arc::new(mock.clone())).unwrap();

        let alice = Address::from_label("alice");
        state
            .engine()
            .open_game(alice, duel_core::Move::Rock)
            .await
            .unwrap();

        let balance = state
            .token_client()
            .balance_of(&config.accepted_token, &alice)
            .await
            .unwrap();
        assert_eq!(balance, DEMO_FUNDS - 100);
    }
}
