//! Service configuration from environment variables.

use duel_core::{EngineConfig, TiePolicy};
use duel_token::{Address, TokenId};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STAKE: u64 = 100;

/// Parties seeded into the mock token ledger when no token node is configured
pub const DEMO_PARTIES: [&str; 3] = ["alice", "bob", "carol"];
pub const DEMO_FUNDS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Runtime settings for the service
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub port: u16,
    pub engine: EngineConfig,
    /// Token node JSON-RPC endpoint; the in-memory mock is used when unset
    pub token_rpc_url: Option<String>,
}

impl ServiceConfig {
    /// Read `PORT`, `DUEL_OWNER`, `DUEL_ESCROW_ADDRESS`, `DUEL_TOKEN`,
    /// `DUEL_STAKE`, `DUEL_TIE_POLICY` and `TOKEN_RPC_URL`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("not a port number: {}", s),
            })?,
            None => DEFAULT_PORT,
        };

        let owner = lookup("DUEL_OWNER")
            .map(|s| parse_address(&s))
            .unwrap_or_else(|| Address::from_label("owner"));
        let escrow_address = lookup("DUEL_ESCROW_ADDRESS")
            .map(|s| parse_address(&s))
            .unwrap_or_else(|| Address::from_label("duel-escrow"));
        let accepted_token = TokenId::new(
            lookup("DUEL_TOKEN")
                .map(|s| parse_address(&s))
                .unwrap_or_else(|| Address::from_label("duel-token")),
        );

        let stake = match lookup("DUEL_STAKE") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid {
                name: "DUEL_STAKE",
                reason: format!("not an amount: {}", s),
            })?,
            None => DEFAULT_STAKE,
        };
        if stake == 0 {
            return Err(ConfigError::Invalid {
                name: "DUEL_STAKE",
                reason: "must be greater than zero".to_string(),
            });
        }

        let tie_policy = match lookup("DUEL_TIE_POLICY") {
            Some(s) => s
                .parse::<TiePolicy>()
                .map_err(|reason| ConfigError::Invalid {
                    name: "DUEL_TIE_POLICY",
                    reason,
                })?,
            None => TiePolicy::default(),
        };

        let token_rpc_url = lookup("TOKEN_RPC_URL").filter(|s| !s.is_empty());

        Ok(Self {
            port,
            engine: EngineConfig::new(owner, escrow_address, accepted_token, stake)
                .with_tie_policy(tie_policy),
            token_rpc_url,
        })
    }
}

/// Hex address, or a label hashed into one
pub fn parse_address(s: &str) -> Address {
    s.parse()
        .unwrap_or_else(|_| Address::from_label(s.trim()))
}
