//! Duel Core Library
//!
//! This crate provides the escrow, resolution and credit-ledger logic for
//! the two-party staked duel: a first mover opens a game with a deposit and
//! a move, a second mover joins with a matching deposit and the game is
//! resolved on the spot, crediting the winner with the pooled stake.

pub mod config;
pub mod engine;
pub mod error;
pub mod games;
pub mod ledger;
pub mod protocol;

pub use config::EngineConfig;
pub use engine::{DuelEngine, LedgerSnapshot, Resolution};
pub use error::EngineError;
pub use games::{resolve, Move, TiePolicy};
pub use ledger::{CreditLedger, GameLedger, GameRecord, GameStatus};
pub use protocol::{EngineEvent, EventLog, EventRecord, Funding, GameId, Outcome};

pub use duel_token::{Address, TokenClient, TokenError, TokenId};
