//! Duel Token Library
//!
//! The fungible-token collaborator consumed by the duel engine:
//! - Address and token identities
//! - TokenClient trait, MockTokenClient and RpcTokenClient

pub mod address;
pub mod token;

pub use address::{Address, AddressParseError, TokenId};
pub use token::{MockTokenClient, RpcTokenClient, TokenClient, TokenError, TransferId};
