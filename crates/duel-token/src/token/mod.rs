//! Fungible-token client abstraction.

mod mock;
mod rpc;
mod traits;

pub use mock::MockTokenClient;
pub use rpc::RpcTokenClient;
pub use traits::{TokenClient, TokenError, TransferId};
