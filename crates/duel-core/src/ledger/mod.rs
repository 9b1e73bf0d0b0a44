//! Game and credit ledgers.

mod credits;
mod games;

pub use credits::{CreditLedger, CreditPlan};
pub use games::{GameLedger, GameRecord, GameStatus};
