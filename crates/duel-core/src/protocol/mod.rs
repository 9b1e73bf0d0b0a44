//! Protocol types and events.

mod events;
mod types;

pub use events::{EngineEvent, EventLog, EventRecord};
pub use types::{Funding, GameId, Outcome};
