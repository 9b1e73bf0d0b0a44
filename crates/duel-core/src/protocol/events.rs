//! Public engine events.

use crate::protocol::GameId;
use chrono::{DateTime, Utc};
use duel_token::{Address, TokenId};
use serde::{Deserialize, Serialize};

/// Notification emitted by a successful entry point
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// The first mover's move is not part of the notification
    GameOpened {
        game_id: GameId,
        first_mover: Address,
    },
    GameResolved {
        game_id: GameId,
        winner: Address,
        loser: Address,
    },
    GameDrawn {
        game_id: GameId,
        first_mover: Address,
        second_mover: Address,
    },
    CreditWithdrawn {
        party: Address,
        amount: u64,
    },
    TokenConfigChanged {
        new_token: TokenId,
    },
    StakeSizeChanged {
        new_stake: u64,
    },
}

/// Event with its position in the log
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: u64,
    pub at: DateTime<Utc>,
    pub event: EngineEvent,
}

/// Append-only event log
#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event; returns its sequence number (starting at 1)
    pub fn push(&mut self, event: EngineEvent) -> u64 {
        let seq = self.records.len() as u64 + 1;
        self.records.push(EventRecord {
            seq,
            at: Utc::now(),
            event,
        });
        seq
    }

    /// Records with a sequence number greater than `seq`
    pub fn since(&self, seq: u64) -> Vec<EventRecord> {
        let start = usize::try_from(seq).unwrap_or(usize::MAX);
        self.records.iter().skip(start).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
