//! Game records keyed by sequential identifier.

use crate::error::EngineError;
use crate::games::Move;
use crate::protocol::{GameId, Outcome};
use chrono::{DateTime, Utc};
use duel_token::{Address, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameStatus {
    Open,
    Resolved { winner: Address, loser: Address },
    Drawn,
}

/// A single game
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub first_mover: Address,
    pub first_move: Move,
    /// Stake in force when the game was opened; the joiner matches this amount
    pub stake: u64,
    pub token: TokenId,
    pub status: GameStatus,
    pub opened_at: DateTime<Utc>,
    pub second_mover: Option<Address>,
    pub second_move: Option<Move>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl GameRecord {
    pub fn is_open(&self) -> bool {
        self.status == GameStatus::Open
    }
}

/// Owner of all game records. Records are never removed.
#[derive(Debug)]
pub struct GameLedger {
    next_id: GameId,
    games: BTreeMap<GameId, GameRecord>,
}

impl GameLedger {
    pub fn new() -> Self {
        Self {
            next_id: GameId::FIRST,
            games: BTreeMap::new(),
        }
    }

    /// Identifier the next successful `open` will receive
    pub fn peek_next_id(&self) -> GameId {
        self.next_id
    }

    /// Store a new open game and allocate its identifier
    pub fn open(
        &mut self,
        first_mover: Address,
        first_move: Move,
        stake: u64,
        token: TokenId,
        now: DateTime<Utc>,
    ) -> GameId {
        let id = self.next_id;
        self.next_id = id.next();
        self.games.insert(
            id,
            GameRecord {
                id,
                first_mover,
                first_move,
                stake,
                token,
                status: GameStatus::Open,
                opened_at: now,
                second_mover: None,
                second_move: None,
                resolved_at: None,
            },
        );
        id
    }

    pub fn get(&self, id: GameId) -> Option<&GameRecord> {
        self.games.get(&id)
    }

    /// The game, if it exists and is still open
    pub fn ensure_open(&self, id: GameId) -> Result<&GameRecord, EngineError> {
        self.games
            .get(&id)
            .filter(|g| g.is_open())
            .ok_or(EngineError::UnknownOrResolvedGame(id))
    }

    /// Transition an open game to its terminal state
    pub fn resolve(
        &mut self,
        id: GameId,
        second_mover: Address,
        second_move: Move,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> Result<&GameRecord, EngineError> {
        let game = self
            .games
            .get_mut(&id)
            .filter(|g| g.is_open())
            .ok_or(EngineError::UnknownOrResolvedGame(id))?;

        game.status = match outcome {
            Outcome::FirstWins => GameStatus::Resolved {
                winner: game.first_mover,
                loser: second_mover,
            },
            Outcome::SecondWins => GameStatus::Resolved {
                winner: second_mover,
                loser: game.first_mover,
            },
            Outcome::Draw => GameStatus::Drawn,
        };
        game.second_mover = Some(second_mover);
        game.second_move = Some(second_move);
        game.resolved_at = Some(now);

        Ok(&*game)
    }

    pub fn open_games(&self) -> impl Iterator<Item = &GameRecord> {
        self.games.values().filter(|g| g.is_open())
    }

    /// Tokens held for open games (one stake each)
    pub fn escrowed_total(&self) -> u128 {
        self.open_games().map(|g| g.stake as u128).sum()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for GameLedger {
    fn default() -> Self {
        Self::new()
    }
}
