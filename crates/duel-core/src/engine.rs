//! The duel engine: a single serialized ledger over games and credits.
//!
//! Every entry point holds the state lock from its first read to its last
//! write, including the awaited token transfer, so no two calls interleave.
//! Fallible work (validation, credit planning, the external transfer) happens
//! before any ledger mutation; once the transfer has succeeded the remaining
//! steps cannot fail.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::games::{resolve, Move};
use crate::ledger::{CreditLedger, GameLedger, GameRecord};
use crate::protocol::{EngineEvent, EventLog, EventRecord, Funding, GameId, Outcome};
use chrono::Utc;
use duel_token::{Address, TokenClient, TokenId};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result of a successful join
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub game_id: GameId,
    pub outcome: Outcome,
    /// `None` for a draw
    pub winner: Option<Address>,
    pub loser: Option<Address>,
    /// Total credited by this resolution
    pub payout: u64,
}

/// Point-in-time view of where escrowed value sits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerSnapshot {
    pub credits_total: u128,
    pub open_escrow: u128,
    pub deposited: u128,
    pub withdrawn: u128,
}

impl LedgerSnapshot {
    /// Credits plus open stakes equal deposits minus withdrawals
    pub fn is_balanced(&self) -> bool {
        self.credits_total + self.open_escrow + self.withdrawn == self.deposited
    }
}

struct EngineState {
    config: EngineConfig,
    games: GameLedger,
    credits: CreditLedger,
    events: EventLog,
    deposited: u128,
    withdrawn: u128,
}

pub struct DuelEngine {
    token_client: Arc<dyn TokenClient>,
    state: Mutex<EngineState>,
}

impl DuelEngine {
    pub fn new(config: EngineConfig, token_client: Arc<dyn TokenClient>) -> Result<Self, EngineError> {
        config.validate()?;
        info!(
            owner = %config.owner,
            escrow = %config.escrow_address,
            token = %config.accepted_token,
            stake = config.stake,
            tie_policy = ?config.tie_policy,
            "duel engine initialised"
        );
        Ok(Self {
            token_client,
            state: Mutex::new(EngineState {
                config,
                games: GameLedger::new(),
                credits: CreditLedger::new(),
                events: EventLog::new(),
                deposited: 0,
                withdrawn: 0,
            }),
        })
    }

    // Entry points

    /// Open a game funded by a fresh deposit
    pub async fn open_game(&self, player: Address, first_move: Move) -> Result<GameId, EngineError> {
        self.open(player, first_move, Funding::Deposit).await
    }

    /// Open a game funded from the player's credit
    pub async fn open_game_with_credit(
        &self,
        player: Address,
        first_move: Move,
    ) -> Result<GameId, EngineError> {
        self.open(player, first_move, Funding::Credit).await
    }

    pub async fn open(
        &self,
        player: Address,
        first_move: Move,
        funding: Funding,
    ) -> Result<GameId, EngineError> {
        let mut state = self.state.lock().await;
        let stake = state.config.stake;
        let token = state.config.accepted_token;
        let escrow = state.config.escrow_address;

        match funding {
            Funding::Deposit => {
                self.pull_deposit(&token, &player, &escrow, stake).await?;
                state.deposited += stake as u128;
            }
            Funding::Credit => {
                state.credits.debit(player, stake)?;
            }
        }

        let game_id = state.games.open(player, first_move, stake, token, Utc::now());
        state.events.push(EngineEvent::GameOpened {
            game_id,
            first_mover: player,
        });

        info!(%game_id, first_mover = %player, stake, ?funding, "game opened");
        Ok(game_id)
    }

    /// Join an open game with a fresh deposit; resolves it immediately
    pub async fn join_game(
        &self,
        game_id: GameId,
        player: Address,
        second_move: Move,
    ) -> Result<Resolution, EngineError> {
        self.join(game_id, player, second_move, Funding::Deposit).await
    }

    /// Join an open game funded from the player's credit
    pub async fn join_game_with_credit(
        &self,
        game_id: GameId,
        player: Address,
        second_move: Move,
    ) -> Result<Resolution, EngineError> {
        self.join(game_id, player, second_move, Funding::Credit).await
    }

    pub async fn join(
        &self,
        game_id: GameId,
        player: Address,
        second_move: Move,
        funding: Funding,
    ) -> Result<Resolution, EngineError> {
        let mut state = self.state.lock().await;
        let game = state.games.ensure_open(game_id)?.clone();
        let escrow = state.config.escrow_address;

        let outcome = resolve(game.first_move, second_move, state.config.tie_policy);
        let resolution = settle(&game, player, outcome)?;
        let payouts = payouts(&game, player, &resolution);

        let debit = match funding {
            Funding::Credit => Some((player, game.stake)),
            Funding::Deposit => None,
        };
        let plan = state.credits.plan(debit, &payouts)?;

        if funding == Funding::Deposit {
            self.pull_deposit(&game.token, &player, &escrow, game.stake)
                .await?;
            state.deposited += game.stake as u128;
        }

        state
            .games
            .resolve(game_id, player, second_move, outcome, Utc::now())?;
        state.credits.apply(plan);

        let event = match (resolution.winner, resolution.loser) {
            (Some(winner), Some(loser)) => EngineEvent::GameResolved {
                game_id,
                winner,
                loser,
            },
            _ => EngineEvent::GameDrawn {
                game_id,
                first_mover: game.first_mover,
                second_mover: player,
            },
        };
        state.events.push(event);

        info!(
            %game_id,
            %outcome,
            winner = ?resolution.winner,
            payout = resolution.payout,
            ?funding,
            "game resolved"
        );
        Ok(resolution)
    }

    /// Pay out the caller's entire credit balance. Returns the amount sent;
    /// a zero balance is a no-op.
    pub async fn withdraw(&self, player: Address) -> Result<u64, EngineError> {
        let mut state = self.state.lock().await;
        let amount = state.credits.balance(&player);
        if amount == 0 {
            debug!(party = %player, "withdraw with empty balance");
            return Ok(0);
        }

        let token = state.config.accepted_token;
        let escrow = state.config.escrow_address;
        self.token_client
            .transfer(&token, &escrow, &player, amount)
            .await
            .map_err(|e| {
                warn!(party = %player, amount, error = %e, "payout rejected, credit kept");
                EngineError::PayoutFailed(e)
            })?;

        state.credits.debit(player, amount)?;
        state.withdrawn += amount as u128;
        state.events.push(EngineEvent::CreditWithdrawn {
            party: player,
            amount,
        });

        info!(party = %player, amount, "credit withdrawn");
        Ok(amount)
    }

    // Administration

    pub async fn set_accepted_token(&self, caller: Address, token: TokenId) -> Result<(), EngineError> {
        let mut state = self.state.lock().await;
        state.config.ensure_owner(&caller)?;
        state.config.accepted_token = token;
        state
            .events
            .push(EngineEvent::TokenConfigChanged { new_token: token });
        info!(%token, "accepted token changed");
        Ok(())
    }

    pub async fn set_stake_size(&self, caller: Address, stake: u64) -> Result<(), EngineError> {
        let mut state = self.state.lock().await;
        state.config.ensure_owner(&caller)?;
        if stake == 0 {
            return Err(EngineError::InvalidStake);
        }
        state.config.stake = stake;
        state
            .events
            .push(EngineEvent::StakeSizeChanged { new_stake: stake });
        info!(stake, "stake size changed");
        Ok(())
    }

    // Queries

    pub async fn config(&self) -> EngineConfig {
        self.state.lock().await.config.clone()
    }

    pub async fn game(&self, game_id: GameId) -> Option<GameRecord> {
        self.state.lock().await.games.get(game_id).cloned()
    }

    pub async fn open_games(&self) -> Vec<GameRecord> {
        self.state.lock().await.games.open_games().cloned().collect()
    }

    pub async fn credit_of(&self, party: &Address) -> u64 {
        self.state.lock().await.credits.balance(party)
    }

    pub async fn events_since(&self, seq: u64) -> Vec<EventRecord> {
        self.state.lock().await.events.since(seq)
    }

    pub async fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state.lock().await;
        LedgerSnapshot {
            credits_total: state.credits.total(),
            open_escrow: state.games.escrowed_total(),
            deposited: state.deposited,
            withdrawn: state.withdrawn,
        }
    }

    async fn pull_deposit(
        &self,
        token: &TokenId,
        payer: &Address,
        escrow: &Address,
        amount: u64,
    ) -> Result<(), EngineError> {
        self.token_client
            .transfer_from(token, payer, escrow, amount)
            .await
            .map(|transfer_id| {
                debug!(payer = %payer, amount, transfer = %transfer_id.as_uuid(), "deposit received");
            })
            .map_err(|e| {
                warn!(payer = %payer, amount, error = %e, "deposit rejected");
                EngineError::DepositFailed(e)
            })
    }
}

/// Winner, loser and total payout for an outcome
fn settle(game: &GameRecord, second_mover: Address, outcome: Outcome) -> Result<Resolution, EngineError> {
    let pot = game
        .stake
        .checked_mul(2)
        .ok_or(EngineError::BalanceOverflow)?;
    let (winner, loser) = match outcome {
        Outcome::FirstWins => (Some(game.first_mover), Some(second_mover)),
        Outcome::SecondWins => (Some(second_mover), Some(game.first_mover)),
        Outcome::Draw => (None, None),
    };
    Ok(Resolution {
        game_id: game.id,
        outcome,
        winner,
        loser,
        payout: pot,
    })
}

/// Credit entries for a resolution: the whole pot to the winner, or each
/// stake back to its owner on a draw
fn payouts(game: &GameRecord, second_mover: Address, resolution: &Resolution) -> Vec<(Address, u64)> {
    match resolution.winner {
        Some(winner) => vec![(winner, resolution.payout)],
        None => vec![(game.first_mover, game.stake), (second_mover, game.stake)],
    }
}
