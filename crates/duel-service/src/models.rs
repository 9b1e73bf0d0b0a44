//! Request and response bodies.

use duel_core::{EngineConfig, Funding, GameId, GameRecord, GameStatus, Move, TiePolicy};
use duel_token::{Address, TokenId};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct PlayRequest {
    /// Move symbol or name: "A"/"rock", "B"/"paper", "C"/"scissors"
    #[serde(rename = "move")]
    pub choice: String,
    #[serde(default)]
    pub funding: Funding,
}

#[derive(Serialize, Deserialize)]
pub struct OpenGameResponse {
    pub game_id: GameId,
    pub stake: u64,
}

#[derive(Deserialize)]
pub struct SetTokenRequest {
    pub token: String,
}

#[derive(Deserialize)]
pub struct SetStakeRequest {
    pub stake: u64,
}

#[derive(Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub since: u64,
}

#[derive(Serialize, Deserialize)]
pub struct CreditResponse {
    pub party: Address,
    pub balance: u64,
}

#[derive(Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub party: Address,
    pub amount: u64,
}

#[derive(Serialize, Deserialize)]
pub struct WalletResponse {
    pub party: Address,
    pub token: TokenId,
    pub balance: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ConfigResponse {
    pub owner: Address,
    pub escrow_address: Address,
    pub accepted_token: TokenId,
    pub stake: u64,
    pub tie_policy: TiePolicy,
}

impl From<EngineConfig> for ConfigResponse {
    fn from(c: EngineConfig) -> Self {
        Self {
            owner: c.owner,
            escrow_address: c.escrow_address,
            accepted_token: c.accepted_token,
            stake: c.stake,
            tie_policy: c.tie_policy,
        }
    }
}

/// Public view of a game. The first move is withheld while the game is
/// open; it is not secret, just not advertised.
#[derive(Serialize, Deserialize)]
pub struct GameResponse {
    pub id: GameId,
    pub first_mover: Address,
    pub first_move: Option<Move>,
    pub stake: u64,
    pub token: TokenId,
    pub status: GameStatus,
    pub second_mover: Option<Address>,
    pub second_move: Option<Move>,
    pub opened_at: String,
    pub resolved_at: Option<String>,
}

impl From<GameRecord> for GameResponse {
    fn from(g: GameRecord) -> Self {
        let open = g.is_open();
        Self {
            id: g.id,
            first_mover: g.first_mover,
            first_move: if open { None } else { Some(g.first_move) },
            stake: g.stake,
            token: g.token,
            status: g.status,
            second_mover: g.second_mover,
            second_move: g.second_move,
            opened_at: g.opened_at.to_rfc3339(),
            resolved_at: g.resolved_at.map(|t| t.to_rfc3339()),
        }
    }
}
