//! HTTP API handlers.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use duel_core::{EventRecord, GameId, LedgerSnapshot, Move, Resolution};
use duel_token::{Address, TokenId};

use crate::config::parse_address;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

/// Header carrying the acting party's address (hex or label)
pub const PARTY_HEADER: &str = "X-Party";

// ============ Helpers ============

fn party_from_header(headers: &HeaderMap) -> Result<Address, AppError> {
    headers
        .get(PARTY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .map(parse_address)
        .ok_or_else(|| AppError::unauthorized("Missing X-Party header"))
}

fn parse_move(choice: &str) -> Result<Move, AppError> {
    Ok(choice.parse::<Move>()?)
}

fn parse_game_id(raw: &str) -> Result<GameId, AppError> {
    raw.parse()
        .map_err(|_| AppError::bad_request(format!("Invalid game id: {}", raw)))
}

// ============ Game handlers ============

pub async fn open_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PlayRequest>,
) -> Result<Json<OpenGameResponse>, AppError> {
    let player = party_from_header(&headers)?;
    let first_move = parse_move(&req.choice)?;

    let engine = state.engine();
    let game_id = engine.open(player, first_move, req.funding).await?;
    let stake = engine
        .game(game_id)
        .await
        .map(|g| g.stake)
        .unwrap_or_default();

    Ok(Json(OpenGameResponse { game_id, stake }))
}

pub async fn join_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<Resolution>, AppError> {
    let player = party_from_header(&headers)?;
    let game_id = parse_game_id(&id)?;
    let second_move = parse_move(&req.choice)?;

    let engine = state.engine();
    if engine.game(game_id).await.is_none() {
        return Err(AppError::not_found(format!("Game {} not found", game_id)));
    }

    let resolution = engine
        .join(game_id, player, second_move, req.funding)
        .await?;
    Ok(Json(resolution))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let game_id = parse_game_id(&id)?;
    state
        .engine()
        .game(game_id)
        .await
        .map(|g| Json(GameResponse::from(g)))
        .ok_or_else(|| AppError::not_found(format!("Game {} not found", game_id)))
}

pub async fn list_open_games(State(state): State<AppState>) -> Json<serde_json::Value> {
    let games: Vec<GameResponse> = state
        .engine()
        .open_games()
        .await
        .into_iter()
        .map(GameResponse::from)
        .collect();
    Json(serde_json::json!({"games": games}))
}

// ============ Credit handlers ============

pub async fn get_credit(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Json<CreditResponse> {
    let party = parse_address(&address);
    let balance = state.engine().credit_of(&party).await;
    Json(CreditResponse { party, balance })
}

pub async fn withdraw(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<WithdrawResponse>, AppError> {
    let party = party_from_header(&headers)?;
    let amount = state.engine().withdraw(party).await?;
    Ok(Json(WithdrawResponse { party, amount }))
}

pub async fn get_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<WalletResponse>, AppError> {
    let party = parse_address(&address);
    let token = state.engine().config().await.accepted_token;
    let balance = state
        .token_client()
        .balance_of(&token, &party)
        .await
        .map_err(|e| AppError::new(axum::http::StatusCode::BAD_GATEWAY, e.to_string()))?;
    Ok(Json(WalletResponse {
        party,
        token,
        balance,
    }))
}

// ============ Admin handlers ============

pub async fn set_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SetTokenRequest>,
) -> Result<Json<ConfigResponse>, AppError> {
    let caller = party_from_header(&headers)?;
    let token = TokenId::new(parse_address(&req.token));
    let engine = state.engine();
    engine.set_accepted_token(caller, token).await?;
    Ok(Json(engine.config().await.into()))
}

pub async fn set_stake(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SetStakeRequest>,
) -> Result<Json<ConfigResponse>, AppError> {
    let caller = party_from_header(&headers)?;
    let engine = state.engine();
    engine.set_stake_size(caller, req.stake).await?;
    Ok(Json(engine.config().await.into()))
}

// ============ Audit handlers ============

pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(state.engine().config().await.into())
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Json<Vec<EventRecord>> {
    Json(state.engine().events_since(query.since).await)
}

pub async fn get_ledger(State(state): State<AppState>) -> Json<LedgerSnapshot> {
    Json(state.engine().snapshot().await)
}
