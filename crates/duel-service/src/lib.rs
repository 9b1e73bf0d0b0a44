//! Stake Duel Service
//!
//! HTTP front end over a single `DuelEngine`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use handlers::*;
pub use config::{ConfigError, ServiceConfig};
pub use state::AppState;

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Games
        .route("/api/games", post(open_game))
        .route("/api/games/open", get(list_open_games))
        .route("/api/games/:id", get(get_game))
        .route("/api/games/:id/join", post(join_game))
        // Credits
        .route("/api/credits/withdraw", post(withdraw))
        .route("/api/credits/:address", get(get_credit))
        .route("/api/wallets/:address", get(get_wallet))
        // Admin
        .route("/api/admin/token", post(set_token))
        .route("/api/admin/stake", post(set_stake))
        // Audit
        .route("/api/config", get(get_config))
        .route("/api/events", get(list_events))
        .route("/api/ledger", get(get_ledger))
        // Health
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
