//! End-to-end tests for the duel HTTP API.
//!
//! Each test serves the router in-process on an ephemeral port and drives it
//! with reqwest, the way a browser client or indexer would.
//!
//! Run with: cargo test -p duel-service --test e2e_duel_flow -- --nocapture

use duel_core::{EngineConfig, TiePolicy};
use duel_service::state::seed_demo_parties;
use duel_service::{router, AppState};
use duel_token::{Address, MockTokenClient, TokenId};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

const STAKE: u64 = 100;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    tokens: MockTokenClient,
    config: EngineConfig,
}

impl TestServer {
    async fn start(tie_policy: TiePolicy) -> Self {
        let config = EngineConfig::new(
            Address::from_label("owner"),
            Address::from_label("duel-escrow"),
            TokenId::new(Address::from_label("duel-token")),
            STAKE,
        )
        .with_tie_policy(tie_policy);

        let tokens = MockTokenClient::new();
        seed_demo_parties(&tokens, &config);
        let state = AppState::with_token_client(config.clone(), Arc::new(tokens.clone())).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
            tokens,
            config,
        }
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("request failed");
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    async fn post(&self, party: &str, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("X-Party", party)
            .json(&body)
            .send()
            .await
            .expect("request failed");
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    fn wallet(&self, label: &str) -> u64 {
        self.tokens
            .balance(self.config.accepted_token, Address::from_label(label))
    }
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start(TiePolicy::FirstMoverWins).await;
    let resp = server
        .client
        .get(format!("{}/api/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_full_game_and_withdraw() {
    let server = TestServer::start(TiePolicy::FirstMoverWins).await;

    // Alice opens with rock
    let (status, body) = server
        .post("alice", "/api/games", json!({"move": "A"}))
        .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["game_id"], 1);
    assert_eq!(body["stake"], STAKE);

    // The open game does not advertise alice's move
    let (_, game) = server.get("/api/games/1").await;
    assert_eq!(game["status"]["state"], "open");
    assert!(game["first_move"].is_null());

    let (_, open) = server.get("/api/games/open").await;
    assert_eq!(open["games"].as_array().unwrap().len(), 1);

    // Bob joins with paper and wins
    let (status, resolution) = server
        .post("bob", "/api/games/1/join", json!({"move": "paper"}))
        .await;
    assert_eq!(status, 200, "{}", resolution);
    assert_eq!(resolution["outcome"], "second_wins");
    assert_eq!(resolution["winner"], Address::from_label("bob").to_hex());
    assert_eq!(resolution["payout"], 2 * STAKE);

    let (_, game) = server.get("/api/games/1").await;
    assert_eq!(game["status"]["state"], "resolved");
    assert_eq!(game["first_move"], "rock");

    // A second join is rejected and pays nothing
    let (status, _) = server
        .post("carol", "/api/games/1/join", json!({"move": "scissors"}))
        .await;
    assert_eq!(status, 409);
    assert_eq!(server.wallet("carol"), 10_000);

    let (_, credit) = server.get("/api/credits/bob").await;
    assert_eq!(credit["balance"], 2 * STAKE);

    // Withdraw, then withdraw again as a no-op
    let (status, body) = server.post("bob", "/api/credits/withdraw", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["amount"], 2 * STAKE);
    assert_eq!(server.wallet("bob"), 10_000 + STAKE);

    let (status, body) = server.post("bob", "/api/credits/withdraw", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["amount"], 0);

    let (_, wallet) = server.get("/api/wallets/bob").await;
    assert_eq!(wallet["balance"], 10_000 + STAKE);

    let (_, ledger) = server.get("/api/ledger").await;
    assert_eq!(ledger["credits_total"], 0);
    assert_eq!(ledger["open_escrow"], 0);
    assert_eq!(ledger["deposited"], 2 * STAKE);
    assert_eq!(ledger["withdrawn"], 2 * STAKE);
}

#[tokio::test]
async fn test_events_feed() {
    let server = TestServer::start(TiePolicy::FirstMoverWins).await;

    server.post("alice", "/api/games", json!({"move": "C"})).await;
    server
        .post("bob", "/api/games/1/join", json!({"move": "A"}))
        .await;

    let (_, events) = server.get("/api/events").await;
    let events = events.as_array().unwrap().clone();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event"]["type"], "game_opened");
    assert!(events[0]["event"].get("move").is_none());
    assert_eq!(events[1]["event"]["type"], "game_resolved");
    assert_eq!(
        events[1]["event"]["winner"],
        Address::from_label("bob").to_hex()
    );

    let (_, tail) = server.get("/api/events?since=1").await;
    assert_eq!(tail.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejections() {
    let server = TestServer::start(TiePolicy::FirstMoverWins).await;

    // Missing party header
    let resp = server
        .client
        .post(format!("{}/api/games", server.base_url))
        .json(&json!({"move": "A"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    // Invalid move allocates nothing
    let (status, body) = server
        .post("alice", "/api/games", json!({"move": "lizard"}))
        .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("Invalid move"));

    // Unknown game
    let (status, _) = server
        .post("bob", "/api/games/42/join", json!({"move": "A"}))
        .await;
    assert_eq!(status, 404);

    // Credit-funded open without credit
    let (status, _) = server
        .post("alice", "/api/games", json!({"move": "A", "funding": "credit"}))
        .await;
    assert_eq!(status, 402);

    // Party without allowance
    let (status, _) = server
        .post("mallory", "/api/games", json!({"move": "A"}))
        .await;
    assert_eq!(status, 502);

    // The first successful open still gets id 1
    let (status, body) = server
        .post("alice", "/api/games", json!({"move": "B"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["game_id"], 1);
}

#[tokio::test]
async fn test_admin_endpoints() {
    let server = TestServer::start(TiePolicy::FirstMoverWins).await;

    let (status, _) = server
        .post("alice", "/api/admin/stake", json!({"stake": 10}))
        .await;
    assert_eq!(status, 403);

    let (status, _) = server
        .post("owner", "/api/admin/stake", json!({"stake": 0}))
        .await;
    assert_eq!(status, 400);

    let (status, config) = server
        .post("owner", "/api/admin/stake", json!({"stake": 10}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(config["stake"], 10);

    let (_, body) = server.post("alice", "/api/games", json!({"move": "A"})).await;
    assert_eq!(body["stake"], 10);
    assert_eq!(server.wallet("alice"), 10_000 - 10);

    let new_token = Address::from_label("other-token").to_hex();
    let (status, config) = server
        .post("owner", "/api/admin/token", json!({"token": new_token}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(config["accepted_token"], new_token);

    let (_, events) = server.get("/api/events").await;
    let types: Vec<&str> = events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event"]["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        vec!["stake_size_changed", "game_opened", "token_config_changed"]
    );
}

#[tokio::test]
async fn test_draw_policy_over_http() {
    let server = TestServer::start(TiePolicy::Draw).await;

    server.post("alice", "/api/games", json!({"move": "B"})).await;
    let (status, resolution) = server
        .post("bob", "/api/games/1/join", json!({"move": "B"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(resolution["outcome"], "draw");
    assert!(resolution["winner"].is_null());

    let (_, alice) = server.get("/api/credits/alice").await;
    let (_, bob) = server.get("/api/credits/bob").await;
    assert_eq!(alice["balance"], STAKE);
    assert_eq!(bob["balance"], STAKE);

    // Credit funds the rematch without touching the wallet
    let (status, _) = server
        .post("alice", "/api/games", json!({"move": "A", "funding": "credit"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(server.wallet("alice"), 10_000 - STAKE);
}
