//! RPC client for a fungible-token node.
//!
//! Provides a `TokenClient` that talks JSON-RPC 2.0 to a node exposing
//! `token_transferFrom`, `token_transfer` and `token_balanceOf`.

use super::traits::{TokenClient, TokenError, TransferId};
use crate::address::{Address, TokenId};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

/// Result payload of a transfer call
#[derive(Debug, Deserialize)]
struct TransferReceipt {
    transfer_id: Option<Uuid>,
    status: String,
}

/// RPC client for a token node
pub struct RpcTokenClient {
    client: Client,
    rpc_url: String,
}

impl RpcTokenClient {
    /// Create a new RPC client
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            rpc_url: rpc_url.into(),
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Make a JSON-RPC call
    async fn call(&self, method: &str, params: Value) -> Result<Value, TokenError> {
        let request = build_request(method, params);
        debug!(method, "token rpc request");

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TokenError::NetworkError(e.to_string()))?;

        let result: Value = response
            .json()
            .await
            .map_err(|e| TokenError::NetworkError(e.to_string()))?;

        parse_response(result)
    }

    async fn submit_transfer(&self, method: &str, params: Value) -> Result<TransferId, TokenError> {
        let result = self.call(method, params).await?;
        let receipt: TransferReceipt = serde_json::from_value(result)
            .map_err(|e| TokenError::NetworkError(format!("malformed receipt: {}", e)))?;

        match receipt.status.as_str() {
            "success" => Ok(receipt
                .transfer_id
                .map(TransferId::from_uuid)
                .unwrap_or_default()),
            "insufficient_balance" => Err(TokenError::InsufficientBalance),
            "insufficient_allowance" => Err(TokenError::InsufficientAllowance),
            other => Err(TokenError::Rejected(other.to_string())),
        }
    }
}

fn build_request(method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": [params]
    })
}

fn parse_response(result: Value) -> Result<Value, TokenError> {
    if let Some(error) = result.get("error") {
        let msg = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error");
        return Err(TokenError::Rejected(msg.to_string()));
    }

    result
        .get("result")
        .cloned()
        .ok_or_else(|| TokenError::NetworkError("No result in response".to_string()))
}

#[async_trait]
impl TokenClient for RpcTokenClient {
    async fn transfer_from(
        &self,
        token: &TokenId,
        payer: &Address,
        recipient: &Address,
        amount: u64,
    ) -> Result<TransferId, TokenError> {
        let params = json!({
            "token": token,
            "from": payer,
            "to": recipient,
            "amount": format!("0x{:x}", amount),
        });
        self.submit_transfer("token_transferFrom", params).await
    }

    async fn transfer(
        &self,
        token: &TokenId,
        sender: &Address,
        recipient: &Address,
        amount: u64,
    ) -> Result<TransferId, TokenError> {
        let params = json!({
            "token": token,
            "from": sender,
            "to": recipient,
            "amount": format!("0x{:x}", amount),
        });
        self.submit_transfer("token_transfer", params).await
    }

    async fn balance_of(&self, token: &TokenId, owner: &Address) -> Result<u64, TokenError> {
        let params = json!({
            "token": token,
            "owner": owner,
        });
        let result = self.call("token_balanceOf", params).await?;

        let hex_amount = result
            .get("balance")
            .and_then(|v| v.as_str())
            .ok_or_else(|| TokenError::NetworkError("No balance in response".to_string()))?;
        u64::from_str_radix(hex_amount.trim_start_matches("0x"), 16)
            .map_err(|e| TokenError::NetworkError(format!("bad balance {}: {}", hex_amount, e)))
    }
}
