//! Test-network balance credit
//!
//! Tenderly virtual testnets expose `tenderly_addBalance(addresses, hexAmount)`.
//! It is sent as a generic JSON-RPC POST rather than through the provider so
//! that HTTP status and the raw error body are visible to the caller.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::rpc::RpcChainClient;
use super::Faucet;
use crate::error::RpcError;

const FAUCET_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the JSON-RPC body for a balance credit
fn faucet_request(method: &str, address: Address, amount: U256) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": [[address], format!("{:#x}", amount)],
        "id": 1
    })
}

/// Interpret a JSON-RPC reply: an `error` member is a rejection, any `result`
/// member (including `null`) is success
fn faucet_outcome(reply: &Value) -> Result<bool, RpcError> {
    if let Some(error) = reply.get("error") {
        return Err(RpcError::Rejected(error.to_string()));
    }
    Ok(reply.get("result").is_some())
}

#[async_trait]
impl Faucet for RpcChainClient {
    async fn faucet_add_balance(&self, address: Address, amount: U256) -> Result<bool, RpcError> {
        let body = faucet_request(&self.faucet_method, address, amount);

        let resp = self
            .http
            .post(self.rpc_url.clone())
            .json(&body)
            .timeout(FAUCET_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RpcError::Rejected(format!("HTTP {}: {}", status, text)));
        }

        let reply: Value = resp
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;

        let credited = faucet_outcome(&reply)?;
        tracing::info!(
            address = %address,
            amount_wei = %amount,
            method = %self.faucet_method,
            credited,
            "Faucet credit requested"
        );
        Ok(credited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{stub, BURN_ADDRESS};
    use crate::config::RpcConfig;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_request_shape() {
        let body = faucet_request("tenderly_addBalance", BURN_ADDRESS, U256::from(255u64));
        assert_eq!(body["method"], "tenderly_addBalance");
        assert_eq!(body["params"][1], "0xff");
        assert_eq!(
            body["params"][0][0].as_str().unwrap().to_lowercase(),
            "0x000000000000000000000000000000000000dead"
        );
    }

    #[test]
    fn test_outcome_result_is_success() {
        let reply = json!({"jsonrpc": "2.0", "id": 1, "result": "0xabc"});
        assert!(faucet_outcome(&reply).unwrap());
    }

    #[test]
    fn test_outcome_null_result_is_credited() {
        let reply = json!({"jsonrpc": "2.0", "id": 1, "result": null});
        assert!(faucet_outcome(&reply).unwrap());
    }

    #[test]
    fn test_outcome_missing_result_is_not_credited() {
        let reply = json!({"jsonrpc": "2.0", "id": 1});
        assert!(!faucet_outcome(&reply).unwrap());
    }

    #[test]
    fn test_outcome_error_is_rejected() {
        let reply = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32601, "message": "the method tenderly_addBalance does not exist"}
        });
        assert!(matches!(faucet_outcome(&reply), Err(RpcError::Rejected(msg)) if msg.contains("does not exist")));
    }

    fn client_for(url: String) -> RpcChainClient {
        RpcChainClient::new(&RpcConfig::with_url(url)).unwrap()
    }

    #[tokio::test]
    async fn test_http_error_status_is_rejected_with_body() {
        let url = stub::serve(|_| (500, "upstream exploded".to_string())).await;
        let client = client_for(url);

        let err = client
            .faucet_add_balance(BURN_ADDRESS, U256::from(1u64))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RpcError::Rejected(msg) if msg.starts_with("HTTP 500") && msg.contains("upstream exploded")
        ));
    }

    #[tokio::test]
    async fn test_credit_sends_method_and_hex_amount() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let url = stub::serve(move |req| {
            recorder.lock().unwrap().push(req.clone());
            stub::reply(req, Value::Null)
        })
        .await;
        let client = client_for(url);

        let credited = client
            .faucet_add_balance(BURN_ADDRESS, U256::from(1_500_000_000_000_000_000u128))
            .await
            .unwrap();
        assert!(credited);

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["method"], "tenderly_addBalance");
        assert_eq!(requests[0]["params"][1], "0x14d1120d7b160000");
    }

    #[tokio::test]
    async fn test_unsupported_method_is_rejected() {
        let url = stub::serve(|req| {
            let body = json!({
                "jsonrpc": "2.0",
                "id": req["id"].clone(),
                "error": {"code": -32601, "message": "method not found"}
            });
            (200, body.to_string())
        })
        .await;
        let client = client_for(url);

        assert!(matches!(
            client.faucet_add_balance(BURN_ADDRESS, U256::from(1u64)).await,
            Err(RpcError::Rejected(msg)) if msg.contains("method not found")
        ));
    }
}
