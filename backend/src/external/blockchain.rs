//! Blockchain mirror client for trace-hash anchoring
//!
//! Thin JSON-RPC client for an EVM-style node. Anchoring is disabled by
//! default; with `blockchain.enabled = false` every call short-circuits
//! without network traffic, so the traceability path works entirely from the
//! locally stored hash.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::BlockchainConfig;
use crate::error::{AppError, AppResult};

/// Blockchain JSON-RPC client
#[derive(Clone)]
pub struct BlockchainClient {
    client: Client,
    rpc_url: String,
    contract_address: String,
    chain_id: u64,
    enabled: bool,
}

/// Receipt returned after anchoring a trace hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorReceipt {
    pub transaction_hash: String,
    pub block_number: Option<u64>,
}

/// JSON-RPC request envelope
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: serde_json::Value,
    id: u32,
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<serde_json::Value>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl BlockchainClient {
    /// Create a new BlockchainClient from configuration
    pub fn new(config: &BlockchainConfig) -> Self {
        Self {
            client: Client::new(),
            rpc_url: config.rpc_url.clone(),
            contract_address: config.contract_address.clone(),
            chain_id: config.chain_id,
            enabled: config.enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Anchor a trace hash on chain
    ///
    /// Returns `Ok(None)` when the mirror is disabled, which is the default
    /// in this build. The local SHA-256 comparison remains the source of
    /// truth either way.
    pub async fn anchor_hash(
        &self,
        traceability_code: &str,
        trace_hash: &str,
    ) -> AppResult<Option<AnchorReceipt>> {
        if !self.enabled {
            tracing::debug!(
                code = traceability_code,
                "blockchain mirror disabled, skipping anchor"
            );
            return Ok(None);
        }

        let payload = serde_json::json!([{
            "to": self.contract_address,
            "chainId": format!("0x{:x}", self.chain_id),
            "data": encode_anchor_call(traceability_code, trace_hash),
        }]);

        let result = self.call("eth_sendTransaction", payload).await?;
        let tx_hash = result
            .as_str()
            .ok_or_else(|| AppError::BlockchainRpcError("missing transaction hash".to_string()))?
            .to_string();

        Ok(Some(AnchorReceipt {
            transaction_hash: tx_hash,
            block_number: None,
        }))
    }

    /// Read a previously anchored hash for a traceability code
    ///
    /// Returns `Ok(None)` when disabled or when nothing was anchored.
    pub async fn read_anchored_hash(
        &self,
        traceability_code: &str,
    ) -> AppResult<Option<String>> {
        if !self.enabled {
            return Ok(None);
        }

        let payload = serde_json::json!([{
            "to": self.contract_address,
            "data": encode_read_call(traceability_code),
        }, "latest"]);

        let result = self.call("eth_call", payload).await?;
        Ok(result.as_str().map(|s| s.to_string()))
    }

    async fn call(&self, method: &str, params: serde_json::Value) -> AppResult<serde_json::Value> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::BlockchainRpcError(e.to_string()))?;

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| AppError::BlockchainRpcError(e.to_string()))?;

        if let Some(err) = body.error {
            return Err(AppError::BlockchainRpcError(format!(
                "{} (code {})",
                err.message, err.code
            )));
        }

        body.result
            .ok_or_else(|| AppError::BlockchainRpcError("empty RPC result".to_string()))
    }
}

/// ABI-style calldata for the anchor function
fn encode_anchor_call(traceability_code: &str, trace_hash: &str) -> String {
    format!("0x{}{}", hex::encode(traceability_code.as_bytes()), trace_hash)
}

/// ABI-style calldata for the read function
fn encode_read_call(traceability_code: &str) -> String {
    format!("0x{}", hex::encode(traceability_code.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disabled_config() -> BlockchainConfig {
        BlockchainConfig {
            enabled: false,
            rpc_url: String::new(),
            contract_address: String::new(),
            chain_id: 0,
        }
    }

    #[tokio::test]
    async fn test_disabled_client_skips_anchor() {
        let client = BlockchainClient::new(&disabled_config());
        let receipt = client.anchor_hash("AGC-2024-ABCDEF01", "00").await.unwrap();
        assert!(receipt.is_none());
    }

    #[tokio::test]
    async fn test_disabled_client_reads_nothing() {
        let client = BlockchainClient::new(&disabled_config());
        let anchored = client.read_anchored_hash("AGC-2024-ABCDEF01").await.unwrap();
        assert!(anchored.is_none());
    }
}
