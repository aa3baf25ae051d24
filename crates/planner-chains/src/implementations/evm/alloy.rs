//! Alloy-backed HTTP reader.
//!
//! A provider is built for every call and dropped when the call returns, so
//! nothing outlives a planning call.

use crate::{utils::RetryPolicy, ChainError, ChainReader};
use alloy::network::TransactionBuilder;
use alloy::primitives::{hex, Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::http::reqwest::Url;
use alloy::transports::{RpcError, TransportErrorKind};
use async_trait::async_trait;
use tracing::debug;

/// Reads chain state over JSON-RPC with retries on transport failures.
#[derive(Debug, Clone, Default)]
pub struct AlloyReader {
	retry: RetryPolicy,
}

impl AlloyReader {
	pub fn new(retry: RetryPolicy) -> Self {
		Self { retry }
	}
}

fn parse_endpoint(rpc_url: &str) -> Result<Url, ChainError> {
	let url: Url = rpc_url
		.parse()
		.map_err(|e| ChainError::InvalidEndpoint(format!("{}: {}", rpc_url, e)))?;
	match url.scheme() {
		"http" | "https" => Ok(url),
		other => Err(ChainError::InvalidEndpoint(format!(
			"{}: unsupported scheme '{}'",
			rpc_url, other
		))),
	}
}

/// JSON-RPC code nodes use for a reverted `eth_call`.
const EXECUTION_REVERTED: i64 = 3;

fn classify(err: RpcError<TransportErrorKind>) -> ChainError {
	match err.as_error_resp() {
		Some(payload) => classify_response(payload.code, &payload.message),
		None => ChainError::Transport(err.to_string()),
	}
}

/// Only execution reverts are final. Other error responses, such as rate
/// limits (-32005, 429) or an overloaded node, are worth retrying.
fn classify_response(code: i64, message: &str) -> ChainError {
	let detail = format!("{} (code {})", message, code);
	if code == EXECUTION_REVERTED || message.to_ascii_lowercase().contains("revert") {
		ChainError::Reverted(detail)
	} else {
		ChainError::Transport(detail)
	}
}

#[async_trait]
impl ChainReader for AlloyReader {
	async fn chain_id(&self, rpc_url: &str) -> Result<u64, ChainError> {
		let url = parse_endpoint(rpc_url)?;
		self.retry
			.run("eth_chainId", || {
				let url = url.clone();
				async move {
					let provider = ProviderBuilder::new().connect_http(url);
					provider.get_chain_id().await.map_err(classify)
				}
			})
			.await
	}

	async fn call(&self, rpc_url: &str, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
		let url = parse_endpoint(rpc_url)?;
		debug!(to = %to, selector = %hex::encode(data.get(..4).unwrap_or_default()), "eth_call");
		self.retry
			.run("eth_call", || {
				let url = url.clone();
				let tx = TransactionRequest::default()
					.with_to(to)
					.with_input(data.clone());
				async move {
					let provider = ProviderBuilder::new().connect_http(url);
					provider.call(tx).await.map_err(classify)
				}
			})
			.await
	}
}
