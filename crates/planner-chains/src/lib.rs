//! Read-only chain access for the planner.
//!
//! The planner never talks to a node directly. It goes through the
//! [`ChainReader`] trait, which exposes exactly the two reads planning needs:
//! the endpoint's chain id and a simulated contract call.
//!
//! # Architecture
//!
//! - `registry`: resolves the RPC endpoint for a chain from an override, the
//!   configured table, or the built-in defaults
//! - `fanout`: bounded, order-preserving concurrent reads
//! - `utils`: retry policy for transient transport failures
//! - `implementations`: concrete readers (alloy over HTTP)

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use planner_types::PlanError;
use thiserror::Error;

pub mod fanout;
pub mod implementations;
pub mod registry;
pub mod utils;

pub use fanout::join_bounded;
pub use implementations::evm::AlloyReader;
pub use registry::RpcResolver;
pub use utils::RetryPolicy;

/// Errors returned by a [`ChainReader`].
#[derive(Debug, Error)]
pub enum ChainError {
	/// The endpoint could not be reached or answered garbage.
	#[error("RPC transport error: {0}")]
	Transport(String),
	/// The node executed the call and it reverted.
	#[error("Call reverted: {0}")]
	Reverted(String),
	/// The endpoint string is not a usable URL.
	#[error("Invalid RPC endpoint: {0}")]
	InvalidEndpoint(String),
}

impl From<ChainError> for PlanError {
	fn from(err: ChainError) -> Self {
		match err {
			ChainError::Transport(_) | ChainError::Reverted(_) => {
				PlanError::Unavailable(err.to_string())
			}
			ChainError::InvalidEndpoint(_) => PlanError::Usage(err.to_string()),
		}
	}
}

/// Read-only access to an EVM node.
///
/// Implementations connect per call and hold no connection state between
/// calls, so a dropped future releases everything it opened.
#[async_trait]
pub trait ChainReader: Send + Sync {
	/// `eth_chainId` of the node behind `rpc_url`.
	async fn chain_id(&self, rpc_url: &str) -> Result<u64, ChainError>;

	/// `eth_call` against `to` at the latest block.
	async fn call(&self, rpc_url: &str, to: Address, data: Bytes) -> Result<Bytes, ChainError>;
}
