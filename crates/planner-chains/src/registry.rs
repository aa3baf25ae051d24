//! RPC endpoint resolution.
//!
//! Resolution order for a chain: the caller's explicit override, then the
//! configured endpoint, then the built-in public default. A chain with none
//! of these is a usage error that names the chain.

use planner_types::{ChainId, PlanError, Result};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Public endpoints used when nothing else is configured.
const DEFAULT_ENDPOINTS: &[(ChainId, &str)] = &[
	(ChainId::ETHEREUM, "https://eth.llamarpc.com"),
	(ChainId::OPTIMISM, "https://mainnet.optimism.io"),
	(ChainId::POLYGON, "https://polygon-rpc.com"),
	(ChainId::BASE, "https://mainnet.base.org"),
	(ChainId::ARBITRUM, "https://arb1.arbitrum.io/rpc"),
	(ChainId::TAIKO, "https://rpc.mainnet.taiko.xyz"),
];

/// Maps chain ids to RPC endpoints.
#[derive(Clone, Default)]
pub struct RpcResolver {
	configured: HashMap<ChainId, String>,
}

impl RpcResolver {
	/// A resolver that only knows the built-in defaults.
	pub fn new() -> Self {
		Self::default()
	}

	/// A resolver with configured endpoints layered over the defaults.
	pub fn with_endpoints(configured: HashMap<ChainId, String>) -> Self {
		Self { configured }
	}

	/// Built-in endpoint for `chain_id`, if any.
	pub fn default_endpoint(chain_id: ChainId) -> Option<&'static str> {
		DEFAULT_ENDPOINTS
			.iter()
			.find(|(id, _)| *id == chain_id)
			.map(|(_, url)| *url)
	}

	/// Resolves the endpoint used for every read and step on `chain_id`.
	///
	/// Blank strings count as unset.
	pub fn resolve(&self, chain_id: ChainId, override_url: Option<&str>) -> Result<String> {
		if let Some(url) = override_url.map(str::trim).filter(|u| !u.is_empty()) {
			debug!(chain_id = %chain_id, "Using RPC override");
			return Ok(url.to_string());
		}

		if let Some(url) = self
			.configured
			.get(&chain_id)
			.map(|u| u.trim())
			.filter(|u| !u.is_empty())
		{
			return Ok(url.to_string());
		}

		Self::default_endpoint(chain_id)
			.map(str::to_string)
			.ok_or_else(|| {
				let name = chain_id
					.name()
					.map(|n| format!("{} ({})", n, chain_id))
					.unwrap_or_else(|| chain_id.to_string());
				PlanError::Usage(format!(
					"No RPC endpoint configured for chain {}; pass an override or add rpc.{} to the configuration",
					name, chain_id
				))
			})
	}

	/// Chains with a configured endpoint.
	pub fn configured_chains(&self) -> Vec<ChainId> {
		let mut chains: Vec<_> = self.configured.keys().copied().collect();
		chains.sort();
		chains
	}
}

impl fmt::Debug for RpcResolver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RpcResolver")
			.field("configured", &self.configured_chains())
			.finish()
	}
}
