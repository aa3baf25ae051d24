//! Execution providers.
//!
//! Providers are a closed set selected by the quote's provider name. Each one
//! knows how to turn a quote of its own into a primary call; the planner
//! handles everything shared around it.

use crate::context::{ChainScope, PlanContext};
use crate::quoter::Route;
use crate::ActionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use planner_config::PlannerConfig;
use planner_types::{
	expected_keys, parse_address, ChainId, ConfigSchema, ExpectedOutputs, PlanError, Quote, Result,
	StepType,
};
use std::collections::{BTreeMap, HashMap};

pub mod across;
pub mod amm;
pub mod lifi;
pub mod prebuilt;
pub mod uniswap_api;

pub use across::AcrossProvider;
pub use amm::AmmProvider;
pub use lifi::LiFiProvider;
pub use prebuilt::{enforce_min_out, PrebuiltTx};
pub use uniswap_api::UniswapApiProvider;

/// The swap or bridge call an action exists for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryCall {
	pub step_type: StepType,
	pub target: Address,
	pub data: Bytes,
	pub value: U256,
	pub description: String,
}

/// Where and how an external poller confirms bridged funds arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
	pub provider: String,
	pub status_endpoint: String,
	pub origin_chain: ChainId,
	pub destination_chain: ChainId,
	pub recipient: Address,
}

impl Settlement {
	pub fn write_to(&self, outputs: &mut ExpectedOutputs) {
		outputs.insert(
			expected_keys::SETTLEMENT_PROVIDER.to_string(),
			self.provider.clone(),
		);
		outputs.insert(
			expected_keys::SETTLEMENT_STATUS_ENDPOINT.to_string(),
			self.status_endpoint.clone(),
		);
		outputs.insert(
			expected_keys::SETTLEMENT_ORIGIN_CHAIN.to_string(),
			self.origin_chain.to_string(),
		);
		outputs.insert(
			expected_keys::SETTLEMENT_DESTINATION_CHAIN.to_string(),
			self.destination_chain.to_string(),
		);
		outputs.insert(
			expected_keys::SETTLEMENT_RECIPIENT.to_string(),
			self.recipient.to_string(),
		);
	}
}

/// Every provider the planner can build actions for.
#[derive(Debug, Clone)]
pub enum ExecutionProvider {
	Amm(AmmProvider),
	Across(AcrossProvider),
	LiFi(LiFiProvider),
	UniswapApi(UniswapApiProvider),
}

macro_rules! dispatch {
	($self:ident, $p:ident => $call:expr) => {
		match $self {
			ExecutionProvider::Amm($p) => $call,
			ExecutionProvider::Across($p) => $call,
			ExecutionProvider::LiFi($p) => $call,
			ExecutionProvider::UniswapApi($p) => $call,
		}
	};
}

#[async_trait]
impl ActionBuilder for ExecutionProvider {
	fn name(&self) -> &str {
		dispatch!(self, p => p.name())
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		dispatch!(self, p => p.config_schema())
	}

	fn supports(&self, quote: &Quote) -> Result<()> {
		dispatch!(self, p => p.supports(quote))
	}

	async fn select_route(&self, ctx: &PlanContext<'_>, scope: ChainScope<'_>) -> Result<Route> {
		dispatch!(self, p => p.select_route(ctx, scope).await)
	}

	fn build_primary_call(
		&self,
		ctx: &PlanContext<'_>,
		route: &Route,
		amount_out_min: U256,
	) -> Result<PrimaryCall> {
		dispatch!(self, p => p.build_primary_call(ctx, route, amount_out_min))
	}

	fn settlement(&self, ctx: &PlanContext<'_>) -> Option<Settlement> {
		dispatch!(self, p => p.settlement(ctx))
	}
}

impl ExecutionProvider {
	/// Rebuilds the provider with its configuration section applied.
	fn configured(self, section: &toml::Value) -> Result<Self> {
		self.config_schema().validate(section)?;
		Ok(match self {
			ExecutionProvider::Amm(p) => ExecutionProvider::Amm(p.with_config(section)?),
			ExecutionProvider::Across(p) => ExecutionProvider::Across(p.with_config(section)?),
			ExecutionProvider::LiFi(p) => ExecutionProvider::LiFi(p.with_config(section)?),
			ExecutionProvider::UniswapApi(p) => {
				ExecutionProvider::UniswapApi(p.with_config(section)?)
			}
		})
	}
}

/// Providers by name.
#[derive(Debug, Clone)]
pub struct ProviderSet {
	providers: BTreeMap<String, ExecutionProvider>,
}

impl Default for ProviderSet {
	fn default() -> Self {
		Self::with_defaults()
	}
}

impl ProviderSet {
	/// Every built-in provider with its built-in addresses.
	pub fn with_defaults() -> Self {
		let mut set = Self {
			providers: BTreeMap::new(),
		};
		set.insert(ExecutionProvider::Amm(AmmProvider::taikoswap()));
		set.insert(ExecutionProvider::Amm(AmmProvider::uniswap_v3()));
		set.insert(ExecutionProvider::Across(AcrossProvider::new()));
		set.insert(ExecutionProvider::LiFi(LiFiProvider::new()));
		set.insert(ExecutionProvider::UniswapApi(UniswapApiProvider::new()));
		set
	}

	/// Built-in providers with `[providers.<name>]` sections applied.
	///
	/// A section for an unknown provider is a usage error.
	pub fn from_config(config: &PlannerConfig) -> Result<Self> {
		let mut set = Self::with_defaults();
		let mut names: Vec<_> = config.providers.keys().collect();
		names.sort();

		for name in names {
			let provider = set.providers.remove(name.as_str()).ok_or_else(|| {
				PlanError::Usage(format!(
					"Unknown provider section [providers.{}]; known providers: {}",
					name,
					set.names().join(", ")
				))
			})?;
			let section = &config.providers[name];
			set.insert(provider.configured(section).map_err(|e| match e {
				PlanError::Usage(msg) => PlanError::Usage(format!("[providers.{}] {}", name, msg)),
				other => other,
			})?);
		}

		Ok(set)
	}

	pub fn insert(&mut self, provider: ExecutionProvider) {
		self.providers.insert(provider.name().to_string(), provider);
	}

	/// The provider named by a quote; unknown names are unsupported.
	pub fn get(&self, name: &str) -> Result<&ExecutionProvider> {
		self.providers.get(name).ok_or_else(|| {
			PlanError::Unsupported(format!("Provider '{}' cannot plan executions", name))
		})
	}

	pub fn names(&self) -> Vec<&str> {
		self.providers.keys().map(String::as_str).collect()
	}
}

/// Reads `section[key]` as a table of chain id to address.
pub(crate) fn chain_address_map(
	section: &toml::Value,
	key: &str,
) -> Result<HashMap<ChainId, Address>> {
	let Some(table) = section.get(key).and_then(|v| v.as_table()) else {
		return Ok(HashMap::new());
	};

	table
		.iter()
		.map(|(chain, value)| {
			let field = format!("{}.{}", key, chain);
			let chain_id: ChainId = chain
				.parse()
				.map_err(|_| PlanError::Usage(format!("Invalid chain ID in {}", field)))?;
			let address = value
				.as_str()
				.ok_or_else(|| PlanError::Usage(format!("{} must be an address string", field)))?;
			Ok((chain_id, parse_address(&field, address)?))
		})
		.collect()
}

/// Reads an optional string field.
pub(crate) fn optional_str<'a>(section: &'a toml::Value, key: &str) -> Option<&'a str> {
	section.get(key).and_then(|v| v.as_str())
}

/// Reads an optional address from provider route data.
pub(crate) fn route_address(ctx: &PlanContext<'_>, key: &str) -> Result<Option<Address>> {
	match ctx.route_data()?.get(key) {
		None | Some(serde_json::Value::Null) => Ok(None),
		Some(serde_json::Value::String(s)) => parse_address(&format!("route_data.{}", key), s).map(Some),
		Some(other) => Err(PlanError::Usage(format!(
			"route_data.{} must be an address string, got {}",
			key, other
		))),
	}
}

/// The error for a quote whose shape a provider does not handle.
pub(crate) fn unsupported(provider: &str, what: impl std::fmt::Display) -> PlanError {
	PlanError::Unsupported(format!("{} does not support {}", provider, what))
}
