//! Across bridge deposits through the origin chain's SpokePool.
//!
//! Deposit parameters that only the Across API knows (quote timestamp, fill
//! deadline, exclusivity) travel in the quote's route data. The planner adds
//! the sender, the recipient and the slippage-bounded output amount.

use super::{chain_address_map, optional_str, route_address, unsupported, PrimaryCall, Settlement};
use crate::context::{ChainScope, PlanContext, TokenRef};
use crate::quoter::Route;
use crate::ActionBuilder;
use alloy::primitives::{address, Address, Bytes, U256};
use async_trait::async_trait;
use planner_abi::{encode_deposit_v3, DepositParams};
use planner_types::{
	validate_status_endpoint, ChainId, ConfigSchema, Field, FieldType, IntentType, PlanError,
	Quote, Result, Schema, StepType, ValidationError, ACROSS_STATUS_ENDPOINT,
};
use serde::Deserialize;
use std::collections::HashMap;

const NAME: &str = "across";

const SPOKE_POOLS: [(ChainId, Address); 5] = [
	(ChainId::ETHEREUM, address!("5c7BCd6E7De5423a257D81B442095A1a6ced35C5")),
	(ChainId::OPTIMISM, address!("6f26Bf09B1C792e3228e5467807a900A503c0281")),
	(ChainId::POLYGON, address!("9295ee1d8C5b022Be115A2AD3c30C72E34e7F096")),
	(ChainId::BASE, address!("09aea4b2242abC8bb4BB78D537A67a245A7bEC64")),
	(ChainId::ARBITRUM, address!("e35e9842fceaCA96570B734083f4a58e8F7C5f2A")),
];

const WRAPPED_NATIVE: [(ChainId, Address); 5] = [
	(ChainId::ETHEREUM, address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2")),
	(ChainId::OPTIMISM, address!("4200000000000000000000000000000000000006")),
	(ChainId::POLYGON, address!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270")),
	(ChainId::BASE, address!("4200000000000000000000000000000000000006")),
	(ChainId::ARBITRUM, address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1")),
];

#[derive(Debug, Deserialize)]
struct DepositRouteData {
	#[serde(alias = "quoteTimestamp")]
	quote_timestamp: Option<u32>,
	#[serde(alias = "fillDeadline")]
	fill_deadline: Option<u32>,
	#[serde(default, alias = "exclusivityDeadline")]
	exclusivity_deadline: u32,
	#[serde(default)]
	message: Option<String>,
}

/// Across V3 bridge provider.
#[derive(Debug, Clone)]
pub struct AcrossProvider {
	spoke_pools: HashMap<ChainId, Address>,
	wrapped_native: HashMap<ChainId, Address>,
	status_endpoint: String,
}

impl Default for AcrossProvider {
	fn default() -> Self {
		Self::new()
	}
}

impl AcrossProvider {
	pub fn new() -> Self {
		Self {
			spoke_pools: SPOKE_POOLS.into_iter().collect(),
			wrapped_native: WRAPPED_NATIVE.into_iter().collect(),
			status_endpoint: ACROSS_STATUS_ENDPOINT.to_string(),
		}
	}

	pub fn with_config(mut self, section: &toml::Value) -> Result<Self> {
		self.spoke_pools.extend(chain_address_map(section, "spoke_pool")?);
		self.wrapped_native
			.extend(chain_address_map(section, "wrapped_native")?);
		if let Some(endpoint) = optional_str(section, "status_endpoint") {
			validate_status_endpoint(NAME, endpoint)?;
			self.status_endpoint = endpoint.trim().to_string();
		}
		Ok(self)
	}

	/// The SpokePool on the origin chain; route data may name it explicitly.
	fn spoke_pool(&self, ctx: &PlanContext<'_>) -> Result<Address> {
		if let Some(pool) = route_address(ctx, "spoke_pool")? {
			return Ok(pool);
		}
		self.spoke_pools
			.get(&ctx.quote.from_chain)
			.copied()
			.ok_or_else(|| unsupported(NAME, format_args!("origin chain {}", ctx.quote.from_chain)))
	}

	fn token_on(&self, token: TokenRef, chain_id: ChainId) -> Result<Address> {
		match token {
			TokenRef::Erc20(address) => Ok(address),
			TokenRef::Native => self.wrapped_native.get(&chain_id).copied().ok_or_else(|| {
				unsupported(NAME, format_args!("native currency on chain {}", chain_id))
			}),
		}
	}

	fn deposit_data(ctx: &PlanContext<'_>) -> Result<(u32, u32, u32, Bytes)> {
		let raw: DepositRouteData = serde_json::from_value(serde_json::Value::Object(
			ctx.route_data()?.clone(),
		))
		.map_err(|e| PlanError::Usage(format!("Invalid Across route_data: {}", e)))?;

		let quote_timestamp = raw
			.quote_timestamp
			.ok_or_else(|| PlanError::missing_field("route_data.quote_timestamp"))?;
		let fill_deadline = raw
			.fill_deadline
			.ok_or_else(|| PlanError::missing_field("route_data.fill_deadline"))?;
		if fill_deadline <= quote_timestamp {
			return Err(PlanError::Usage(format!(
				"fill_deadline {} must be after quote_timestamp {}",
				fill_deadline, quote_timestamp
			)));
		}

		let message = match raw.message.as_deref().map(str::trim) {
			None | Some("") => Bytes::new(),
			Some(hex) => hex
				.parse()
				.map_err(|e| PlanError::Usage(format!("Invalid route_data.message: {}", e)))?,
		};

		Ok((quote_timestamp, fill_deadline, raw.exclusivity_deadline, message))
	}
}

struct AcrossSchema;

impl ConfigSchema for AcrossSchema {
	fn validate(&self, config: &toml::Value) -> std::result::Result<(), ValidationError> {
		let schema = Schema::new(
			// Required fields
			vec![],
			// Optional fields
			vec![
				Field::new(
					"spoke_pool",
					FieldType::ChainMap(Box::new(FieldType::Address)),
				),
				Field::new(
					"wrapped_native",
					FieldType::ChainMap(Box::new(FieldType::Address)),
				),
				Field::new("status_endpoint", FieldType::String).with_validator(|value| {
					let endpoint = value.as_str().unwrap_or_default();
					validate_status_endpoint(NAME, endpoint).map_err(|e| e.to_string())
				}),
			],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl ActionBuilder for AcrossProvider {
	fn name(&self) -> &str {
		NAME
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AcrossSchema)
	}

	fn supports(&self, quote: &Quote) -> Result<()> {
		if quote.intent != IntentType::Bridge {
			return Err(unsupported(NAME, format_args!("{} intents", quote.intent)));
		}
		if !quote.is_cross_chain() {
			return Err(unsupported(NAME, "same-chain transfers"));
		}
		Ok(())
	}

	async fn select_route(&self, ctx: &PlanContext<'_>, _scope: ChainScope<'_>) -> Result<Route> {
		let spoke_pool = self.spoke_pool(ctx)?;
		// Fail on malformed deposit data before any chain read.
		Self::deposit_data(ctx)?;

		let quoted_out = ctx.quote.estimated_out.to_u256()?;
		if quoted_out.is_zero() {
			return Err(PlanError::Unavailable(
				"Across quote has zero output".to_string(),
			));
		}

		let spender = (!ctx.token_in.is_native()).then_some(spoke_pool);
		Ok(Route::pass_through(ctx.quote.route.clone(), quoted_out, spender))
	}

	fn build_primary_call(
		&self,
		ctx: &PlanContext<'_>,
		_route: &Route,
		amount_out_min: U256,
	) -> Result<PrimaryCall> {
		let spoke_pool = self.spoke_pool(ctx)?;
		let (quote_timestamp, fill_deadline, exclusivity_deadline, message) =
			Self::deposit_data(ctx)?;

		let output_token = match route_address(ctx, "output_token")? {
			Some(token) => token,
			None => self.token_on(ctx.token_out, ctx.quote.to_chain)?,
		};

		let data = encode_deposit_v3(&DepositParams {
			depositor: ctx.sender,
			recipient: ctx.recipient,
			input_token: self.token_on(ctx.token_in, ctx.quote.from_chain)?,
			output_token,
			input_amount: ctx.amount_in,
			output_amount: amount_out_min,
			destination_chain_id: ctx.quote.to_chain.0,
			exclusive_relayer: route_address(ctx, "exclusive_relayer")?.unwrap_or(Address::ZERO),
			quote_timestamp,
			fill_deadline,
			exclusivity_deadline,
			message,
		});

		let value = if ctx.token_in.is_native() {
			ctx.amount_in
		} else {
			U256::ZERO
		};

		Ok(PrimaryCall {
			step_type: StepType::BridgeSend,
			target: spoke_pool,
			data,
			value,
			description: format!(
				"Bridge {} {} from chain {} to chain {} via Across",
				ctx.quote.amount_in.base_units,
				ctx.quote.from_asset.label(),
				ctx.quote.from_chain,
				ctx.quote.to_chain
			),
		})
	}

	fn settlement(&self, ctx: &PlanContext<'_>) -> Option<Settlement> {
		Some(Settlement {
			provider: NAME.to_string(),
			status_endpoint: self.status_endpoint.clone(),
			origin_chain: ctx.quote.from_chain,
			destination_chain: ctx.quote.to_chain,
			recipient: ctx.recipient,
		})
	}
}
