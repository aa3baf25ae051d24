//! Concentrated-liquidity AMMs quoted on-chain (TaikoSwap, Uniswap V3).
//!
//! The route is chosen by simulating `quoteExactInputSingle` on every fee
//! tier. The swap goes through `SwapRouter02::exactInputSingle`, with the
//! router as the approval spender.

use super::{chain_address_map, unsupported, PrimaryCall};
use crate::context::{ChainScope, PlanContext};
use crate::quoter::{probe_fee_tiers, Route};
use crate::ActionBuilder;
use alloy::primitives::{address, Address, U256};
use async_trait::async_trait;
use planner_abi::{encode_exact_input_single, ExactInputSingle};
use planner_types::{
	ChainId, ConfigSchema, Field, FieldType, IntentType, PlanError, Quote, Result, Schema,
	StepType, ValidationError,
};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_FEE_TIERS: [u32; 4] = [100, 500, 3000, 10000];

const UNISWAP_QUOTER_V2: Address = address!("61fFE014bA17989E743c5F6cB21bF9697530B21e");
const UNISWAP_SWAP_ROUTER_02: Address = address!("68b3465833fb72A70ecDF485E0e4C7bD8665Fc45");
const BASE_QUOTER_V2: Address = address!("3d4e44Eb1374240CE5F1B871ab261CD16335B76a");
const BASE_SWAP_ROUTER_02: Address = address!("2626664c2603336E57B271c5C0b26F421741e481");

/// An AMM provider with per-chain quoter and router deployments.
#[derive(Debug, Clone)]
pub struct AmmProvider {
	name: &'static str,
	quoters: HashMap<ChainId, Address>,
	routers: HashMap<ChainId, Address>,
	fee_tiers: Vec<u32>,
}

impl AmmProvider {
	/// TaikoSwap; deployments come from `[providers.taikoswap]`.
	pub fn taikoswap() -> Self {
		Self {
			name: "taikoswap",
			quoters: HashMap::new(),
			routers: HashMap::new(),
			fee_tiers: DEFAULT_FEE_TIERS.to_vec(),
		}
	}

	/// Uniswap V3 with the canonical deployments on Ethereum, Optimism,
	/// Polygon, Arbitrum and Base.
	pub fn uniswap_v3() -> Self {
		let mut quoters = HashMap::new();
		let mut routers = HashMap::new();
		for chain in [
			ChainId::ETHEREUM,
			ChainId::OPTIMISM,
			ChainId::POLYGON,
			ChainId::ARBITRUM,
		] {
			quoters.insert(chain, UNISWAP_QUOTER_V2);
			routers.insert(chain, UNISWAP_SWAP_ROUTER_02);
		}
		quoters.insert(ChainId::BASE, BASE_QUOTER_V2);
		routers.insert(ChainId::BASE, BASE_SWAP_ROUTER_02);

		Self {
			name: "uniswap-v3",
			quoters,
			routers,
			fee_tiers: DEFAULT_FEE_TIERS.to_vec(),
		}
	}

	/// Layers configured deployments and fee tiers over the built-ins.
	pub fn with_config(mut self, section: &toml::Value) -> Result<Self> {
		self.quoters.extend(chain_address_map(section, "quoter")?);
		self.routers.extend(chain_address_map(section, "router")?);

		if let Some(tiers) = section.get("fee_tiers").and_then(|v| v.as_array()) {
			self.fee_tiers = tiers
				.iter()
				.map(|t| {
					t.as_integer()
						.and_then(|t| u32::try_from(t).ok())
						.ok_or_else(|| PlanError::Usage(format!("Invalid fee tier: {}", t)))
				})
				.collect::<Result<_>>()?;
		}
		Ok(self)
	}

	pub fn fee_tiers(&self) -> &[u32] {
		&self.fee_tiers
	}

	fn deployment(&self, chain_id: ChainId) -> Result<(Address, Address)> {
		match (self.quoters.get(&chain_id), self.routers.get(&chain_id)) {
			(Some(quoter), Some(router)) => Ok((*quoter, *router)),
			_ => Err(unsupported(self.name, format_args!("chain {}", chain_id))),
		}
	}

	fn tokens(&self, ctx: &PlanContext<'_>) -> Result<(Address, Address)> {
		match (ctx.token_in.erc20(), ctx.token_out.erc20()) {
			(Some(token_in), Some(token_out)) => Ok((token_in, token_out)),
			_ => Err(unsupported(
				self.name,
				"native assets; quote the wrapped token instead",
			)),
		}
	}
}

struct AmmSchema;

impl ConfigSchema for AmmSchema {
	fn validate(&self, config: &toml::Value) -> std::result::Result<(), ValidationError> {
		let schema = Schema::new(
			// Required fields
			vec![],
			// Optional fields
			vec![
				Field::new("quoter", FieldType::ChainMap(Box::new(FieldType::Address))),
				Field::new("router", FieldType::ChainMap(Box::new(FieldType::Address))),
				Field::new(
					"fee_tiers",
					FieldType::Array(Box::new(FieldType::Integer {
						min: Some(1),
						max: Some((1 << 24) - 1),
					})),
				)
				.with_validator(|value| match value.as_array() {
					Some(tiers) if tiers.is_empty() => Err("at least one fee tier is required".to_string()),
					_ => Ok(()),
				}),
			],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl ActionBuilder for AmmProvider {
	fn name(&self) -> &str {
		self.name
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AmmSchema)
	}

	fn supports(&self, quote: &Quote) -> Result<()> {
		if quote.intent != IntentType::Swap {
			return Err(unsupported(self.name, format_args!("{} intents", quote.intent)));
		}
		if quote.is_cross_chain() {
			return Err(unsupported(self.name, "cross-chain swaps"));
		}
		self.deployment(quote.from_chain).map(|_| ())
	}

	async fn select_route(&self, ctx: &PlanContext<'_>, scope: ChainScope<'_>) -> Result<Route> {
		let (quoter, router) = self.deployment(ctx.quote.from_chain)?;
		let (token_in, token_out) = self.tokens(ctx)?;

		let best = probe_fee_tiers(
			scope,
			quoter,
			token_in,
			token_out,
			ctx.amount_in,
			&self.fee_tiers,
		)
		.await?;
		debug!(
			provider = self.name,
			fee_tier = best.fee_tier,
			amount_out = %best.amount_out,
			"Selected fee tier"
		);

		Ok(Route {
			label: format!(
				"{}:{}->{}@{}",
				self.name,
				ctx.quote.from_asset.label(),
				ctx.quote.to_asset.label(),
				best.fee_tier
			),
			quoted_out: best.amount_out,
			spender: Some(router),
			fee_tier: Some(best.fee_tier),
			gas_estimate: Some(best.gas_estimate),
			prebuilt: None,
		})
	}

	fn build_primary_call(
		&self,
		ctx: &PlanContext<'_>,
		route: &Route,
		amount_out_min: U256,
	) -> Result<PrimaryCall> {
		let (_, router) = self.deployment(ctx.quote.from_chain)?;
		let (token_in, token_out) = self.tokens(ctx)?;
		let fee = route
			.fee_tier
			.ok_or_else(|| PlanError::Internal("AMM route without a fee tier".to_string()))?;

		let data = encode_exact_input_single(&ExactInputSingle {
			token_in,
			token_out,
			fee,
			recipient: ctx.recipient,
			amount_in: ctx.amount_in,
			amount_out_min,
		})?;

		Ok(PrimaryCall {
			step_type: StepType::Swap,
			target: router,
			data,
			value: U256::ZERO,
			description: format!(
				"Swap {} {} for at least {} {} on {} (fee tier {})",
				ctx.quote.amount_in.base_units,
				ctx.quote.from_asset.label(),
				amount_out_min,
				ctx.quote.to_asset.label(),
				self.name,
				fee
			),
		})
	}
}
