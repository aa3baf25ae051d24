//! Uniswap routing API swaps, executed from the API's prebuilt transaction.

use super::{enforce_min_out, route_address, unsupported, PrebuiltTx, PrimaryCall};
use crate::context::{ChainScope, PlanContext};
use crate::quoter::Route;
use crate::ActionBuilder;
use alloy::primitives::U256;
use async_trait::async_trait;
use planner_types::{
	ConfigSchema, IntentType, PlanError, Quote, Result, Schema, StepType, ValidationError,
};

const NAME: &str = "uniswap-api";
const TRANSACTION_FIELD: &str = "transaction";
const SPENDER_FIELD: &str = "spender";
const MIN_OUT_FIELD: &str = "min_amount_out";

#[derive(Debug, Clone, Default)]
pub struct UniswapApiProvider;

impl UniswapApiProvider {
	pub fn new() -> Self {
		Self
	}

	pub fn with_config(self, _section: &toml::Value) -> Result<Self> {
		Ok(self)
	}
}

struct UniswapApiSchema;

impl ConfigSchema for UniswapApiSchema {
	fn validate(&self, config: &toml::Value) -> std::result::Result<(), ValidationError> {
		Schema::new(vec![], vec![]).validate(config)
	}
}

#[async_trait]
impl ActionBuilder for UniswapApiProvider {
	fn name(&self) -> &str {
		NAME
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(UniswapApiSchema)
	}

	fn supports(&self, quote: &Quote) -> Result<()> {
		if quote.intent != IntentType::Swap {
			return Err(unsupported(NAME, format_args!("{} intents", quote.intent)));
		}
		if quote.is_cross_chain() {
			return Err(unsupported(NAME, "cross-chain swaps"));
		}
		Ok(())
	}

	async fn select_route(&self, ctx: &PlanContext<'_>, _scope: ChainScope<'_>) -> Result<Route> {
		let tx = PrebuiltTx::from_route_data(ctx, TRANSACTION_FIELD)?;

		// The API routes through its own router, which is also the spender
		// unless the quote names one.
		let spender = if ctx.token_in.is_native() {
			None
		} else {
			Some(route_address(ctx, SPENDER_FIELD)?.unwrap_or(tx.to))
		};

		let quoted_out = ctx.quote.estimated_out.to_u256()?;
		if quoted_out.is_zero() {
			return Err(PlanError::Unavailable(
				"Uniswap API quote has zero output".to_string(),
			));
		}

		Ok(Route::pass_through(ctx.quote.route.clone(), quoted_out, spender).with_prebuilt(tx))
	}

	fn build_primary_call(
		&self,
		ctx: &PlanContext<'_>,
		route: &Route,
		amount_out_min: U256,
	) -> Result<PrimaryCall> {
		let tx = route.prebuilt.as_ref().ok_or_else(|| {
			PlanError::Internal("Uniswap API route without a transaction".to_string())
		})?;
		enforce_min_out(ctx, MIN_OUT_FIELD, amount_out_min)?;

		Ok(PrimaryCall {
			step_type: StepType::Swap,
			target: tx.to,
			data: tx.data.clone(),
			value: tx.value,
			description: format!(
				"Swap {} {} for {} via the Uniswap API",
				ctx.quote.amount_in.base_units,
				ctx.quote.from_asset.label(),
				ctx.quote.to_asset.label()
			),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::address;
	use planner_chains::{ChainError, ChainReader};
	use planner_types::{Amount, Asset, ChainId, ExecutionOptions};
	use serde_json::json;

	struct NoChain;

	#[async_trait]
	impl ChainReader for NoChain {
		async fn chain_id(&self, _rpc_url: &str) -> std::result::Result<u64, ChainError> {
			Err(ChainError::Transport("unused".into()))
		}

		async fn call(
			&self,
			_rpc_url: &str,
			_to: alloy::primitives::Address,
			_data: alloy::primitives::Bytes,
		) -> std::result::Result<alloy::primitives::Bytes, ChainError> {
			Err(ChainError::Transport("unused".into()))
		}
	}

	fn quote(route_data: serde_json::Value) -> Quote {
		Quote {
			provider: NAME.into(),
			intent: IntentType::Swap,
			from_chain: ChainId::BASE,
			to_chain: ChainId::BASE,
			from_asset: Asset {
				address: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".into(),
				symbol: Some("USDC".into()),
				decimals: 6,
			},
			to_asset: Asset {
				address: "0x4200000000000000000000000000000000000006".into(),
				symbol: Some("WETH".into()),
				decimals: 18,
			},
			amount_in: Amount::new("5000000", 6).unwrap(),
			estimated_out: Amount::new("1700000000000000", 18).unwrap(),
			estimated_out_source: Default::default(),
			fees: None,
			estimated_duration_secs: None,
			route: "uniswap-api:CLASSIC".into(),
			route_data: Some(route_data),
		}
	}

	const UNIVERSAL_ROUTER: &str = "0x6fF5693b99212Da76ad316178A184AB56D299b43";

	#[tokio::test]
	async fn test_spender_defaults_to_transaction_target() {
		let q = quote(json!({
			"transaction": { "to": UNIVERSAL_ROUTER, "data": "0x3593564c", "value": "0" },
			"min_amount_out": "1691500000000000"
		}));
		let ctx = PlanContext::new(
			&q,
			&ExecutionOptions::new("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
			50,
		)
		.unwrap();
		let scope = ChainScope {
			reader: &NoChain,
			rpc_url: "http://127.0.0.1:8545",
			max_in_flight: 1,
		};

		let provider = UniswapApiProvider::new();
		provider.supports(&q).unwrap();
		let route = provider.select_route(&ctx, scope).await.unwrap();
		let router = address!("6fF5693b99212Da76ad316178A184AB56D299b43");
		assert_eq!(route.spender, Some(router));

		let call = provider
			.build_primary_call(&ctx, &route, U256::from(1_691_500_000_000_000u64))
			.unwrap();
		assert_eq!(call.step_type, StepType::Swap);
		assert_eq!(call.target, router);
		assert_eq!(call.value, U256::ZERO);

		assert!(matches!(
			provider.build_primary_call(&ctx, &route, U256::from(1_691_500_000_000_001u64)),
			Err(PlanError::Inconsistent(_))
		));
	}

	#[test]
	fn test_rejects_bridges() {
		let mut q = quote(json!({}));
		q.to_chain = ChainId::ARBITRUM;
		assert!(matches!(
			UniswapApiProvider::new().supports(&q),
			Err(PlanError::Unsupported(_))
		));
	}
}
