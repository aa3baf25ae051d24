//! LI.FI routes, executed from the provider's own transaction request.

use super::{
	enforce_min_out, optional_str, route_address, unsupported, PrebuiltTx, PrimaryCall, Settlement,
};
use crate::context::{ChainScope, PlanContext};
use crate::quoter::Route;
use crate::ActionBuilder;
use alloy::primitives::U256;
use async_trait::async_trait;
use planner_types::{
	validate_status_endpoint, ConfigSchema, Field, FieldType, IntentType, PlanError, Quote,
	Result, Schema, StepType, ValidationError, LIFI_STATUS_ENDPOINT,
};

const NAME: &str = "lifi";
const TRANSACTION_FIELD: &str = "transaction_request";
const SPENDER_FIELD: &str = "approval_address";
const MIN_OUT_FIELD: &str = "to_amount_min";

/// LI.FI aggregator; swaps and bridges pass through unchanged.
#[derive(Debug, Clone)]
pub struct LiFiProvider {
	status_endpoint: String,
}

impl Default for LiFiProvider {
	fn default() -> Self {
		Self::new()
	}
}

impl LiFiProvider {
	pub fn new() -> Self {
		Self {
			status_endpoint: LIFI_STATUS_ENDPOINT.to_string(),
		}
	}

	pub fn with_config(mut self, section: &toml::Value) -> Result<Self> {
		if let Some(endpoint) = optional_str(section, "status_endpoint") {
			validate_status_endpoint(NAME, endpoint)?;
			self.status_endpoint = endpoint.trim().to_string();
		}
		Ok(self)
	}
}

struct LiFiSchema;

impl ConfigSchema for LiFiSchema {
	fn validate(&self, config: &toml::Value) -> std::result::Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![
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
impl ActionBuilder for LiFiProvider {
	fn name(&self) -> &str {
		NAME
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LiFiSchema)
	}

	fn supports(&self, quote: &Quote) -> Result<()> {
		if quote.intent == IntentType::Bridge && !quote.is_cross_chain() {
			return Err(unsupported(NAME, "bridge intents within one chain"));
		}
		Ok(())
	}

	async fn select_route(&self, ctx: &PlanContext<'_>, _scope: ChainScope<'_>) -> Result<Route> {
		let tx = PrebuiltTx::from_route_data(ctx, TRANSACTION_FIELD)?;

		let spender = if ctx.token_in.is_native() {
			None
		} else {
			Some(route_address(ctx, SPENDER_FIELD)?.ok_or_else(|| {
				PlanError::missing_field(&format!("route_data.{}", SPENDER_FIELD))
			})?)
		};

		let quoted_out = ctx.quote.estimated_out.to_u256()?;
		if quoted_out.is_zero() {
			return Err(PlanError::Unavailable("LI.FI quote has zero output".to_string()));
		}

		Ok(Route::pass_through(ctx.quote.route.clone(), quoted_out, spender).with_prebuilt(tx))
	}

	fn build_primary_call(
		&self,
		ctx: &PlanContext<'_>,
		route: &Route,
		amount_out_min: U256,
	) -> Result<PrimaryCall> {
		let tx = route
			.prebuilt
			.as_ref()
			.ok_or_else(|| PlanError::Internal("LI.FI route without a transaction".to_string()))?;
		enforce_min_out(ctx, MIN_OUT_FIELD, amount_out_min)?;

		let (step_type, verb) = match ctx.quote.intent {
			IntentType::Bridge => (StepType::BridgeSend, "Bridge"),
			IntentType::Swap => (StepType::Swap, "Swap"),
		};

		Ok(PrimaryCall {
			step_type,
			target: tx.to,
			data: tx.data.clone(),
			value: tx.value,
			description: format!(
				"{} {} {} via LI.FI ({})",
				verb,
				ctx.quote.amount_in.base_units,
				ctx.quote.from_asset.label(),
				route.label
			),
		})
	}

	fn settlement(&self, ctx: &PlanContext<'_>) -> Option<Settlement> {
		ctx.quote.is_cross_chain().then(|| Settlement {
			provider: NAME.to_string(),
			status_endpoint: self.status_endpoint.clone(),
			origin_chain: ctx.quote.from_chain,
			destination_chain: ctx.quote.to_chain,
			recipient: ctx.recipient,
		})
	}
}
