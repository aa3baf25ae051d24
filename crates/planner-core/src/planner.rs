//! Action planning.
//!
//! [`Planner::plan`] runs one quote through validation, endpoint resolution,
//! route selection, slippage and the allowance gate, then assembles the
//! ordered steps. Any failure aborts the whole call; no partial action is
//! ever returned.

use crate::allowance::{AllowanceGate, ApprovalCall};
use crate::context::{ChainScope, PlanContext};
use crate::fees::build_fee_breakdown;
use crate::providers::{PrimaryCall, ProviderSet, Settlement};
use crate::quoter::Route;
use crate::ActionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use chrono::Utc;
use planner_chains::{AlloyReader, ChainReader, RetryPolicy, RpcResolver};
use planner_config::{PlannerConfig, PlannerSettings};
use planner_types::units::min_amount_out;
use planner_types::{
	expected_keys, Action, ActionId, ActionStep, ChainId, ExecutionOptions, ExpectedOutputs,
	IntentType, PlanError, Quote, Result, StepStatus, StepType,
};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Builds actions from quotes.
///
/// Holds only read-only configuration; one planner can serve any number of
/// concurrent calls.
#[derive(Clone)]
pub struct Planner {
	reader: Arc<dyn ChainReader>,
	resolver: Arc<RpcResolver>,
	providers: Arc<ProviderSet>,
	settings: PlannerSettings,
}

impl std::fmt::Debug for Planner {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Planner")
			.field("resolver", &self.resolver)
			.field("providers", &self.providers.names())
			.field("settings", &self.settings)
			.finish()
	}
}

impl Planner {
	pub fn new(
		reader: Arc<dyn ChainReader>,
		resolver: RpcResolver,
		providers: ProviderSet,
		settings: PlannerSettings,
	) -> Self {
		Self {
			reader,
			resolver: Arc::new(resolver),
			providers: Arc::new(providers),
			settings,
		}
	}

	/// Planner for a loaded configuration, reading chains through `reader`.
	pub fn from_config(config: &PlannerConfig, reader: Arc<dyn ChainReader>) -> Result<Self> {
		let providers = ProviderSet::from_config(config)?;
		let resolver = RpcResolver::with_endpoints(config.rpc.clone());
		Ok(Self::new(reader, resolver, providers, config.planner.clone()))
	}

	/// Planner for a loaded configuration over HTTP JSON-RPC.
	pub fn with_alloy(config: &PlannerConfig) -> Result<Self> {
		let retry = RetryPolicy::new().with_max_retries(config.planner.rpc_retries);
		Self::from_config(config, Arc::new(AlloyReader::new(retry)))
	}

	pub fn providers(&self) -> &ProviderSet {
		&self.providers
	}

	pub fn settings(&self) -> &PlannerSettings {
		&self.settings
	}

	/// Plans an action, bounded by the configured timeout when one is set.
	pub async fn plan(&self, quote: &Quote, options: &ExecutionOptions) -> Result<Action> {
		match self.settings.timeout_secs {
			Some(secs) => {
				self.plan_with_timeout(quote, options, Duration::from_secs(secs))
					.await
			}
			None => self.build_action(quote, options).await,
		}
	}

	/// Plans an action unless `cancel` resolves first. The configured timeout
	/// still applies.
	///
	/// A cancelled call leaves nothing behind: in-flight reads are dropped and
	/// no partial action is returned.
	pub async fn plan_with_cancel<C>(
		&self,
		quote: &Quote,
		options: &ExecutionOptions,
		cancel: C,
	) -> Result<Action>
	where
		C: Future<Output = ()>,
	{
		tokio::select! {
			biased;
			_ = cancel => {
				info!(provider = %quote.provider, "Planning cancelled by caller");
				Err(PlanError::Cancelled("Planning cancelled by caller".to_string()))
			}
			result = self.plan(quote, options) => result,
		}
	}

	/// Plans an action, giving up after `timeout`.
	pub async fn plan_with_timeout(
		&self,
		quote: &Quote,
		options: &ExecutionOptions,
		timeout: Duration,
	) -> Result<Action> {
		tokio::time::timeout(timeout, self.build_action(quote, options))
			.await
			.map_err(|_| {
				PlanError::Cancelled(format!("Planning timed out after {:?}", timeout))
			})?
	}

	#[instrument(skip_all, fields(provider = %quote.provider, intent = %quote.intent))]
	async fn build_action(&self, quote: &Quote, options: &ExecutionOptions) -> Result<Action> {
		let provider = self.providers.get(&quote.provider)?;
		provider.supports(quote)?;

		let ctx = PlanContext::new(quote, options, self.settings.default_slippage_bps)?;
		let chain_id = quote.from_chain;
		let rpc_url = self.resolver.resolve(chain_id, options.rpc_url.as_deref())?;
		let scope = ChainScope {
			reader: self.reader.as_ref(),
			rpc_url: &rpc_url,
			max_in_flight: self.settings.max_in_flight.max(1),
		};

		info!(
			chain_id = %chain_id,
			amount_in = %ctx.amount_in,
			slippage_bps = ctx.slippage_bps,
			"Planning action"
		);

		let ((), route) = futures::try_join!(
			verify_chain_id(scope, chain_id),
			provider.select_route(&ctx, scope)
		)?;

		let amount_out_min = min_amount_out(route.quoted_out, ctx.slippage_bps);
		debug!(
			route = %route.label,
			quoted_out = %route.quoted_out,
			amount_out_min = %amount_out_min,
			"Route selected"
		);

		let approval = match route.spender {
			Some(spender) => {
				AllowanceGate::new(scope, self.settings.approval_mode)
					.check(ctx.token_in, ctx.sender, spender, ctx.amount_in)
					.await?
			}
			None => None,
		};

		let primary = provider.build_primary_call(&ctx, &route, amount_out_min)?;
		let settlement = provider.settlement(&ctx);

		let id = ActionId::new();
		let mut assembler = StepAssembler::new(&id, chain_id, &rpc_url);
		if let Some(approval) = &approval {
			assembler.push_approval(&ctx, approval);
		}
		assembler.push_primary(primary, amount_out_min, settlement.as_ref());

		let fee_breakdown = match quote.intent {
			IntentType::Bridge => build_fee_breakdown(quote),
			IntentType::Swap => None,
		};

		let steps = assembler.finish();
		let action = Action {
			metadata: metadata(&ctx, &route, amount_out_min),
			id,
			intent: quote.intent,
			provider: provider.name().to_string(),
			chain_id,
			sender: ctx.sender,
			recipient: ctx.recipient,
			amount_in: quote.amount_in.clone(),
			created_at: Utc::now(),
			fee_breakdown,
			steps,
		};

		info!(
			action_id = %action.id,
			steps = action.steps.len(),
			requires_approval = action.requires_approval(),
			amount_out_min = %amount_out_min,
			"Action planned"
		);

		Ok(action)
	}
}

/// Fails with a plan-inconsistent error when the endpoint serves another chain.
async fn verify_chain_id(scope: ChainScope<'_>, expected: ChainId) -> Result<()> {
	let actual = scope.reader.chain_id(scope.rpc_url).await?;
	if actual != expected.0 {
		return Err(PlanError::Inconsistent(format!(
			"RPC endpoint serves chain {} but the quote is for chain {}",
			actual, expected
		)));
	}
	Ok(())
}

fn metadata(ctx: &PlanContext<'_>, route: &Route, amount_out_min: U256) -> BTreeMap<String, String> {
	let quote = ctx.quote;
	let mut metadata = BTreeMap::new();
	metadata.insert("route".to_string(), route.label.clone());
	metadata.insert("quoted_out".to_string(), route.quoted_out.to_string());
	metadata.insert("amount_out_min".to_string(), amount_out_min.to_string());
	metadata.insert("slippage_bps".to_string(), ctx.slippage_bps.to_string());
	metadata.insert("destination_chain".to_string(), quote.to_chain.to_string());
	metadata.insert("destination_asset".to_string(), quote.to_asset.address.clone());
	metadata.insert("simulate_only".to_string(), ctx.simulate_only.to_string());
	if let Some(fee_tier) = route.fee_tier {
		metadata.insert("fee_tier".to_string(), fee_tier.to_string());
	}
	if let Some(gas) = route.gas_estimate {
		metadata.insert("gas_estimate".to_string(), gas.to_string());
	}
	if let Some(secs) = quote.estimated_duration_secs {
		metadata.insert("estimated_duration_secs".to_string(), secs.to_string());
	}
	metadata
}

/// Numbers steps and stamps them with the action's chain and endpoint.
struct StepAssembler<'a> {
	action_id: &'a ActionId,
	chain_id: ChainId,
	rpc_url: &'a str,
	steps: Vec<ActionStep>,
}

impl<'a> StepAssembler<'a> {
	fn new(action_id: &'a ActionId, chain_id: ChainId, rpc_url: &'a str) -> Self {
		Self {
			action_id,
			chain_id,
			rpc_url,
			steps: Vec::with_capacity(2),
		}
	}

	fn push(
		&mut self,
		step_type: StepType,
		description: String,
		target: Address,
		data: Bytes,
		value: U256,
		expected_outputs: ExpectedOutputs,
	) {
		self.steps.push(ActionStep {
			id: format!("{}:{}:{}", self.action_id, self.steps.len(), step_type),
			step_type,
			status: StepStatus::Pending,
			chain_id: self.chain_id,
			rpc_url: self.rpc_url.to_string(),
			description,
			target,
			data,
			value,
			expected_outputs,
		});
	}

	fn push_approval(&mut self, ctx: &PlanContext<'_>, approval: &ApprovalCall) {
		let mut outputs = ExpectedOutputs::new();
		outputs.insert(expected_keys::SPENDER.to_string(), approval.spender.to_string());
		outputs.insert(
			expected_keys::APPROVED_AMOUNT.to_string(),
			approval.amount.to_string(),
		);
		let amount = if approval.amount == U256::MAX {
			"unlimited".to_string()
		} else {
			approval.amount.to_string()
		};
		self.push(
			StepType::Approval,
			format!(
				"Approve {} to spend {} {}",
				approval.spender,
				amount,
				ctx.quote.from_asset.label()
			),
			approval.token,
			approval.data.clone(),
			U256::ZERO,
			outputs,
		);
	}

	fn push_primary(
		&mut self,
		call: PrimaryCall,
		amount_out_min: U256,
		settlement: Option<&Settlement>,
	) {
		let mut outputs = ExpectedOutputs::new();
		outputs.insert(
			expected_keys::AMOUNT_OUT_MIN.to_string(),
			amount_out_min.to_string(),
		);
		if let Some(settlement) = settlement {
			settlement.write_to(&mut outputs);
		}
		self.push(
			call.step_type,
			call.description,
			call.target,
			call.data,
			call.value,
			outputs,
		);
	}

	fn finish(self) -> Vec<ActionStep> {
		self.steps
	}
}
