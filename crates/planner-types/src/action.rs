//! Planner inputs and outputs: execution options, actions and steps.

use crate::amount::Amount;
use crate::chains::ChainId;
use crate::common::Id;
use crate::fees::FeeBreakdown;
use crate::quote::IntentType;
use alloy::primitives::{Address, Bytes, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Slippage used when the caller leaves it unset or non-positive.
pub const DEFAULT_SLIPPAGE_BPS: u16 = 50;

/// Slippage must stay strictly below this many basis points.
pub const MAX_SLIPPAGE_BPS: i64 = 10_000;

/// Keys written into [`ExpectedOutputs`].
pub mod expected_keys {
	pub const AMOUNT_OUT_MIN: &str = "amount_out_min";
	pub const SPENDER: &str = "spender";
	pub const APPROVED_AMOUNT: &str = "approved_amount";
	pub const SETTLEMENT_PROVIDER: &str = "settlement_provider";
	pub const SETTLEMENT_STATUS_ENDPOINT: &str = "settlement_status_endpoint";
	pub const SETTLEMENT_ORIGIN_CHAIN: &str = "settlement_origin_chain";
	pub const SETTLEMENT_DESTINATION_CHAIN: &str = "settlement_destination_chain";
	pub const SETTLEMENT_RECIPIENT: &str = "settlement_recipient";
}

/// What the caller wants done with a quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOptions {
	pub sender: String,
	/// Defaults to the sender.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub recipient: Option<String>,
	/// Basis points; unset or non-positive falls back to 50.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub slippage_bps: Option<i64>,
	#[serde(default)]
	pub simulate_only: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rpc_url: Option<String>,
}

impl ExecutionOptions {
	pub fn new(sender: impl Into<String>) -> Self {
		Self {
			sender: sender.into(),
			..Default::default()
		}
	}

	pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
		self.recipient = Some(recipient.into());
		self
	}

	pub fn with_slippage_bps(mut self, bps: i64) -> Self {
		self.slippage_bps = Some(bps);
		self
	}

	pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
		self.rpc_url = Some(url.into());
		self
	}

	pub fn simulate_only(mut self, simulate: bool) -> Self {
		self.simulate_only = simulate;
		self
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionTag;

pub type ActionId = Id<ActionTag>;

/// Kind of on-chain work a step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
	Approval,
	Swap,
	BridgeSend,
}

impl fmt::Display for StepType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StepType::Approval => write!(f, "approval"),
			StepType::Swap => write!(f, "swap"),
			StepType::BridgeSend => write!(f, "bridge_send"),
		}
	}
}

/// Steps are always created pending; execution happens elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
	#[default]
	Pending,
}

/// Minimum-output guarantees and settlement-tracking metadata.
pub type ExpectedOutputs = BTreeMap<String, String>;

/// One unsigned transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
	pub id: String,
	pub step_type: StepType,
	pub status: StepStatus,
	pub chain_id: ChainId,
	pub rpc_url: String,
	pub description: String,
	pub target: Address,
	pub data: Bytes,
	pub value: U256,
	pub expected_outputs: ExpectedOutputs,
}

/// The planner's output: an ordered list of steps ready for signing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
	pub id: ActionId,
	pub intent: IntentType,
	pub provider: String,
	pub chain_id: ChainId,
	pub sender: Address,
	pub recipient: Address,
	pub amount_in: Amount,
	pub created_at: DateTime<Utc>,
	pub metadata: BTreeMap<String, String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee_breakdown: Option<FeeBreakdown>,
	pub steps: Vec<ActionStep>,
}

impl Action {
	pub fn step_types(&self) -> Vec<StepType> {
		self.steps.iter().map(|s| s.step_type).collect()
	}

	pub fn requires_approval(&self) -> bool {
		self.steps.iter().any(|s| s.step_type == StepType::Approval)
	}
}
