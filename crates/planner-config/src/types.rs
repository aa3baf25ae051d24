//! Configuration types for the planner.

use crate::serde_helpers::{deserialize_chain_id_map, serialize_chain_id_map};
use planner_types::{ChainId, DEFAULT_SLIPPAGE_BPS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete planner configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlannerConfig {
	#[serde(default)]
	pub planner: PlannerSettings,
	/// RPC endpoints that take precedence over the built-in defaults.
	#[serde(
		default,
		deserialize_with = "deserialize_chain_id_map",
		serialize_with = "serialize_chain_id_map"
	)]
	pub rpc: HashMap<ChainId, String>,
	/// Provider sections keyed by provider name, e.g. `[providers.taikoswap]`.
	#[serde(default)]
	pub providers: HashMap<String, toml::Value>,
}

impl PlannerConfig {
	/// Section for `provider`, if configured.
	pub fn provider(&self, name: &str) -> Option<&toml::Value> {
		self.providers.get(name)
	}
}

/// How much an approval step grants the spender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalMode {
	/// Exactly the input amount.
	#[default]
	Exact,
	/// `type(uint256).max`.
	Unlimited,
}

/// Planner-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlannerSettings {
	/// Used when a caller leaves slippage unset.
	pub default_slippage_bps: u16,
	/// Cap on concurrent reads per planning call.
	pub max_in_flight: usize,
	pub approval_mode: ApprovalMode,
	/// Retries for transient RPC transport failures.
	pub rpc_retries: u32,
	/// Upper bound on one planning call, in seconds.
	pub timeout_secs: Option<u64>,
}

impl Default for PlannerSettings {
	fn default() -> Self {
		Self {
			default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
			max_in_flight: 4,
			approval_mode: ApprovalMode::default(),
			rpc_retries: 3,
			timeout_secs: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_when_sections_missing() {
		let config: PlannerConfig = toml::from_str("").unwrap();
		assert_eq!(config.planner, PlannerSettings::default());
		assert_eq!(config.planner.default_slippage_bps, 50);
		assert_eq!(config.planner.approval_mode, ApprovalMode::Exact);
		assert!(config.rpc.is_empty());
		assert!(config.providers.is_empty());
	}

	#[test]
	fn test_partial_planner_section() {
		let config: PlannerConfig = toml::from_str(
			r#"
			[planner]
			approval_mode = "unlimited"
			max_in_flight = 2

			[providers.taikoswap]
			fee_tiers = [100, 500]
			"#,
		)
		.unwrap();
		assert_eq!(config.planner.approval_mode, ApprovalMode::Unlimited);
		assert_eq!(config.planner.max_in_flight, 2);
		assert_eq!(config.planner.default_slippage_bps, 50);
		assert!(config.provider("taikoswap").is_some());
		assert!(config.provider("across").is_none());
	}
}
