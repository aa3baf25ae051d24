//! Normalized provider quotes.
//!
//! A [`Quote`] is produced by an external provider adapter and consumed
//! read-only by the planner. Provider-specific route details that the planner
//! needs (bridge deposit parameters, a prebuilt transaction) ride along in
//! `route_data` and are interpreted by the matching provider.

use crate::amount::Amount;
use crate::chains::ChainId;
use crate::common::is_native_address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user wants to do with the quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
	Swap,
	Bridge,
}

impl fmt::Display for IntentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			IntentType::Swap => write!(f, "swap"),
			IntentType::Bridge => write!(f, "bridge"),
		}
	}
}

/// An asset on a specific chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
	/// Token contract address, or a native sentinel.
	pub address: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub symbol: Option<String>,
	pub decimals: u8,
}

impl Asset {
	pub fn is_native(&self) -> bool {
		is_native_address(&self.address)
	}

	/// Symbol when known, otherwise the address.
	pub fn label(&self) -> &str {
		self.symbol.as_deref().unwrap_or(&self.address)
	}
}

/// Where an amount came from. Unlabelled amounts count as derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSource {
	/// Reported verbatim by the provider.
	Provider,
	/// Estimated locally by an adapter.
	#[default]
	Derived,
}

/// Raw fee fields exactly as a provider reported them.
///
/// Providers report anything from a bare percentage to a full absolute
/// breakdown; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderFees {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lp_fee: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub relayer_fee: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_fee: Option<String>,
	/// Absolute total in input-token base units.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_usd: Option<Decimal>,
	/// Total fee as a percentage of the input amount.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub percent: Option<Decimal>,
}

/// A normalized quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
	pub provider: String,
	pub intent: IntentType,
	pub from_chain: ChainId,
	pub to_chain: ChainId,
	pub from_asset: Asset,
	pub to_asset: Asset,
	pub amount_in: Amount,
	pub estimated_out: Amount,
	#[serde(default)]
	pub estimated_out_source: AmountSource,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fees: Option<ProviderFees>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub estimated_duration_secs: Option<u64>,
	pub route: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub route_data: Option<serde_json::Value>,
}

impl Quote {
	pub fn is_cross_chain(&self) -> bool {
		self.from_chain != self.to_chain
	}
}
