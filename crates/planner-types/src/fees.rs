//! Bridge fee breakdowns.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a figure came straight from the provider or was computed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
	Reported,
	Derived,
}

/// One fee component in input-token base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeComponent {
	pub base_units: String,
	pub provenance: Provenance,
}

/// Best-effort fee breakdown for a bridge quote.
///
/// Fields that cannot be computed are left out rather than zeroed.
/// `consistent_with_amount_delta` is only present when both the total and the
/// output amount were reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lp_fee: Option<FeeComponent>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub relayer_fee: Option<FeeComponent>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_fee: Option<FeeComponent>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total: Option<FeeComponent>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_decimal: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_usd: Option<Decimal>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fee_percent: Option<Decimal>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub consistent_with_amount_delta: Option<bool>,
}
