//! Provider-built transactions for pass-through routes.
//!
//! REST providers hand back a ready transaction request. The planner does not
//! re-encode it, but it does check that it targets the quoted chain and the
//! caller's wallet before trusting it.

use crate::context::PlanContext;
use alloy::primitives::{Address, Bytes, U256};
use planner_types::{parse_address, ChainId, PlanError, Result};
use serde::Deserialize;

/// A transaction request exactly as the provider built it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrebuiltTx {
	pub to: Address,
	pub data: Bytes,
	pub value: U256,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTx {
	to: String,
	data: String,
	#[serde(default)]
	value: Option<serde_json::Value>,
	#[serde(default, alias = "chain_id")]
	chain_id: Option<ChainId>,
	#[serde(default)]
	from: Option<String>,
}

/// Parses a quantity given as a decimal string, a `0x` hex string or a JSON
/// number.
fn parse_quantity(field: &str, value: &serde_json::Value) -> Result<U256> {
	let invalid = || PlanError::Usage(format!("Invalid {}: {}", field, value));
	match value {
		serde_json::Value::Null => Ok(U256::ZERO),
		serde_json::Value::Number(n) => n.as_u64().map(U256::from).ok_or_else(invalid),
		serde_json::Value::String(s) => {
			let s = s.trim();
			if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
				if hex.is_empty() {
					return Ok(U256::ZERO);
				}
				U256::from_str_radix(hex, 16).map_err(|_| invalid())
			} else {
				planner_types::units::parse_u256(s).ok_or_else(invalid)
			}
		}
		_ => Err(invalid()),
	}
}

impl PrebuiltTx {
	/// Reads `route_data[field]` and checks it against the planning context.
	///
	/// A transaction built for another chain or another sender contradicts the
	/// plan and is rejected as inconsistent.
	pub fn from_route_data(ctx: &PlanContext<'_>, field: &str) -> Result<Self> {
		let value = ctx
			.route_data()?
			.get(field)
			.ok_or_else(|| PlanError::missing_field(&format!("route_data.{}", field)))?;
		let raw: RawTx = serde_json::from_value(value.clone())
			.map_err(|e| PlanError::Usage(format!("Invalid route_data.{}: {}", field, e)))?;

		if let Some(chain_id) = raw.chain_id {
			if chain_id != ctx.quote.from_chain {
				return Err(PlanError::Inconsistent(format!(
					"Provider transaction targets chain {} but the quote starts on chain {}",
					chain_id, ctx.quote.from_chain
				)));
			}
		}

		if let Some(from) = raw.from.as_deref() {
			let from = parse_address(&format!("route_data.{}.from", field), from)?;
			if from != ctx.sender {
				return Err(PlanError::Inconsistent(format!(
					"Provider transaction was built for {} but the sender is {}",
					from, ctx.sender
				)));
			}
		}

		let to = parse_address(&format!("route_data.{}.to", field), &raw.to)?;
		let data: Bytes = raw
			.data
			.trim()
			.parse()
			.map_err(|e| PlanError::Usage(format!("Invalid route_data.{}.data: {}", field, e)))?;
		if data.is_empty() {
			return Err(PlanError::Usage(format!(
				"route_data.{}.data must not be empty",
				field
			)));
		}

		let value = match &raw.value {
			Some(v) => parse_quantity(&format!("route_data.{}.value", field), v)?,
			None => U256::ZERO,
		};
		if ctx.token_in.is_native() && value < ctx.amount_in {
			return Err(PlanError::Inconsistent(format!(
				"Provider transaction sends {} native units but the input amount is {}",
				value, ctx.amount_in
			)));
		}

		Ok(Self { to, data, value })
	}
}

/// Reads the minimum output the provider baked into its transaction from
/// `route_data[field]` and checks that it is at least `amount_out_min`.
///
/// The planner cannot rewrite provider calldata, so a looser provider bound
/// would leave the planned minimum unenforced on chain.
pub fn enforce_min_out(ctx: &PlanContext<'_>, field: &str, amount_out_min: U256) -> Result<U256> {
	let label = format!("route_data.{}", field);
	let provider_min = match ctx.route_data()?.get(field) {
		None | Some(serde_json::Value::Null) => return Err(PlanError::missing_field(&label)),
		Some(raw) => parse_quantity(&label, raw)?,
	};

	if provider_min < amount_out_min {
		return Err(PlanError::Inconsistent(format!(
			"Provider transaction only guarantees {} output units but slippage requires at least {}",
			provider_min, amount_out_min
		)));
	}
	Ok(provider_min)
}
