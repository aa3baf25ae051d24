//! Validated inputs for one planning call.

use alloy::primitives::{Address, U256};
use planner_chains::ChainReader;
use planner_types::{
	parse_address, Asset, ExecutionOptions, PlanError, Quote, Result, DEFAULT_SLIPPAGE_BPS,
	MAX_SLIPPAGE_BPS,
};
use std::fmt;

/// An asset as the planner handles it on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRef {
	/// The chain's native currency, moved as call value.
	Native,
	Erc20(Address),
}

impl TokenRef {
	/// Parses an asset; native sentinels become [`TokenRef::Native`].
	pub fn from_asset(field: &str, asset: &Asset) -> Result<Self> {
		if asset.is_native() {
			return Ok(TokenRef::Native);
		}
		parse_address(field, &asset.address).map(TokenRef::Erc20)
	}

	pub fn erc20(&self) -> Option<Address> {
		match self {
			TokenRef::Native => None,
			TokenRef::Erc20(address) => Some(*address),
		}
	}

	pub fn is_native(&self) -> bool {
		matches!(self, TokenRef::Native)
	}
}

impl fmt::Display for TokenRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TokenRef::Native => write!(f, "native"),
			TokenRef::Erc20(address) => write!(f, "{}", address),
		}
	}
}

/// Applies the slippage rules: unset or non-positive falls back to
/// `default_bps`; 10000 and above is a usage error, for the default too.
pub fn normalize_slippage(requested: Option<i64>, default_bps: u16) -> Result<u16> {
	if i64::from(default_bps) >= MAX_SLIPPAGE_BPS {
		return Err(PlanError::Usage(format!(
			"Default slippage must be below {} bps, got {}",
			MAX_SLIPPAGE_BPS, default_bps
		)));
	}

	match requested {
		None => Ok(default_bps),
		Some(bps) if bps <= 0 => Ok(default_bps),
		Some(bps) if bps >= MAX_SLIPPAGE_BPS => Err(PlanError::Usage(format!(
			"Slippage must be below {} bps, got {}",
			MAX_SLIPPAGE_BPS, bps
		))),
		// Strictly between 0 and 10000, so it fits.
		Some(bps) => Ok(bps as u16),
	}
}

/// Everything a provider needs to know about the call, already validated.
#[derive(Debug, Clone)]
pub struct PlanContext<'a> {
	pub quote: &'a Quote,
	pub sender: Address,
	pub recipient: Address,
	pub token_in: TokenRef,
	pub token_out: TokenRef,
	pub amount_in: U256,
	pub slippage_bps: u16,
	pub simulate_only: bool,
}

impl<'a> PlanContext<'a> {
	/// Validates addresses, the input amount and slippage.
	pub fn new(quote: &'a Quote, options: &ExecutionOptions, default_slippage_bps: u16) -> Result<Self> {
		if options.sender.trim().is_empty() {
			return Err(PlanError::missing_field("sender"));
		}
		let sender = parse_address("sender", &options.sender)?;
		let recipient = match options.recipient.as_deref().map(str::trim) {
			Some(r) if !r.is_empty() => parse_address("recipient", r)?,
			_ => sender,
		};

		let token_in = TokenRef::from_asset("input token", &quote.from_asset)?;
		let token_out = TokenRef::from_asset("output token", &quote.to_asset)?;

		let amount_in = quote.amount_in.to_u256()?;
		if amount_in.is_zero() {
			return Err(PlanError::Usage("Input amount must be positive".to_string()));
		}

		let default_bps = if default_slippage_bps == 0 {
			DEFAULT_SLIPPAGE_BPS
		} else {
			default_slippage_bps
		};
		let slippage_bps = normalize_slippage(options.slippage_bps, default_bps)?;

		Ok(Self {
			quote,
			sender,
			recipient,
			token_in,
			token_out,
			amount_in,
			slippage_bps,
			simulate_only: options.simulate_only,
		})
	}

	/// Provider route data as a JSON object.
	pub fn route_data(&self) -> Result<&'a serde_json::Map<String, serde_json::Value>> {
		self.quote
			.route_data
			.as_ref()
			.ok_or_else(|| PlanError::missing_field("route_data"))?
			.as_object()
			.ok_or_else(|| PlanError::Usage("route_data must be a JSON object".to_string()))
	}
}

/// Chain access for one planning call: a reader bound to the resolved
/// endpoint plus the fan-out limit.
#[derive(Clone, Copy)]
pub struct ChainScope<'a> {
	pub reader: &'a dyn ChainReader,
	pub rpc_url: &'a str,
	pub max_in_flight: usize,
}

impl fmt::Debug for ChainScope<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChainScope")
			.field("rpc_url", &self.rpc_url)
			.field("max_in_flight", &self.max_in_flight)
			.finish()
	}
}
