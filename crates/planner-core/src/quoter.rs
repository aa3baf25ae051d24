//! Route quoting.
//!
//! On-chain providers probe every configured fee tier through the quoter
//! contract and keep the best answer. REST-style providers already hold a
//! single best route and pass it through unchanged.

use crate::context::ChainScope;
use crate::providers::PrebuiltTx;
use alloy::primitives::{Address, U256};
use planner_abi::{decode_quote_exact_input_single, encode_quote_exact_input_single};
use planner_chains::join_bounded;
use planner_types::{PlanError, Result};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// One fee tier that produced a usable quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteCandidate {
	/// Position of the tier in the configured list.
	pub index: usize,
	pub fee_tier: u32,
	pub amount_out: U256,
	pub gas_estimate: U256,
}

/// The route a provider committed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
	pub label: String,
	/// Output the route is expected to deliver before slippage.
	pub quoted_out: U256,
	/// Contract that pulls the input token; `None` when nothing needs approval.
	pub spender: Option<Address>,
	pub fee_tier: Option<u32>,
	pub gas_estimate: Option<U256>,
	/// Provider-built transaction for pass-through routes.
	pub prebuilt: Option<PrebuiltTx>,
}

impl Route {
	/// A route taken verbatim from the provider's quote.
	pub fn pass_through(label: impl Into<String>, quoted_out: U256, spender: Option<Address>) -> Self {
		Self {
			label: label.into(),
			quoted_out,
			spender,
			fee_tier: None,
			gas_estimate: None,
			prebuilt: None,
		}
	}

	pub fn with_prebuilt(mut self, tx: PrebuiltTx) -> Self {
		self.prebuilt = Some(tx);
		self
	}
}

/// Picks the candidate with the strictly greatest output; an exact tie goes
/// to the lower gas estimate, and a full tie to the earlier tier.
pub fn select_best(candidates: &[RouteCandidate]) -> Option<RouteCandidate> {
	let mut best: Option<RouteCandidate> = None;
	for candidate in candidates {
		let better = match &best {
			None => true,
			Some(current) => match candidate.amount_out.cmp(&current.amount_out) {
				Ordering::Greater => true,
				Ordering::Equal => candidate.gas_estimate < current.gas_estimate,
				Ordering::Less => false,
			},
		};
		if better {
			best = Some(*candidate);
		}
	}
	best
}

/// Simulates `quoteExactInputSingle` for every tier and returns the winner.
///
/// Tiers that revert, return undecodable data or quote zero output are
/// skipped. Fails with an unavailable error when no tier survives.
pub async fn probe_fee_tiers(
	scope: ChainScope<'_>,
	quoter: Address,
	token_in: Address,
	token_out: Address,
	amount_in: U256,
	fee_tiers: &[u32],
) -> Result<RouteCandidate> {
	if fee_tiers.is_empty() {
		return Err(PlanError::Unsupported("No fee tiers configured".to_string()));
	}

	let mut calls = Vec::with_capacity(fee_tiers.len());
	for fee in fee_tiers {
		calls.push(encode_quote_exact_input_single(token_in, token_out, amount_in, *fee)?);
	}

	let probes = calls.into_iter().map(|data| scope.reader.call(scope.rpc_url, quoter, data));
	let results = join_bounded(probes, scope.max_in_flight).await;

	let mut candidates = Vec::with_capacity(results.len());
	for (index, (fee_tier, result)) in fee_tiers.iter().zip(results).enumerate() {
		let raw = match result {
			Ok(raw) => raw,
			Err(e) => {
				warn!(fee_tier, error = %e, "Skipping fee tier: quote call failed");
				continue;
			}
		};
		let quote = match decode_quote_exact_input_single(&raw) {
			Ok(quote) => quote,
			Err(e) => {
				warn!(fee_tier, error = %e, "Skipping fee tier: undecodable quote");
				continue;
			}
		};
		if quote.amount_out.is_zero() {
			warn!(fee_tier, "Skipping fee tier: zero output");
			continue;
		}
		debug!(
			fee_tier,
			amount_out = %quote.amount_out,
			gas_estimate = %quote.gas_estimate,
			"Fee tier quoted"
		);
		candidates.push(RouteCandidate {
			index,
			fee_tier: *fee_tier,
			amount_out: quote.amount_out,
			gas_estimate: quote.gas_estimate,
		});
	}

	select_best(&candidates).ok_or_else(|| {
		PlanError::Unavailable(format!(
			"No fee tier of {:?} returned a usable quote",
			fee_tiers
		))
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn candidate(index: usize, out: u64, gas: u64) -> RouteCandidate {
		RouteCandidate {
			index,
			fee_tier: [100, 500, 3000, 10000][index],
			amount_out: U256::from(out),
			gas_estimate: U256::from(gas),
		}
	}

	#[test]
	fn test_greatest_output_wins() {
		let best = select_best(&[
			candidate(0, 1000, 70_000),
			candidate(1, 2000, 70_000),
			candidate(2, 1500, 70_000),
		])
		.unwrap();
		assert_eq!(best.index, 1);
		assert_eq!(best.fee_tier, 500);
	}

	#[test]
	fn test_tie_goes_to_lower_gas_then_earlier_tier() {
		let best = select_best(&[
			candidate(0, 2000, 90_000),
			candidate(1, 2000, 60_000),
			candidate(2, 2000, 60_000),
		])
		.unwrap();
		assert_eq!(best.index, 1);
	}

	#[test]
	fn test_lower_gas_never_beats_more_output() {
		let best = select_best(&[candidate(0, 1999, 1), candidate(1, 2000, 1_000_000)]).unwrap();
		assert_eq!(best.index, 1);
	}

	#[test]
	fn test_empty_has_no_winner() {
		assert!(select_best(&[]).is_none());
	}
}
