//! Bridge fee breakdowns.
//!
//! Fee data is informational, so this never fails: anything that cannot be
//! parsed or computed is left out of the breakdown.

use alloy::primitives::U256;
use planner_types::units::{self, format_units};
use planner_types::{AmountSource, FeeBreakdown, FeeComponent, Provenance, ProviderFees, Quote};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

fn reported(value: Option<&String>) -> Option<FeeComponent> {
	let value = value?.trim();
	if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	Some(FeeComponent {
		base_units: units::trim_leading_zeros(value),
		provenance: Provenance::Reported,
	})
}

/// Sums components when the provider gave no total. `None` on overflow or
/// when there is nothing to sum.
fn derived_total(components: &[&Option<FeeComponent>]) -> Option<FeeComponent> {
	let mut sum: Option<U256> = None;
	for component in components.iter().copied().flatten() {
		let value = units::parse_u256(&component.base_units)?;
		sum = Some(sum.unwrap_or_default().checked_add(value)?);
	}
	sum.map(|s| FeeComponent {
		base_units: s.to_string(),
		provenance: Provenance::Derived,
	})
}

fn percent_of(total: &str, amount_in: &str) -> Option<Decimal> {
	let total = Decimal::from_str(total).ok()?;
	let amount_in = Decimal::from_str(amount_in).ok()?;
	if amount_in.is_zero() {
		return None;
	}
	total
		.checked_mul(Decimal::ONE_HUNDRED)?
		.checked_div(amount_in)
		.map(|p| p.round_dp(4))
}

/// Builds the best-effort fee breakdown for `quote`.
///
/// Returns `None` when the provider reported no fee data at all. The
/// consistency flag is set only when both the total fee and the output
/// amount were reported by the provider.
pub fn build_fee_breakdown(quote: &Quote) -> Option<FeeBreakdown> {
	let fees: &ProviderFees = quote.fees.as_ref()?;

	let lp_fee = reported(fees.lp_fee.as_ref());
	let relayer_fee = reported(fees.relayer_fee.as_ref());
	let gas_fee = reported(fees.gas_fee.as_ref());
	let total = reported(fees.total.as_ref())
		.or_else(|| derived_total(&[&lp_fee, &relayer_fee, &gas_fee]));

	if lp_fee.is_none()
		&& relayer_fee.is_none()
		&& gas_fee.is_none()
		&& total.is_none()
		&& fees.total_usd.is_none()
		&& fees.percent.is_none()
	{
		return None;
	}

	let consistent_with_amount_delta = match &total {
		Some(total)
			if total.provenance == Provenance::Reported
				&& quote.estimated_out_source == AmountSource::Provider =>
		{
			let delta = units::subtract(&quote.amount_in.base_units, &quote.estimated_out.base_units);
			Some(units::compare(&delta, &total.base_units) == Ordering::Equal)
		}
		_ => None,
	};

	let fee_percent = fees.percent.or_else(|| {
		total
			.as_ref()
			.and_then(|t| percent_of(&t.base_units, &quote.amount_in.base_units))
	});

	Some(FeeBreakdown {
		total_decimal: total
			.as_ref()
			.map(|t| format_units(&t.base_units, quote.from_asset.decimals)),
		lp_fee,
		relayer_fee,
		gas_fee,
		total,
		total_usd: fees.total_usd,
		fee_percent,
		consistent_with_amount_delta,
	})
}
