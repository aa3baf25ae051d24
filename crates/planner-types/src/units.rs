//! Exact arithmetic over base-unit decimal strings.
//!
//! Token amounts travel as unsigned decimal strings. Nothing in the amount
//! path ever touches a float. Values that fit in 256 bits are handled with
//! [`U256`]; longer strings still obey the same contracts through the
//! digit-wise paths below.

use alloy::primitives::U256;
use std::cmp::Ordering;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Normalizes a base-unit string.
///
/// Strips leading zeros and never returns an empty string. Input containing
/// anything but ASCII digits is treated as `"0"`.
pub fn trim_leading_zeros(value: &str) -> String {
	if !value.bytes().all(|b| b.is_ascii_digit()) {
		return "0".to_string();
	}
	let trimmed = value.trim_start_matches('0');
	if trimmed.is_empty() {
		"0".to_string()
	} else {
		trimmed.to_string()
	}
}

/// Compares two base-unit strings numerically.
pub fn compare(a: &str, b: &str) -> Ordering {
	let a = trim_leading_zeros(a);
	let b = trim_leading_zeros(b);
	// Digits only and no leading zeros, so length decides first.
	a.len().cmp(&b.len()).then_with(|| a.cmp(&b))
}

/// Saturating subtraction: returns `"0"` whenever `a <= b`.
pub fn subtract(a: &str, b: &str) -> String {
	let a = trim_leading_zeros(a);
	let b = trim_leading_zeros(b);
	if compare(&a, &b) != Ordering::Greater {
		return "0".to_string();
	}

	match (parse_u256(&a), parse_u256(&b)) {
		(Some(x), Some(y)) => (x - y).to_string(),
		_ => subtract_digits(&a, &b),
	}
}

/// Parses a normalized-or-not base-unit string into a [`U256`].
///
/// Returns `None` for non-digit input, empty input, or values above 2^256 - 1.
pub fn parse_u256(value: &str) -> Option<U256> {
	if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	U256::from_str_radix(value, 10).ok()
}

/// Minimum acceptable output for a quoted amount.
///
/// `floor(quoted * (10000 - bps) / 10000)`; `bps` at or above 10000 yields zero.
pub fn min_amount_out(quoted: U256, slippage_bps: u16) -> U256 {
	let bps = u64::from(slippage_bps).min(BPS_DENOMINATOR);
	let keep = U256::from(BPS_DENOMINATOR - bps);
	let denominator = U256::from(BPS_DENOMINATOR);
	match quoted.checked_mul(keep) {
		Some(scaled) => scaled / denominator,
		// quoted * keep overflowed 256 bits; divide first and add back the remainder share.
		None => {
			let whole = (quoted / denominator) * keep;
			let rest = (quoted % denominator) * keep / denominator;
			whole + rest
		}
	}
}

/// Renders base units as a human-readable decimal string.
///
/// `format_units("1500000", 6) == "1.5"`; trailing fractional zeros are dropped.
pub fn format_units(base_units: &str, decimals: u8) -> String {
	let digits = trim_leading_zeros(base_units);
	let decimals = decimals as usize;
	if decimals == 0 {
		return digits;
	}

	let padded = if digits.len() <= decimals {
		format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
	} else {
		digits
	};
	let (whole, fraction) = padded.split_at(padded.len() - decimals);
	let fraction = fraction.trim_end_matches('0');
	if fraction.is_empty() {
		whole.to_string()
	} else {
		format!("{}.{}", whole, fraction)
	}
}

fn subtract_digits(a: &str, b: &str) -> String {
	let a = a.as_bytes();
	let b = b.as_bytes();
	let mut out = Vec::with_capacity(a.len());
	let mut borrow = 0i8;

	for i in 0..a.len() {
		let da = (a[a.len() - 1 - i] - b'0') as i8;
		let db = if i < b.len() {
			(b[b.len() - 1 - i] - b'0') as i8
		} else {
			0
		};
		let mut d = da - db - borrow;
		if d < 0 {
			d += 10;
			borrow = 1;
		} else {
			borrow = 0;
		}
		out.push(b'0' + d as u8);
	}

	out.reverse();
	trim_leading_zeros(&String::from_utf8_lossy(&out))
}
