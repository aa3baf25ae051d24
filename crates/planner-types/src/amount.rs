//! Token amounts in base units.

use crate::errors::{PlanError, Result};
use crate::units::{format_units, parse_u256};
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// An unsigned token amount in base units.
///
/// `base_units` holds digits only with no leading zeros (except `"0"`).
/// `decimal` is the optional human-readable rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
	pub base_units: String,
	pub decimals: u8,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub decimal: Option<String>,
}

impl Amount {
	/// Builds an amount from a base-unit string, rejecting anything that is not
	/// a canonical unsigned decimal integer.
	pub fn new(base_units: impl Into<String>, decimals: u8) -> Result<Self> {
		let base_units = base_units.into();
		validate_base_units(&base_units)?;
		Ok(Self {
			decimal: Some(format_units(&base_units, decimals)),
			base_units,
			decimals,
		})
	}

	pub fn from_u256(value: U256, decimals: u8) -> Self {
		let base_units = value.to_string();
		Self {
			decimal: Some(format_units(&base_units, decimals)),
			base_units,
			decimals,
		}
	}

	/// Exact integer value; fails with a usage error when the string breaks the
	/// base-unit invariant or does not fit in 256 bits.
	pub fn to_u256(&self) -> Result<U256> {
		validate_base_units(&self.base_units)?;
		parse_u256(&self.base_units).ok_or_else(|| {
			PlanError::Usage(format!(
				"Amount {} exceeds the 256-bit token range",
				self.base_units
			))
		})
	}

	pub fn is_zero(&self) -> bool {
		self.base_units == "0"
	}
}

fn validate_base_units(value: &str) -> Result<()> {
	if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
		return Err(PlanError::Usage(format!(
			"Invalid base-unit amount '{}': expected an unsigned integer string",
			value
		)));
	}
	if value.len() > 1 && value.starts_with('0') {
		return Err(PlanError::Usage(format!(
			"Invalid base-unit amount '{}': leading zeros are not allowed",
			value
		)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_new_renders_decimal() {
		let amount = Amount::new("1000000", 6).unwrap();
		assert_eq!(amount.decimal.as_deref(), Some("1"));
		assert_eq!(amount.to_u256().unwrap(), U256::from(1_000_000u64));
	}

	#[test]
	fn test_rejects_non_canonical_strings() {
		for bad in ["", "-1", "1.5", "0x10", "007", "1e18"] {
			assert!(
				matches!(Amount::new(bad, 18), Err(PlanError::Usage(_))),
				"accepted {:?}",
				bad
			);
		}
		assert!(Amount::new("0", 18).unwrap().is_zero());
	}

	#[test]
	fn test_deserialized_amount_is_checked_on_use() {
		let amount: Amount =
			serde_json::from_str(r#"{"base_units":"12.5","decimals":6}"#).unwrap();
		assert!(matches!(amount.to_u256(), Err(PlanError::Usage(_))));
	}

	#[test]
	fn test_beyond_256_bits_is_usage_error() {
		let too_big = format!("1{}", "0".repeat(80));
		let amount = Amount::new(too_big, 18).unwrap();
		assert!(matches!(amount.to_u256(), Err(PlanError::Usage(_))));
	}
}
