//! Common types and helpers used throughout the planner.

use crate::errors::{PlanError, Result};
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for various entities
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
	value: uuid::Uuid,
	#[serde(skip)]
	_phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Id<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Id<T> {
	pub fn new() -> Self {
		Self {
			value: uuid::Uuid::new_v4(),
			_phantom: std::marker::PhantomData,
		}
	}
}

impl<T> fmt::Display for Id<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.value)
	}
}

/// Sentinel addresses providers use for a chain's native currency.
pub const NATIVE_SENTINELS: [&str; 2] = [
	"0x0000000000000000000000000000000000000000",
	"0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
];

/// Parses a `0x`-prefixed 20-byte hex address.
///
/// `field` names the offending input in the usage error.
pub fn parse_address(field: &str, value: &str) -> Result<Address> {
	let trimmed = value.trim();
	if trimmed.len() != 42 || !(trimmed.starts_with("0x") || trimmed.starts_with("0X")) {
		return Err(PlanError::Usage(format!(
			"Invalid {} address '{}': expected 0x followed by 40 hex characters",
			field, value
		)));
	}
	trimmed
		.parse::<Address>()
		.map_err(|e| PlanError::Usage(format!("Invalid {} address '{}': {}", field, value, e)))
}

/// Returns true when the address string denotes the chain's native currency.
pub fn is_native_address(value: &str) -> bool {
	let lower = value.trim().to_ascii_lowercase();
	lower.is_empty() || lower == "native" || NATIVE_SENTINELS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_id_generation() {
		#[derive(Debug, PartialEq)]
		struct TestType;
		let id1 = Id::<TestType>::new();
		let id2 = Id::<TestType>::new();

		// IDs should be unique
		assert_ne!(id1, id2);
	}

	#[test]
	fn test_parse_address() {
		let addr = parse_address("sender", "0x00000000000000000000000000000000000000aa").unwrap();
		assert_eq!(addr.as_slice()[19], 0xaa);

		assert!(matches!(
			parse_address("sender", "0xabc"),
			Err(PlanError::Usage(_))
		));
		assert!(matches!(
			parse_address("sender", "00000000000000000000000000000000000000aa00"),
			Err(PlanError::Usage(_))
		));
		assert!(matches!(
			parse_address("sender", "0xzz000000000000000000000000000000000000aa"),
			Err(PlanError::Usage(_))
		));
	}

	#[test]
	fn test_native_sentinels() {
		assert!(is_native_address("0x0000000000000000000000000000000000000000"));
		assert!(is_native_address("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE"));
		assert!(is_native_address("native"));
		assert!(!is_native_address("0x00000000000000000000000000000000000000aa"));
	}
}
