//! Chain identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// EVM chain identifier.
///
/// Parses both the bare numeric form (`8453`) and the CAIP-2 form
/// (`eip155:8453`) that provider adapters emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "ChainIdRepr", into = "u64")]
pub struct ChainId(pub u64);

impl ChainId {
	pub const ETHEREUM: Self = Self(1);
	pub const OPTIMISM: Self = Self(10);
	pub const POLYGON: Self = Self(137);
	pub const BASE: Self = Self(8453);
	pub const ARBITRUM: Self = Self(42161);
	pub const TAIKO: Self = Self(167000);

	/// CAIP-2 rendering, e.g. `eip155:1`.
	pub fn caip2(&self) -> String {
		format!("eip155:{}", self.0)
	}

	pub fn name(&self) -> Option<&'static str> {
		match self.0 {
			1 => Some("Ethereum"),
			10 => Some("Optimism"),
			137 => Some("Polygon"),
			8453 => Some("Base"),
			42161 => Some("Arbitrum One"),
			167000 => Some("Taiko"),
			_ => None,
		}
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for ChainId {
	type Err = std::num::ParseIntError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		let digits = s.trim().strip_prefix("eip155:").unwrap_or(s.trim());
		Ok(ChainId(digits.parse()?))
	}
}

impl From<ChainId> for u64 {
	fn from(id: ChainId) -> Self {
		id.0
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChainIdRepr {
	Number(u64),
	Text(String),
}

impl TryFrom<ChainIdRepr> for ChainId {
	type Error = String;

	fn try_from(repr: ChainIdRepr) -> std::result::Result<Self, Self::Error> {
		match repr {
			ChainIdRepr::Number(n) => Ok(ChainId(n)),
			ChainIdRepr::Text(s) => s
				.parse()
				.map_err(|_| format!("Invalid chain ID: {}", s)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_numeric_and_caip2() {
		assert_eq!("8453".parse::<ChainId>().unwrap(), ChainId::BASE);
		assert_eq!("eip155:42161".parse::<ChainId>().unwrap(), ChainId::ARBITRUM);
		assert!("solana:mainnet".parse::<ChainId>().is_err());
		assert_eq!(ChainId::ETHEREUM.caip2(), "eip155:1");
	}

	#[test]
	fn test_serde_accepts_both_forms() {
		let a: ChainId = serde_json::from_str("10").unwrap();
		let b: ChainId = serde_json::from_str("\"eip155:10\"").unwrap();
		assert_eq!(a, b);
		assert_eq!(serde_json::to_string(&a).unwrap(), "10");
	}
}
