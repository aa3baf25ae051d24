//! Serde helpers for chain-id keyed tables.
//!
//! TOML table keys are always strings, so `[rpc]` entries such as
//! `8453 = "..."` or `"eip155:8453" = "..."` arrive as text and are parsed
//! into [`ChainId`] here.

use planner_types::ChainId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

pub fn deserialize_chain_id_map<'de, D, T>(deserializer: D) -> Result<HashMap<ChainId, T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	let map = HashMap::<String, T>::deserialize(deserializer)?;

	map.into_iter()
		.map(|(k, v)| {
			k.parse::<ChainId>()
				.map(|id| (id, v))
				.map_err(|_| serde::de::Error::custom(format!("Invalid chain ID: {}", k)))
		})
		.collect()
}

pub fn serialize_chain_id_map<S, T>(
	map: &HashMap<ChainId, T>,
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: Serializer,
	T: Serialize,
{
	let string_map: HashMap<String, &T> = map.iter().map(|(k, v)| (k.to_string(), v)).collect();

	string_map.serialize(serializer)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Deserialize, Serialize)]
	struct Endpoints {
		#[serde(
			deserialize_with = "deserialize_chain_id_map",
			serialize_with = "serialize_chain_id_map"
		)]
		rpc: HashMap<ChainId, String>,
	}

	#[test]
	fn test_numeric_and_caip2_keys() {
		let toml = r#"
            [rpc]
            1 = "https://eth.example.com"
            "eip155:167000" = "https://taiko.example.com"
        "#;

		let parsed: Endpoints = toml::from_str(toml).unwrap();
		assert_eq!(parsed.rpc[&ChainId::ETHEREUM], "https://eth.example.com");
		assert_eq!(parsed.rpc[&ChainId::TAIKO], "https://taiko.example.com");
	}

	#[test]
	fn test_bad_key_is_rejected() {
		let toml = r#"
            [rpc]
            mainnet = "https://eth.example.com"
        "#;
		let err = toml::from_str::<Endpoints>(toml).unwrap_err();
		assert!(err.to_string().contains("Invalid chain ID: mainnet"));
	}

	#[test]
	fn test_serializes_with_numeric_keys() {
		let parsed = Endpoints {
			rpc: HashMap::from([(ChainId::BASE, "https://base.example.com".to_string())]),
		};
		let out = toml::to_string(&parsed).unwrap();
		assert!(out.contains("8453 = \"https://base.example.com\""));
	}
}
