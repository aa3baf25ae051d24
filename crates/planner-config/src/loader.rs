//! Configuration loading from files and environment.

use crate::types::PlannerConfig;
use crate::ConfigError;
use planner_types::{ChainId, MAX_SLIPPAGE_BPS};
use regex::Regex;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration loader with `${VAR}` substitution and environment overrides.
///
/// Overrides read from the environment, with the default `PLANNER_` prefix:
/// `PLANNER_RPC_URL_<chain id>`, `PLANNER_DEFAULT_SLIPPAGE_BPS`,
/// `PLANNER_MAX_IN_FLIGHT` and `PLANNER_APPROVAL_MODE`.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
	file_path: Option<PathBuf>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "PLANNER_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_path_buf());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	/// Loads the file (or defaults when no file is set), applies environment
	/// overrides and validates the result.
	pub fn load(&self) -> Result<PlannerConfig, ConfigError> {
		let mut config = match &self.file_path {
			Some(path) => self.load_from_file(path)?,
			None => PlannerConfig::default(),
		};

		self.apply_overrides(&mut config, env::vars())?;
		Self::validate(&config)?;
		Ok(config)
	}

	fn load_from_file(&self, path: &Path) -> Result<PlannerConfig, ConfigError> {
		info!("Loading configuration from {:?}", path);
		if !path.exists() {
			return Err(ConfigError::FileNotFound(path.display().to_string()));
		}

		let raw = std::fs::read_to_string(path)?;
		let contents = substitute_vars(&raw, |name| env::var(name).ok())?;

		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml(&contents),
			Some("json") => Self::from_json(&contents),
			Some("yaml") | Some("yml") => Self::from_yaml(&contents),
			_ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
		}
	}

	pub fn from_toml(contents: &str) -> Result<PlannerConfig, ConfigError> {
		toml::from_str(contents)
			.map_err(|e| ConfigError::ParseError(format!("Failed to parse TOML: {}", e)))
	}

	pub fn from_json(contents: &str) -> Result<PlannerConfig, ConfigError> {
		serde_json::from_str(contents)
			.map_err(|e| ConfigError::ParseError(format!("Failed to parse JSON: {}", e)))
	}

	pub fn from_yaml(contents: &str) -> Result<PlannerConfig, ConfigError> {
		serde_yaml::from_str(contents)
			.map_err(|e| ConfigError::ParseError(format!("Failed to parse YAML: {}", e)))
	}

	/// Applies `<prefix>*` overrides from `vars`.
	pub fn apply_overrides<I>(&self, config: &mut PlannerConfig, vars: I) -> Result<(), ConfigError>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let rpc_prefix = format!("{}RPC_URL_", self.env_prefix);
		let slippage_key = format!("{}DEFAULT_SLIPPAGE_BPS", self.env_prefix);
		let in_flight_key = format!("{}MAX_IN_FLIGHT", self.env_prefix);
		let approval_key = format!("{}APPROVAL_MODE", self.env_prefix);

		for (key, value) in vars {
			if let Some(chain) = key.strip_prefix(&rpc_prefix) {
				let chain_id: ChainId = chain.parse().map_err(|_| {
					ConfigError::ValidationError(format!("Invalid chain ID in {}: {}", key, chain))
				})?;
				debug!("Overriding RPC URL for chain {} from environment", chain_id);
				config.rpc.insert(chain_id, value);
			} else if key == slippage_key {
				config.planner.default_slippage_bps = value.parse().map_err(|e| {
					ConfigError::ValidationError(format!("Invalid {}: {}", key, e))
				})?;
			} else if key == in_flight_key {
				config.planner.max_in_flight = value.parse().map_err(|e| {
					ConfigError::ValidationError(format!("Invalid {}: {}", key, e))
				})?;
			} else if key == approval_key {
				config.planner.approval_mode =
					serde_json::from_value(serde_json::Value::String(value.to_lowercase()))
						.map_err(|_| {
							ConfigError::ValidationError(format!(
								"Invalid {}: expected exact or unlimited",
								key
							))
						})?;
			}
		}

		Ok(())
	}

	/// Checks the settings and endpoints; provider sections are checked by
	/// their providers.
	pub fn validate(config: &PlannerConfig) -> Result<(), ConfigError> {
		let bps = config.planner.default_slippage_bps;
		if bps == 0 || i64::from(bps) >= MAX_SLIPPAGE_BPS {
			return Err(ConfigError::ValidationError(format!(
				"default_slippage_bps must be between 1 and {}, got {}",
				MAX_SLIPPAGE_BPS - 1,
				bps
			)));
		}

		if config.planner.max_in_flight == 0 {
			return Err(ConfigError::ValidationError(
				"max_in_flight must be at least 1".to_string(),
			));
		}

		if config.planner.timeout_secs == Some(0) {
			return Err(ConfigError::ValidationError(
				"timeout_secs must be positive when set".to_string(),
			));
		}

		for (chain_id, url) in &config.rpc {
			if !(url.starts_with("http://") || url.starts_with("https://")) {
				return Err(ConfigError::ValidationError(format!(
					"RPC URL for chain {} must start with http:// or https://",
					chain_id
				)));
			}
		}

		Ok(())
	}
}

/// Replaces every `${NAME}` with `lookup(NAME)`; an unresolved name is an error.
pub(crate) fn substitute_vars<F>(content: &str, lookup: F) -> Result<String, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::ParseError(e.to_string()))?;

	let mut missing = None;
	let result = re.replace_all(content, |caps: &regex::Captures| match lookup(&caps[1]) {
		Some(value) => value,
		None => {
			missing.get_or_insert_with(|| caps[1].to_string());
			String::new()
		}
	});

	match missing {
		Some(name) => Err(ConfigError::EnvVarNotFound(name)),
		None => Ok(result.into_owned()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::ApprovalMode;
	use std::io::Write;

	const SAMPLE: &str = r#"
[planner]
default_slippage_bps = 75
max_in_flight = 3

[rpc]
167000 = "https://rpc.mainnet.taiko.xyz"

[providers.taikoswap]
fee_tiers = [100, 500, 3000, 10000]

[providers.taikoswap.quoter]
167000 = "0xcBa70D57be34aA26557B8E80135a9B7754680aDb"
"#;

	fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn test_toml_parsing() {
		let config = ConfigLoader::from_toml(SAMPLE).unwrap();
		assert_eq!(config.planner.default_slippage_bps, 75);
		assert_eq!(config.planner.max_in_flight, 3);
		assert_eq!(
			config.rpc.get(&ChainId::TAIKO).map(String::as_str),
			Some("https://rpc.mainnet.taiko.xyz")
		);
		let section = config.provider("taikoswap").unwrap();
		assert_eq!(section["fee_tiers"].as_array().unwrap().len(), 4);
	}

	#[test]
	fn test_substitution_in_file_contents() {
		let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
		writeln!(file, "[rpc]\n1 = \"${{ETH_RPC}}\"").unwrap();

		let raw = std::fs::read_to_string(file.path()).unwrap();
		let substituted = substitute_vars(&raw, |name| {
			(name == "ETH_RPC").then(|| "https://eth.example.com".to_string())
		})
		.unwrap();
		let config = ConfigLoader::from_toml(&substituted).unwrap();
		assert_eq!(config.rpc[&ChainId::ETHEREUM], "https://eth.example.com");
	}

	#[test]
	fn test_missing_variable_is_reported() {
		let err = substitute_vars("url = \"${NOPE}\"", |_| None).unwrap_err();
		assert!(matches!(err, ConfigError::EnvVarNotFound(name) if name == "NOPE"));
	}

	#[test]
	fn test_load_file_formats() {
		let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
		toml_file.write_all(SAMPLE.as_bytes()).unwrap();
		let config = ConfigLoader::new()
			.with_env_prefix("PLANNER_TEST_UNUSED_")
			.with_file(toml_file.path())
			.load()
			.unwrap();
		assert_eq!(config.planner.default_slippage_bps, 75);

		let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
		json_file
			.write_all(br#"{"planner": {"approval_mode": "unlimited"}, "rpc": {"8453": "https://base.example.com"}}"#)
			.unwrap();
		let config = ConfigLoader::new()
			.with_env_prefix("PLANNER_TEST_UNUSED_")
			.with_file(json_file.path())
			.load()
			.unwrap();
		assert_eq!(config.planner.approval_mode, ApprovalMode::Unlimited);
		assert_eq!(config.rpc[&ChainId::BASE], "https://base.example.com");

		let ini_file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
		let err = ConfigLoader::new().with_file(ini_file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::UnsupportedFormat(_)));

		let err = ConfigLoader::new()
			.with_file("/definitely/not/here.toml")
			.load()
			.unwrap_err();
		assert!(matches!(err, ConfigError::FileNotFound(_)));
	}

	#[test]
	fn test_env_overrides() {
		let loader = ConfigLoader::new();
		let mut config = PlannerConfig::default();
		loader
			.apply_overrides(
				&mut config,
				vars(&[
					("PLANNER_RPC_URL_8453", "http://127.0.0.1:8545"),
					("PLANNER_DEFAULT_SLIPPAGE_BPS", "30"),
					("PLANNER_APPROVAL_MODE", "Unlimited"),
					("UNRELATED", "x"),
				]),
			)
			.unwrap();

		assert_eq!(config.rpc[&ChainId::BASE], "http://127.0.0.1:8545");
		assert_eq!(config.planner.default_slippage_bps, 30);
		assert_eq!(config.planner.approval_mode, ApprovalMode::Unlimited);

		let err = loader
			.apply_overrides(&mut config, vars(&[("PLANNER_RPC_URL_base", "http://x")]))
			.unwrap_err();
		assert!(matches!(err, ConfigError::ValidationError(_)));
	}

	#[test]
	fn test_validation() {
		let mut config = PlannerConfig::default();
		assert!(ConfigLoader::validate(&config).is_ok());

		config.planner.default_slippage_bps = 10_000;
		assert!(ConfigLoader::validate(&config).is_err());

		config.planner.default_slippage_bps = 50;
		config.planner.max_in_flight = 0;
		assert!(ConfigLoader::validate(&config).is_err());

		config.planner.max_in_flight = 4;
		config.rpc.insert(ChainId::ETHEREUM, "wss://eth.example.com".into());
		assert!(ConfigLoader::validate(&config).is_err());
	}
}
