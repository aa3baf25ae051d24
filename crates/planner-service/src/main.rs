use anyhow::{Context, Result};
use clap::Parser;
use planner_config::{ConfigLoader, PlannerConfig};
use planner_core::{Planner, ProviderSet};
use planner_types::{Action, ExecutionOptions, PlanError, Quote};
use std::path::Path;
use tokio::signal;
use tracing::info;

mod cli;
mod logging;

use cli::{Args, Command, PlanArgs};
use logging::{init_tracing, TracingConfig};

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	init_tracing(
		TracingConfig::new()
			.with_filter(&args.log_level)
			.with_json_format(args.json_logs),
	)?;

	let config = load_config(args.config.as_deref())?;

	match args.command {
		Command::Plan(plan) => run_plan(config, plan).await,
		Command::Validate => validate_config(&config),
	}
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
	let mut loader = ConfigLoader::new();
	if let Some(path) = path {
		info!("Loading configuration from: {:?}", path);
		loader = loader.with_file(path);
	}
	loader.load().context("Failed to load configuration")
}

fn load_quote(path: &Path) -> Result<Quote> {
	let raw = std::fs::read_to_string(path)
		.with_context(|| format!("Failed to read quote file {}", path.display()))?;
	serde_json::from_str(&raw).with_context(|| format!("Invalid quote in {}", path.display()))
}

fn execution_options(args: &PlanArgs) -> ExecutionOptions {
	ExecutionOptions {
		sender: args.sender.clone(),
		recipient: args.recipient.clone(),
		slippage_bps: args.slippage_bps,
		simulate_only: args.simulate,
		rpc_url: args.rpc_url.clone(),
	}
}

async fn run_plan(mut config: PlannerConfig, args: PlanArgs) -> Result<()> {
	if args.timeout_secs.is_some() {
		config.planner.timeout_secs = args.timeout_secs;
	}

	let quote = load_quote(&args.quote)?;
	let options = execution_options(&args);
	let planner = Planner::with_alloy(&config).context("Failed to build planner")?;

	let action = planner
		.plan_with_cancel(&quote, &options, shutdown_signal())
		.await
		.map_err(|e| describe("Planning failed", e))?;

	print_action(&action, args.pretty)
}

fn validate_config(config: &PlannerConfig) -> Result<()> {
	let providers = ProviderSet::from_config(config)
		.map_err(|e| describe("Invalid configuration", e))?;

	info!("Configuration is valid");
	println!("Configuration is valid");
	println!("Providers: {}", providers.names().join(", "));
	for chain in configured_chains(config) {
		println!("RPC override for chain {}", chain);
	}
	Ok(())
}

fn configured_chains(config: &PlannerConfig) -> Vec<u64> {
	let mut chains: Vec<u64> = config.rpc.keys().map(|c| c.0).collect();
	chains.sort_unstable();
	chains
}

fn print_action(action: &Action, pretty: bool) -> Result<()> {
	let json = if pretty {
		serde_json::to_string_pretty(action)
	} else {
		serde_json::to_string(action)
	}
	.context("Failed to serialize action")?;
	println!("{}", json);
	Ok(())
}

/// Tags a planning error with its kind so scripts can tell retryable
/// failures apart.
fn describe(what: &str, err: PlanError) -> anyhow::Error {
	let retry = if err.is_retryable() { ", retryable" } else { "" };
	let context = format!("{} ({}{})", what, err.kind(), retry);
	anyhow::Error::new(err).context(context)
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if signal::ctrl_c().await.is_err() {
			// Without a handler, never cancel.
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(_) => std::future::pending::<()>().await,
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
	info!("Shutdown signal received, cancelling");
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
		let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
		file.write_all(contents.as_bytes()).unwrap();
		file
	}

	#[test]
	fn test_load_quote() {
		let file = temp_file(
			".json",
			r#"{
				"provider": "uniswap-v3",
				"intent": "swap",
				"from_chain": 1,
				"to_chain": 1,
				"from_asset": { "address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "decimals": 6 },
				"to_asset": { "address": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", "decimals": 18 },
				"amount_in": { "base_units": "1000000", "decimals": 6 },
				"estimated_out": { "base_units": "2000", "decimals": 18 },
				"route": "USDC->WETH"
			}"#,
		);
		let quote = load_quote(file.path()).unwrap();
		assert_eq!(quote.provider, "uniswap-v3");

		let bad = temp_file(".json", "{ \"provider\": 1 }");
		assert!(load_quote(bad.path()).is_err());
	}

	#[test]
	fn test_validate_rejects_bad_provider_section() {
		let file = temp_file(
			".toml",
			r#"
			[providers.across]
			status_endpoint = "https://evil.example/status"
			"#,
		);
		let config = load_config(Some(file.path())).unwrap();
		let err = validate_config(&config).unwrap_err();
		assert!(format!("{:#}", err).contains("usage"));
	}

	#[test]
	fn test_validate_accepts_defaults() {
		let config = PlannerConfig::default();
		assert!(validate_config(&config).is_ok());
	}

	#[test]
	fn test_describe_marks_retryable_errors() {
		let err = describe("Planning failed", PlanError::Unavailable("rpc down".into()));
		assert!(err.to_string().contains("unavailable, retryable"));
		let err = describe("Planning failed", PlanError::Usage("bad sender".into()));
		assert_eq!(err.to_string(), "Planning failed (usage)");
	}
}
