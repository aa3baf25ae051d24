//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "defi-plan")]
#[command(about = "Turns provider quotes into unsigned execution steps", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
	/// Path to configuration file (TOML, JSON or YAML)
	#[arg(short, long, env = "PLANNER_CONFIG", global = true)]
	pub config: Option<PathBuf>,

	/// Log filter (trace, debug, info, warn, error, or a full directive)
	#[arg(short, long, env = "PLANNER_LOG_LEVEL", default_value = "warn", global = true)]
	pub log_level: String,

	/// Emit logs as JSON lines
	#[arg(long, global = true)]
	pub json_logs: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Plan an action for a quote and print it as JSON
	Plan(PlanArgs),

	/// Validate the configuration, including every provider section
	Validate,
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
	/// Normalized quote, as JSON
	#[arg(short, long, value_name = "FILE")]
	pub quote: PathBuf,

	/// Address that signs and funds the steps
	#[arg(short, long)]
	pub sender: String,

	/// Address receiving the output; defaults to the sender
	#[arg(short, long)]
	pub recipient: Option<String>,

	/// Slippage tolerance in basis points
	#[arg(long, allow_negative_numbers = true)]
	pub slippage_bps: Option<i64>,

	/// RPC endpoint override for the origin chain
	#[arg(long, env = "PLANNER_RPC_URL")]
	pub rpc_url: Option<String>,

	/// Mark the action as simulate-only
	#[arg(long)]
	pub simulate: bool,

	/// Give up after this many seconds
	#[arg(long)]
	pub timeout_secs: Option<u64>,

	/// Pretty-print the action
	#[arg(long)]
	pub pretty: bool,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_plan_arguments() {
		let args = Args::try_parse_from([
			"defi-plan",
			"plan",
			"--quote",
			"quote.json",
			"--sender",
			"0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
			"--slippage-bps",
			"-5",
			"--simulate",
			"--config",
			"planner.toml",
		])
		.unwrap();

		assert_eq!(args.config, Some(PathBuf::from("planner.toml")));
		let Command::Plan(plan) = args.command else {
			panic!("expected plan command");
		};
		assert_eq!(plan.quote, PathBuf::from("quote.json"));
		assert_eq!(plan.slippage_bps, Some(-5));
		assert!(plan.simulate);
		assert!(plan.recipient.is_none());
	}

	#[test]
	fn test_plan_requires_quote_and_sender() {
		assert!(Args::try_parse_from(["defi-plan", "plan", "--quote", "q.json"]).is_err());
		assert!(Args::try_parse_from(["defi-plan", "plan", "--sender", "0xaa"]).is_err());
	}

	#[test]
	fn test_validate_command() {
		let args =
			Args::try_parse_from(["defi-plan", "validate", "--config", "planner.toml"]).unwrap();
		assert!(matches!(args.command, Command::Validate));
	}
}
