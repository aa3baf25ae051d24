//! Planner configuration.
//!
//! Configuration is a single TOML (or JSON/YAML) document with three parts:
//! planner-wide settings, RPC endpoints keyed by chain id, and one free-form
//! section per execution provider. Provider sections are validated by the
//! provider that owns them when the planner is built.

use thiserror::Error;

pub mod loader;
pub mod serde_helpers;
pub mod types;

pub use loader::ConfigLoader;
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("Unsupported config format: {0}")]
	UnsupportedFormat(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}
