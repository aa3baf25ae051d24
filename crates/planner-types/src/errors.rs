//! Error types for the planner.

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanError>;

/// Every way a planning call can fail.
///
/// A planning attempt surfaces exactly one of these and never a partial
/// action. Only [`PlanError::Unavailable`] is worth retrying, and that is the
/// caller's decision.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
	/// Invalid address, slippage, missing field or missing configuration.
	#[error("Usage error: {0}")]
	Usage(String),

	/// Chain or asset combination the provider cannot plan for.
	#[error("Unsupported: {0}")]
	Unsupported(String),

	/// RPC or HTTP read failed, reverted, or no usable route exists.
	#[error("Unavailable: {0}")]
	Unavailable(String),

	/// Encoding or decoding against a fixed ABI failed.
	#[error("Internal error: {0}")]
	Internal(String),

	/// An on-chain response contradicts what the plan assumed.
	#[error("Plan inconsistent: {0}")]
	Inconsistent(String),

	/// The caller cancelled or timed out the planning call.
	#[error("Planning cancelled: {0}")]
	Cancelled(String),
}

/// Coarse classification of a [`PlanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	Usage,
	Unsupported,
	Unavailable,
	Internal,
	Inconsistent,
	Cancelled,
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ErrorKind::Usage => "usage",
			ErrorKind::Unsupported => "unsupported",
			ErrorKind::Unavailable => "unavailable",
			ErrorKind::Internal => "internal",
			ErrorKind::Inconsistent => "plan_inconsistent",
			ErrorKind::Cancelled => "cancelled",
		};
		write!(f, "{}", name)
	}
}

impl PlanError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			PlanError::Usage(_) => ErrorKind::Usage,
			PlanError::Unsupported(_) => ErrorKind::Unsupported,
			PlanError::Unavailable(_) => ErrorKind::Unavailable,
			PlanError::Internal(_) => ErrorKind::Internal,
			PlanError::Inconsistent(_) => ErrorKind::Inconsistent,
			PlanError::Cancelled(_) => ErrorKind::Cancelled,
		}
	}

	/// Whether a caller may retry the same planning call with backoff.
	pub fn is_retryable(&self) -> bool {
		matches!(self, PlanError::Unavailable(_))
	}

	pub fn missing_field(field: &str) -> Self {
		PlanError::Usage(format!("Missing required field: {}", field))
	}
}
