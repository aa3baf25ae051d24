//! Fixed contract interfaces used by the planner.
//!
//! Every call the planner emits or simulates goes through one of the typed
//! encoders here: ERC-20 `allowance`/`approve`, the Uniswap-V3-style
//! `QuoterV2`/`SwapRouter02` pair, and the Across SpokePool `depositV3`.

use planner_types::PlanError;
use thiserror::Error;

pub mod across;
pub mod amm;
pub mod erc20;

pub use across::{encode_deposit_v3, DepositParams};
pub use amm::{
	decode_quote_exact_input_single, encode_exact_input_single, encode_quote_exact_input_single,
	ExactInputSingle, QuoteResult,
};
pub use erc20::{decode_allowance, encode_allowance, encode_approve};

/// Errors raised while encoding or decoding against a fixed ABI.
#[derive(Debug, Error)]
pub enum AbiError {
	/// Return data did not match the expected layout.
	#[error("Failed to decode {call} return data: {reason}")]
	Decode { call: &'static str, reason: String },
	/// An argument does not fit the ABI type it is encoded as.
	#[error("Invalid argument {name}: {reason}")]
	InvalidArgument { name: &'static str, reason: String },
}

impl From<AbiError> for PlanError {
	fn from(err: AbiError) -> Self {
		PlanError::Internal(err.to_string())
	}
}
