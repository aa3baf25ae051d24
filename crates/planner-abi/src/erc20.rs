//! ERC-20 allowance reads and approvals.

use crate::AbiError;
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
	interface IERC20 {
		function allowance(address owner, address spender) external view returns (uint256);
		function approve(address spender, uint256 amount) external returns (bool);
	}
}

/// Call data for `allowance(owner, spender)`.
pub fn encode_allowance(owner: Address, spender: Address) -> Bytes {
	IERC20::allowanceCall { owner, spender }.abi_encode().into()
}

/// Decodes the `uint256` returned by `allowance`.
pub fn decode_allowance(data: &[u8]) -> Result<U256, AbiError> {
	IERC20::allowanceCall::abi_decode_returns(data).map_err(|e| AbiError::Decode {
		call: "allowance",
		reason: e.to_string(),
	})
}

/// Call data for `approve(spender, amount)`.
pub fn encode_approve(spender: Address, amount: U256) -> Bytes {
	IERC20::approveCall { spender, amount }.abi_encode().into()
}
