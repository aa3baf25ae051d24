//! Uniswap-V3-style concentrated liquidity: `QuoterV2` and `SwapRouter02`.
//!
//! Both TaikoSwap and Uniswap V3 deployments expose these exact signatures.
//! `SwapRouter02` drops the `deadline` field of the original router.

use crate::AbiError;
use alloy::primitives::aliases::{U160, U24};
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
	interface IQuoterV2 {
		struct QuoteExactInputSingleParams {
			address tokenIn;
			address tokenOut;
			uint256 amountIn;
			uint24 fee;
			uint160 sqrtPriceLimitX96;
		}

		function quoteExactInputSingle(
			QuoteExactInputSingleParams memory params
		) external returns (
			uint256 amountOut,
			uint160 sqrtPriceX96After,
			uint32 initializedTicksCrossed,
			uint256 gasEstimate
		);
	}
}

sol! {
	interface ISwapRouter02 {
		struct ExactInputSingleParams {
			address tokenIn;
			address tokenOut;
			uint24 fee;
			address recipient;
			uint256 amountIn;
			uint256 amountOutMinimum;
			uint160 sqrtPriceLimitX96;
		}

		function exactInputSingle(ExactInputSingleParams calldata params) external payable returns (uint256 amountOut);
	}
}

/// Simulated output of one fee tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteResult {
	pub amount_out: U256,
	pub gas_estimate: U256,
}

/// Arguments of a single-pool exact-input swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactInputSingle {
	pub token_in: Address,
	pub token_out: Address,
	pub fee: u32,
	pub recipient: Address,
	pub amount_in: U256,
	pub amount_out_min: U256,
}

fn fee_tier(fee: u32) -> Result<U24, AbiError> {
	if fee >= 1 << 24 {
		return Err(AbiError::InvalidArgument {
			name: "fee",
			reason: format!("{} does not fit in uint24", fee),
		});
	}
	Ok(U24::from(fee))
}

/// Call data for `quoteExactInputSingle` with no price limit.
pub fn encode_quote_exact_input_single(
	token_in: Address,
	token_out: Address,
	amount_in: U256,
	fee: u32,
) -> Result<Bytes, AbiError> {
	let params = IQuoterV2::QuoteExactInputSingleParams {
		tokenIn: token_in,
		tokenOut: token_out,
		amountIn: amount_in,
		fee: fee_tier(fee)?,
		sqrtPriceLimitX96: U160::ZERO,
	};
	Ok(IQuoterV2::quoteExactInputSingleCall { params }
		.abi_encode()
		.into())
}

/// Decodes `(amountOut, sqrtPriceX96After, initializedTicksCrossed, gasEstimate)`.
pub fn decode_quote_exact_input_single(data: &[u8]) -> Result<QuoteResult, AbiError> {
	let ret = IQuoterV2::quoteExactInputSingleCall::abi_decode_returns(data).map_err(|e| {
		AbiError::Decode {
			call: "quoteExactInputSingle",
			reason: e.to_string(),
		}
	})?;
	Ok(QuoteResult {
		amount_out: ret.amountOut,
		gas_estimate: ret.gasEstimate,
	})
}

/// Call data for `exactInputSingle` with no price limit.
pub fn encode_exact_input_single(swap: &ExactInputSingle) -> Result<Bytes, AbiError> {
	let params = ISwapRouter02::ExactInputSingleParams {
		tokenIn: swap.token_in,
		tokenOut: swap.token_out,
		fee: fee_tier(swap.fee)?,
		recipient: swap.recipient,
		amountIn: swap.amount_in,
		amountOutMinimum: swap.amount_out_min,
		sqrtPriceLimitX96: U160::ZERO,
	};
	Ok(ISwapRouter02::exactInputSingleCall { params }
		.abi_encode()
		.into())
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::address;

	const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
	const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

	fn word(v: u64) -> [u8; 32] {
		U256::from(v).to_be_bytes::<32>()
	}

	#[test]
	fn test_quote_call_layout() {
		let data =
			encode_quote_exact_input_single(USDC, WETH, U256::from(1_000_000u64), 500).unwrap();
		assert_eq!(hex::encode(&data[..4]), "c6a5026a");
		// Static struct: five head words.
		assert_eq!(data.len(), 4 + 32 * 5);
		assert_eq!(U256::from_be_slice(&data[100..132]), U256::from(500u64));
	}

	#[test]
	fn test_decode_quote_returns() {
		let mut ret = Vec::new();
		ret.extend_from_slice(&word(2000));
		ret.extend_from_slice(&word(1));
		ret.extend_from_slice(&word(3));
		ret.extend_from_slice(&word(70_000));

		let quote = decode_quote_exact_input_single(&ret).unwrap();
		assert_eq!(quote.amount_out, U256::from(2000u64));
		assert_eq!(quote.gas_estimate, U256::from(70_000u64));

		assert!(decode_quote_exact_input_single(&ret[..64]).is_err());
	}

	#[test]
	fn test_swap_call_carries_min_out() {
		let recipient = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
		let data = encode_exact_input_single(&ExactInputSingle {
			token_in: USDC,
			token_out: WETH,
			fee: 3000,
			recipient,
			amount_in: U256::from(1_000_000u64),
			amount_out_min: U256::from(1980u64),
		})
		.unwrap();

		assert_eq!(hex::encode(&data[..4]), "04e45aaf");
		assert_eq!(data.len(), 4 + 32 * 7);
		assert_eq!(&data[4 + 32 * 3 + 12..4 + 32 * 4], recipient.as_slice());
		assert_eq!(
			U256::from_be_slice(&data[4 + 32 * 5..4 + 32 * 6]),
			U256::from(1980u64)
		);
	}

	#[test]
	fn test_fee_out_of_range() {
		let err = encode_quote_exact_input_single(USDC, WETH, U256::ONE, 1 << 24).unwrap_err();
		assert!(matches!(err, AbiError::InvalidArgument { name: "fee", .. }));
	}
}
