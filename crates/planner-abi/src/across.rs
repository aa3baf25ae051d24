//! Across SpokePool deposits.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
	interface ISpokePool {
		function depositV3(
			address depositor,
			address recipient,
			address inputToken,
			address outputToken,
			uint256 inputAmount,
			uint256 outputAmount,
			uint256 destinationChainId,
			address exclusiveRelayer,
			uint32 quoteTimestamp,
			uint32 fillDeadline,
			uint32 exclusivityDeadline,
			bytes message
		) external payable;
	}
}

/// Arguments of a `depositV3` call.
///
/// `output_amount` is the least the relayer must deliver on the destination
/// chain, so it doubles as the bridge's minimum-output guarantee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositParams {
	pub depositor: Address,
	pub recipient: Address,
	pub input_token: Address,
	pub output_token: Address,
	pub input_amount: U256,
	pub output_amount: U256,
	pub destination_chain_id: u64,
	pub exclusive_relayer: Address,
	pub quote_timestamp: u32,
	pub fill_deadline: u32,
	pub exclusivity_deadline: u32,
	pub message: Bytes,
}

pub fn encode_deposit_v3(params: &DepositParams) -> Bytes {
	ISpokePool::depositV3Call {
		depositor: params.depositor,
		recipient: params.recipient,
		inputToken: params.input_token,
		outputToken: params.output_token,
		inputAmount: params.input_amount,
		outputAmount: params.output_amount,
		destinationChainId: U256::from(params.destination_chain_id),
		exclusiveRelayer: params.exclusive_relayer,
		quoteTimestamp: params.quote_timestamp,
		fillDeadline: params.fill_deadline,
		exclusivityDeadline: params.exclusivity_deadline,
		message: params.message.clone(),
	}
	.abi_encode()
	.into()
}
