//! Approval gating.
//!
//! An approval step is emitted only when the on-chain allowance is strictly
//! below the amount the primary step will pull. Planning again after that
//! approval lands yields an approval-free action.

use crate::context::{ChainScope, TokenRef};
use alloy::primitives::{Address, Bytes, U256};
use planner_abi::{decode_allowance, encode_allowance, encode_approve};
use planner_config::ApprovalMode;
use planner_types::Result;
use tracing::debug;

/// An `approve` the sender must send before the primary step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalCall {
	pub token: Address,
	pub spender: Address,
	/// Amount granted by the approval.
	pub amount: U256,
	/// Allowance observed on-chain when planning.
	pub current_allowance: U256,
	pub data: Bytes,
}

/// Reads allowances and decides whether an approval is required.
#[derive(Debug, Clone, Copy)]
pub struct AllowanceGate<'a> {
	scope: ChainScope<'a>,
	mode: ApprovalMode,
}

impl<'a> AllowanceGate<'a> {
	pub fn new(scope: ChainScope<'a>, mode: ApprovalMode) -> Self {
		Self { scope, mode }
	}

	/// Current allowance granted by `owner` to `spender` on `token`.
	pub async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
		let raw = self
			.scope
			.reader
			.call(self.scope.rpc_url, token, encode_allowance(owner, spender))
			.await?;
		Ok(decode_allowance(&raw)?)
	}

	/// Returns the approval to prepend, or `None` when the input is native or
	/// the allowance already covers `required`.
	pub async fn check(
		&self,
		token: TokenRef,
		owner: Address,
		spender: Address,
		required: U256,
	) -> Result<Option<ApprovalCall>> {
		let token = match token {
			TokenRef::Native => return Ok(None),
			TokenRef::Erc20(token) => token,
		};

		let current = self.allowance(token, owner, spender).await?;
		if current >= required {
			debug!(
				token = %token,
				spender = %spender,
				allowance = %current,
				"Allowance sufficient, no approval needed"
			);
			return Ok(None);
		}

		let amount = match self.mode {
			ApprovalMode::Exact => required,
			ApprovalMode::Unlimited => U256::MAX,
		};
		debug!(
			token = %token,
			spender = %spender,
			allowance = %current,
			required = %required,
			"Allowance below input amount, adding approval"
		);

		Ok(Some(ApprovalCall {
			token,
			spender,
			amount,
			current_allowance: current,
			data: encode_approve(spender, amount),
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::address;
	use async_trait::async_trait;
	use planner_chains::{ChainError, ChainReader};
	use planner_types::PlanError;

	struct FixedAllowance(Option<U256>);

	#[async_trait]
	impl ChainReader for FixedAllowance {
		async fn chain_id(&self, _rpc_url: &str) -> std::result::Result<u64, ChainError> {
			Ok(1)
		}

		async fn call(
			&self,
			_rpc_url: &str,
			_to: Address,
			_data: Bytes,
		) -> std::result::Result<Bytes, ChainError> {
			match self.0 {
				Some(v) => Ok(Bytes::from(v.to_be_bytes::<32>().to_vec())),
				None => Err(ChainError::Transport("connection refused".into())),
			}
		}
	}

	const TOKEN: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
	const OWNER: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
	const SPENDER: Address = address!("68b3465833fb72A70ecDF485E0e4C7bD8665Fc45");

	fn gate(reader: &dyn ChainReader, mode: ApprovalMode) -> AllowanceGate<'_> {
		AllowanceGate::new(
			ChainScope {
				reader,
				rpc_url: "http://127.0.0.1:8545",
				max_in_flight: 4,
			},
			mode,
		)
	}

	#[tokio::test]
	async fn test_sufficient_allowance_skips_approval() {
		let reader = FixedAllowance(Some(U256::from(1_000_000u64)));
		let approval = gate(&reader, ApprovalMode::Exact)
			.check(TokenRef::Erc20(TOKEN), OWNER, SPENDER, U256::from(1_000_000u64))
			.await
			.unwrap();
		assert!(approval.is_none());
	}

	#[tokio::test]
	async fn test_short_allowance_approves_exact_amount() {
		let reader = FixedAllowance(Some(U256::from(999_999u64)));
		let approval = gate(&reader, ApprovalMode::Exact)
			.check(TokenRef::Erc20(TOKEN), OWNER, SPENDER, U256::from(1_000_000u64))
			.await
			.unwrap()
			.unwrap();
		assert_eq!(approval.amount, U256::from(1_000_000u64));
		assert_eq!(approval.current_allowance, U256::from(999_999u64));
		assert_eq!(approval.data, encode_approve(SPENDER, U256::from(1_000_000u64)));
	}

	#[tokio::test]
	async fn test_unlimited_mode() {
		let reader = FixedAllowance(Some(U256::ZERO));
		let approval = gate(&reader, ApprovalMode::Unlimited)
			.check(TokenRef::Erc20(TOKEN), OWNER, SPENDER, U256::from(5u64))
			.await
			.unwrap()
			.unwrap();
		assert_eq!(approval.amount, U256::MAX);
	}

	#[tokio::test]
	async fn test_native_input_never_reads() {
		let reader = FixedAllowance(None);
		let approval = gate(&reader, ApprovalMode::Exact)
			.check(TokenRef::Native, OWNER, SPENDER, U256::from(5u64))
			.await
			.unwrap();
		assert!(approval.is_none());
	}

	#[tokio::test]
	async fn test_read_failure_is_unavailable() {
		let reader = FixedAllowance(None);
		let err = gate(&reader, ApprovalMode::Exact)
			.check(TokenRef::Erc20(TOKEN), OWNER, SPENDER, U256::from(5u64))
			.await
			.unwrap_err();
		assert!(matches!(err, PlanError::Unavailable(_)));
		assert!(err.is_retryable());
	}
}
