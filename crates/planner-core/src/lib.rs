//! Execution action planner.
//!
//! Turns a normalized [`Quote`] plus the caller's [`ExecutionOptions`] into an
//! [`Action`]: the ordered, unsigned transactions an external signer submits
//! to carry the quote out.
//!
//! # Architecture
//!
//! - `planner`: orchestration, cancellation and timeouts
//! - `providers`: the closed set of execution providers
//! - `quoter`: fee-tier probing and route selection
//! - `allowance`: approval gating
//! - `fees`: bridge fee breakdowns
//! - `context`: validated per-call inputs
//!
//! [`Action`]: planner_types::Action
//! [`ExecutionOptions`]: planner_types::ExecutionOptions

use alloy::primitives::U256;
use async_trait::async_trait;
use planner_types::{ConfigSchema, Quote, Result};

pub mod allowance;
pub mod context;
pub mod fees;
pub mod planner;
pub mod providers;
pub mod quoter;

pub use allowance::{AllowanceGate, ApprovalCall};
pub use context::{normalize_slippage, ChainScope, PlanContext, TokenRef};
pub use fees::build_fee_breakdown;
pub use planner::Planner;
pub use providers::{ExecutionProvider, PrimaryCall, ProviderSet, Settlement};
pub use quoter::{probe_fee_tiers, select_best, Route, RouteCandidate};

/// What every execution provider contributes to a plan.
///
/// The planner owns validation, endpoint resolution, slippage, approvals and
/// step assembly. A provider only decides whether it can handle a quote, which
/// route to take, and how the primary call is encoded.
#[async_trait]
pub trait ActionBuilder: Send + Sync {
	/// Name quotes use to select this provider.
	fn name(&self) -> &str;

	/// Schema of the provider's `[providers.<name>]` section.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Rejects quote shapes the provider cannot execute.
	fn supports(&self, quote: &Quote) -> Result<()>;

	/// Chooses the route the primary call will follow.
	async fn select_route(&self, ctx: &PlanContext<'_>, scope: ChainScope<'_>) -> Result<Route>;

	/// Encodes the swap or bridge call, bounded by `amount_out_min`.
	fn build_primary_call(
		&self,
		ctx: &PlanContext<'_>,
		route: &Route,
		amount_out_min: U256,
	) -> Result<PrimaryCall>;

	/// Settlement tracking for bridges; `None` for same-chain actions.
	fn settlement(&self, _ctx: &PlanContext<'_>) -> Option<Settlement> {
		None
	}
}
