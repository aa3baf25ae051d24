//! Shared types for the execution action planner.
//!
//! Everything that crosses a crate boundary lives here: normalized quotes,
//! execution options, the produced actions and steps, fee breakdowns, the
//! error taxonomy, and exact base-unit arithmetic.

pub mod action;
pub mod amount;
pub mod chains;
pub mod common;
pub mod errors;
pub mod fees;
pub mod quote;
pub mod settlement;
pub mod units;
pub mod validation;

pub use action::*;
pub use amount::*;
pub use chains::*;
pub use common::*;
pub use errors::*;
pub use fees::*;
pub use quote::*;
pub use settlement::*;
pub use validation::*;
