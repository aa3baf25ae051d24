//! Concrete [`ChainReader`](crate::ChainReader) implementations.

pub mod evm;
