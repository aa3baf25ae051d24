//! EVM readers.

mod alloy;

pub use self::alloy::AlloyReader;
