//! In-memory chain used by the planning scenarios.

#![allow(dead_code)]

use alloy::primitives::{address, Address, Bytes, U256};
use async_trait::async_trait;
use planner_chains::{ChainError, ChainReader};
use planner_types::{Amount, Asset, ChainId, IntentType, Quote};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const SENDER: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
pub const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
pub const BASE_USDC: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";
pub const LOCAL_RPC: &str = "http://127.0.0.1:8545";

pub const ROUTER: Address = address!("68b3465833fb72A70ecDF485E0e4C7bD8665Fc45");
pub const SPOKE_POOL: Address = address!("5c7BCd6E7De5423a257D81B442095A1a6ced35C5");

const ALLOWANCE_SELECTOR: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];
const QUOTE_SELECTOR: [u8; 4] = [0xc6, 0xa5, 0x02, 0x6a];

/// Answers `allowance` and `quoteExactInputSingle` by selector.
pub struct FakeChain {
	chain_id: u64,
	allowance: Mutex<U256>,
	/// Per fee tier: `(amount_out, gas_estimate)`; missing tiers revert.
	quotes: HashMap<u32, (U256, U256)>,
	delay: Option<Duration>,
	calls: AtomicUsize,
	urls: Mutex<Vec<String>>,
}

impl FakeChain {
	pub fn new(chain_id: u64) -> Self {
		Self {
			chain_id,
			allowance: Mutex::new(U256::ZERO),
			quotes: HashMap::new(),
			delay: None,
			calls: AtomicUsize::new(0),
			urls: Mutex::new(Vec::new()),
		}
	}

	pub fn with_allowance(self, allowance: u64) -> Self {
		self.set_allowance(U256::from(allowance));
		self
	}

	pub fn with_quote(mut self, fee: u32, amount_out: u64, gas: u64) -> Self {
		self.quotes
			.insert(fee, (U256::from(amount_out), U256::from(gas)));
		self
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	pub fn set_allowance(&self, allowance: U256) {
		*self.allowance.lock().unwrap() = allowance;
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn urls(&self) -> Vec<String> {
		self.urls.lock().unwrap().clone()
	}

	async fn pause(&self) {
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
	}
}

fn words(values: &[U256]) -> Bytes {
	let mut out = Vec::with_capacity(values.len() * 32);
	for value in values {
		out.extend_from_slice(&value.to_be_bytes::<32>());
	}
	Bytes::from(out)
}

#[async_trait]
impl ChainReader for FakeChain {
	async fn chain_id(&self, rpc_url: &str) -> Result<u64, ChainError> {
		self.urls.lock().unwrap().push(rpc_url.to_string());
		self.pause().await;
		Ok(self.chain_id)
	}

	async fn call(&self, rpc_url: &str, _to: Address, data: Bytes) -> Result<Bytes, ChainError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.urls.lock().unwrap().push(rpc_url.to_string());
		self.pause().await;

		if data.len() < 4 {
			return Err(ChainError::Reverted("empty calldata".into()));
		}
		let selector: [u8; 4] = [data[0], data[1], data[2], data[3]];
		match selector {
			ALLOWANCE_SELECTOR => Ok(words(&[*self.allowance.lock().unwrap()])),
			QUOTE_SELECTOR => {
				// QuoteExactInputSingleParams is static; fee is the fourth word.
				let fee_word = &data[4 + 96..4 + 128];
				let fee = U256::from_be_slice(fee_word).to::<u32>();
				match self.quotes.get(&fee) {
					Some((amount_out, gas)) => Ok(words(&[
						*amount_out,
						U256::from(1u64) << 96,
						U256::from(1u64),
						*gas,
					])),
					None => Err(ChainError::Reverted(format!("no pool for fee {}", fee))),
				}
			}
			other => Err(ChainError::Reverted(format!(
				"unexpected selector 0x{}",
				alloy::primitives::hex::encode(other)
			))),
		}
	}
}

pub fn asset(address: &str, symbol: &str, decimals: u8) -> Asset {
	Asset {
		address: address.to_string(),
		symbol: Some(symbol.to_string()),
		decimals,
	}
}

/// USDC -> WETH on Ethereum through Uniswap V3.
pub fn swap_quote(amount_in: &str) -> Quote {
	Quote {
		provider: "uniswap-v3".to_string(),
		intent: IntentType::Swap,
		from_chain: ChainId::ETHEREUM,
		to_chain: ChainId::ETHEREUM,
		from_asset: asset(USDC, "USDC", 6),
		to_asset: asset(WETH, "WETH", 18),
		amount_in: Amount::new(amount_in, 6).unwrap(),
		estimated_out: Amount::new("2000", 18).unwrap(),
		estimated_out_source: Default::default(),
		fees: None,
		estimated_duration_secs: None,
		route: "USDC->WETH".to_string(),
		route_data: None,
	}
}

/// USDC from Ethereum to Base through Across.
pub fn bridge_quote() -> Quote {
	let json = serde_json::json!({
		"provider": "across",
		"intent": "bridge",
		"from_chain": 1,
		"to_chain": 8453,
		"from_asset": { "address": USDC, "symbol": "USDC", "decimals": 6 },
		"to_asset": { "address": BASE_USDC, "symbol": "USDC", "decimals": 6 },
		"amount_in": { "base_units": "1000000", "decimals": 6 },
		"estimated_out": { "base_units": "997367", "decimals": 6 },
		"estimated_out_source": "provider",
		"fees": { "lp_fee": "1000", "relayer_fee": "1133", "gas_fee": "500", "total": "2633" },
		"estimated_duration_secs": 4,
		"route": "across:USDC",
		"route_data": {
			"quote_timestamp": 1_700_000_000u32,
			"fill_deadline": 1_700_021_600u32,
			"exclusivity_deadline": 0
		}
	});
	serde_json::from_value(json).unwrap()
}
