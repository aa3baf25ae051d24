//! Retry policy for chain reads.
//!
//! Only transport failures are retried. A revert or a bad endpoint gives the
//! same answer on every attempt, so those surface immediately.

use crate::ChainError;
use backoff::{backoff::Backoff, ExponentialBackoff};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Exponential backoff with an attempt cap.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
	backoff: ExponentialBackoff,
	max_retries: u32,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self::new()
	}
}

impl RetryPolicy {
	/// Three retries, giving up after ten seconds in total.
	pub fn new() -> Self {
		let backoff = ExponentialBackoff {
			max_elapsed_time: Some(Duration::from_secs(10)),
			..Default::default()
		};

		Self {
			backoff,
			max_retries: 3,
		}
	}

	/// No retries at all.
	pub fn none() -> Self {
		Self::new().with_max_retries(0)
	}

	pub fn with_max_retries(mut self, max_retries: u32) -> Self {
		self.max_retries = max_retries;
		self
	}

	pub fn with_initial_interval(mut self, interval: Duration) -> Self {
		self.backoff.initial_interval = interval;
		self.backoff.current_interval = interval;
		self
	}

	pub fn max_retries(&self) -> u32 {
		self.max_retries
	}

	/// Runs `op` until it succeeds, fails with a non-transport error, or the
	/// policy is exhausted.
	pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, ChainError>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<T, ChainError>>,
	{
		let mut backoff = self.backoff.clone();
		backoff.reset();
		let mut attempts = 0;

		loop {
			match op().await {
				Ok(value) => return Ok(value),
				Err(ChainError::Transport(e)) => {
					attempts += 1;

					if attempts > self.max_retries {
						if self.max_retries > 0 {
							warn!(
								"{} failed after {} attempts, giving up: {}",
								what, attempts, e
							);
						}
						return Err(ChainError::Transport(e));
					}

					match backoff.next_backoff() {
						Some(delay) => {
							warn!(
								"{} failed, attempt {}/{}, retrying in {:?}: {}",
								what, attempts, self.max_retries, delay, e
							);
							tokio::time::sleep(delay).await;
						}
						None => {
							warn!(
								"{} failed, backoff exhausted after {} attempts: {}",
								what, attempts, e
							);
							return Err(ChainError::Transport(e));
						}
					}
				}
				Err(other) => return Err(other),
			}
		}
	}
}
