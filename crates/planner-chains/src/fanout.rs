//! Bounded concurrent reads.

use futures::stream::{self, StreamExt};
use std::future::Future;

/// Runs `futures` with at most `limit` in flight and returns their outputs in
/// input order, whatever order they complete in.
///
/// A `limit` of zero is treated as one.
pub async fn join_bounded<I, F>(futures: I, limit: usize) -> Vec<F::Output>
where
	I: IntoIterator<Item = F>,
	F: Future,
{
	stream::iter(futures)
		.buffered(limit.max(1))
		.collect()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;
	use std::time::Duration;

	#[tokio::test]
	async fn test_preserves_input_order() {
		let delays = [30u64, 5, 15, 0];
		let futs = delays.iter().enumerate().map(|(i, d)| async move {
			tokio::time::sleep(Duration::from_millis(*d)).await;
			i
		});
		assert_eq!(join_bounded(futs, 4).await, vec![0, 1, 2, 3]);
	}

	#[tokio::test]
	async fn test_respects_limit() {
		let in_flight = Arc::new(AtomicUsize::new(0));
		let peak = Arc::new(AtomicUsize::new(0));

		let futs = (0..8).map(|_| {
			let in_flight = in_flight.clone();
			let peak = peak.clone();
			async move {
				let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
				peak.fetch_max(now, Ordering::SeqCst);
				tokio::time::sleep(Duration::from_millis(5)).await;
				in_flight.fetch_sub(1, Ordering::SeqCst);
			}
		});

		join_bounded(futs, 2).await;
		assert!(peak.load(Ordering::SeqCst) <= 2);
	}

	#[tokio::test]
	async fn test_zero_limit_still_runs() {
		let out = join_bounded((0..3).map(|i| async move { i * 2 }), 0).await;
		assert_eq!(out, vec![0, 2, 4]);
	}
}
