use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use time::Duration;

use sift_resilience::{CircuitBreaker, CircuitStatus};

#[tokio::test]
async fn opens_after_threshold_and_skips_primary() {
	let breaker = CircuitBreaker::new(3, Duration::minutes(5));
	let primary = Arc::new(AtomicUsize::new(0));
	let fallback = Arc::new(AtomicUsize::new(0));

	for _ in 0..4 {
		let primary = primary.clone();
		let fallback = fallback.clone();
		let out = breaker
			.execute_with_fallback(
				"test",
				async move {
					primary.fetch_add(1, Ordering::SeqCst);

					Err::<&'static str, _>("boom")
				},
				move || {
					fallback.fetch_add(1, Ordering::SeqCst);

					"fallback"
				},
			)
			.await;

		assert_eq!(out, "fallback");
	}

	// The 4th call found the circuit open and never reached the primary.
	assert_eq!(primary.load(Ordering::SeqCst), 3);
	assert_eq!(fallback.load(Ordering::SeqCst), 4);
	assert_eq!(breaker.snapshot().status, CircuitStatus::Open);
}

#[tokio::test]
async fn success_resets_the_failure_count() {
	let breaker = CircuitBreaker::new(3, Duration::minutes(5));

	for _ in 0..2 {
		let out = breaker
			.execute_with_fallback("test", async { Err::<u32, _>("boom") }, || 0)
			.await;

		assert_eq!(out, 0);
	}

	assert_eq!(breaker.snapshot().failure_count, 2);

	let out = breaker.execute_with_fallback("test", async { Ok::<u32, &str>(7) }, || 0).await;

	assert_eq!(out, 7);
	assert_eq!(breaker.snapshot().failure_count, 0);
	assert_eq!(breaker.snapshot().status, CircuitStatus::Closed);
}

#[tokio::test]
async fn recloses_after_cooldown_elapses() {
	let breaker = CircuitBreaker::new(1, Duration::milliseconds(20));
	let out = breaker.execute_with_fallback("test", async { Err::<u32, _>("boom") }, || 0).await;

	assert_eq!(out, 0);
	assert_eq!(breaker.snapshot().status, CircuitStatus::Open);

	tokio::time::sleep(std::time::Duration::from_millis(40)).await;

	let out = breaker.execute_with_fallback("test", async { Ok::<u32, &str>(5) }, || 0).await;

	assert_eq!(out, 5);
	assert_eq!(breaker.snapshot().status, CircuitStatus::Closed);
	assert_eq!(breaker.snapshot().failure_count, 0);
}
