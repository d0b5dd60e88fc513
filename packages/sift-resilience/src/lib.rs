//! Circuit breaker guarding calls to the remote intelligence service.
//!
//! One breaker instance owns its state and is injected into consumers; there
//! is no ambient global. The breaker never retries: one failed primary call
//! means one fallback invocation, and an open circuit routes straight to the
//! fallback until the cooldown elapses.

use std::{fmt::Display, future::Future, sync::Mutex};

use time::{Duration, OffsetDateTime};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CircuitStatus {
	Closed,
	Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircuitState {
	pub status: CircuitStatus,
	pub failure_count: u32,
	pub last_failure_at: Option<OffsetDateTime>,
}
impl CircuitState {
	fn closed() -> Self {
		Self { status: CircuitStatus::Closed, failure_count: 0, last_failure_at: None }
	}
}

pub struct CircuitBreaker {
	failure_threshold: u32,
	cooldown: Duration,
	state: Mutex<CircuitState>,
}
impl CircuitBreaker {
	pub fn new(failure_threshold: u32, cooldown: Duration) -> Self {
		Self {
			failure_threshold: failure_threshold.max(1),
			cooldown,
			state: Mutex::new(CircuitState::closed()),
		}
	}

	pub fn snapshot(&self) -> CircuitState {
		*self.lock()
	}

	/// Runs `primary` unless the circuit is open, falling back on any failure.
	/// `fallback` is synchronous and must be total; its result is returned
	/// verbatim for open circuits and failed primaries alike. Timeouts inside
	/// `primary` surface as errors and are treated like any other failure.
	pub async fn execute_with_fallback<T, E, Fut, Fb>(
		&self,
		label: &str,
		primary: Fut,
		fallback: Fb,
	) -> T
	where
		Fut: Future<Output = Result<T, E>>,
		E: Display,
		Fb: FnOnce() -> T,
	{
		if self.reject(OffsetDateTime::now_utc()) {
			tracing::debug!(label, "Circuit open; skipping primary call.");

			return fallback();
		}

		match primary.await {
			Ok(value) => {
				self.record_success();

				value
			},
			Err(err) => {
				self.record_failure(label, &err, OffsetDateTime::now_utc());

				fallback()
			},
		}
	}

	/// Open circuits re-close lazily once the cooldown has elapsed; the first
	/// call after that point goes to the primary again with a clean counter.
	fn reject(&self, now: OffsetDateTime) -> bool {
		let mut state = self.lock();

		if state.status != CircuitStatus::Open {
			return false;
		}

		let cooled = state
			.last_failure_at
			.map(|at| now - at >= self.cooldown)
			.unwrap_or(true);

		if cooled {
			*state = CircuitState::closed();
			tracing::info!("Circuit closed after cooldown.");

			return false;
		}

		true
	}

	fn record_success(&self) {
		self.lock().failure_count = 0;
	}

	fn record_failure<E>(&self, label: &str, err: &E, now: OffsetDateTime)
	where
		E: Display,
	{
		let mut state = self.lock();

		state.failure_count += 1;
		state.last_failure_at = Some(now);
		tracing::warn!(
			label,
			failure_count = state.failure_count,
			error = %err,
			"Primary call failed; using fallback.",
		);

		if state.failure_count >= self.failure_threshold && state.status == CircuitStatus::Closed {
			state.status = CircuitStatus::Open;
			tracing::error!(
				label,
				failure_count = state.failure_count,
				"Circuit opened; primary calls suspended for the cooldown.",
			);
		}
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, CircuitState> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reject_closes_again_after_cooldown() {
		let breaker = CircuitBreaker::new(1, Duration::milliseconds(100));
		let opened_at = OffsetDateTime::now_utc();

		breaker.record_failure("test", &"boom", opened_at);

		assert_eq!(breaker.snapshot().status, CircuitStatus::Open);
		assert!(breaker.reject(opened_at + Duration::milliseconds(50)));
		assert!(!breaker.reject(opened_at + Duration::milliseconds(150)));
		assert_eq!(breaker.snapshot().failure_count, 0);
	}

	#[test]
	fn threshold_is_at_least_one() {
		let breaker = CircuitBreaker::new(0, Duration::seconds(1));

		breaker.record_failure("test", &"boom", OffsetDateTime::now_utc());

		assert_eq!(breaker.snapshot().status, CircuitStatus::Open);
	}
}
