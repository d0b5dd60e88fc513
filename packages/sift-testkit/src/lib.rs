//! Test doubles and fixture builders shared by the package test suites.

use std::sync::{
	Arc,
	atomic::{AtomicBool, AtomicUsize, Ordering},
};

use serde_json::Value;
use time::OffsetDateTime;

use sift_cache::{MemoryMedium, Result as CacheResult, StorageMedium};
use sift_config::{Config, ProviderConfig};
use sift_domain::{
	query::{IntentType, QueryContext},
	ranking::SearchResult,
	tagging::Document,
};
use sift_service::{
	BoxFuture, CandidateSummary, InterpretProvider, RemoteInterpretation, RemoteScore,
	ScoreProvider,
};

pub fn test_config() -> Config {
	Config::default()
}

pub fn sample_result(id: &str, title: &str, content: &str) -> SearchResult {
	SearchResult {
		id: id.to_string(),
		title: title.to_string(),
		content: content.to_string(),
		source: "docs".to_string(),
		url: None,
		author: None,
		tags: Vec::new(),
		created_at: None,
	}
}

pub fn sample_document(id: &str, content: &str) -> Document {
	Document {
		id: id.to_string(),
		title: None,
		content: content.to_string(),
		author: None,
		source: None,
		created_at: None,
	}
}

/// Interpret provider that always fails, counting attempts.
pub struct FailingInterpretProvider {
	pub calls: Arc<AtomicUsize>,
}
impl FailingInterpretProvider {
	pub fn new() -> Self {
		Self { calls: Arc::new(AtomicUsize::new(0)) }
	}

	pub fn count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl Default for FailingInterpretProvider {
	fn default() -> Self {
		Self::new()
	}
}
impl InterpretProvider for FailingInterpretProvider {
	fn interpret<'a>(
		&'a self,
		_cfg: &'a ProviderConfig,
		_query: &'a str,
		_context: &'a QueryContext,
	) -> BoxFuture<'a, color_eyre::Result<RemoteInterpretation>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async { Err(color_eyre::eyre::eyre!("provider unavailable")) })
	}
}

/// Interpret provider returning a fixed classification, counting calls.
pub struct FixedInterpretProvider {
	pub calls: Arc<AtomicUsize>,
	pub intent: IntentType,
	pub confidence: f32,
}
impl FixedInterpretProvider {
	pub fn new(intent: IntentType, confidence: f32) -> Self {
		Self { calls: Arc::new(AtomicUsize::new(0)), intent, confidence }
	}

	pub fn count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl InterpretProvider for FixedInterpretProvider {
	fn interpret<'a>(
		&'a self,
		_cfg: &'a ProviderConfig,
		_query: &'a str,
		_context: &'a QueryContext,
	) -> BoxFuture<'a, color_eyre::Result<RemoteInterpretation>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let intent = self.intent;
		let confidence = self.confidence;

		Box::pin(async move {
			Ok(RemoteInterpretation { intent, confidence, entities: Vec::new() })
		})
	}
}

/// Score provider that always fails, forcing the local factor path.
pub struct FailingScoreProvider {
	pub calls: Arc<AtomicUsize>,
}
impl FailingScoreProvider {
	pub fn new() -> Self {
		Self { calls: Arc::new(AtomicUsize::new(0)) }
	}

	pub fn count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl Default for FailingScoreProvider {
	fn default() -> Self {
		Self::new()
	}
}
impl ScoreProvider for FailingScoreProvider {
	fn score<'a>(
		&'a self,
		_cfg: &'a ProviderConfig,
		_query: &'a str,
		_candidates: &'a [CandidateSummary],
		_context: &'a Value,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RemoteScore>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async { Err(color_eyre::eyre::eyre!("provider unavailable")) })
	}
}

/// Score provider returning fixed relevance scores aligned with the input.
pub struct FixedScoreProvider {
	pub calls: Arc<AtomicUsize>,
	pub scores: Vec<f32>,
	pub reason: Option<String>,
}
impl FixedScoreProvider {
	pub fn new(scores: Vec<f32>) -> Self {
		Self { calls: Arc::new(AtomicUsize::new(0)), scores, reason: None }
	}

	pub fn count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl ScoreProvider for FixedScoreProvider {
	fn score<'a>(
		&'a self,
		_cfg: &'a ProviderConfig,
		_query: &'a str,
		candidates: &'a [CandidateSummary],
		_context: &'a Value,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RemoteScore>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let scores: Vec<RemoteScore> = candidates
			.iter()
			.enumerate()
			.map(|(index, _)| RemoteScore {
				relevance: self.scores.get(index).copied().unwrap_or(0.0),
				reason: self.reason.clone(),
			})
			.collect();

		Box::pin(async move { Ok(scores) })
	}
}

/// Storage medium whose writes can be toggled to fail, for exercising the
/// non-fatal write path.
#[derive(Default)]
pub struct FlakyMedium {
	inner: MemoryMedium,
	fail_writes: AtomicBool,
}
impl FlakyMedium {
	pub fn fail_writes(&self, fail: bool) {
		self.fail_writes.store(fail, Ordering::SeqCst);
	}
}
impl StorageMedium for FlakyMedium {
	fn read(&self, key: &str) -> CacheResult<Option<String>> {
		self.inner.read(key)
	}

	fn write(&self, key: &str, payload: &str) -> CacheResult<()> {
		if self.fail_writes.load(Ordering::SeqCst) {
			return Err(sift_cache::Error::Medium { message: "write rejected".to_string() });
		}

		self.inner.write(key, payload)
	}

	fn delete(&self, key: &str) -> CacheResult<()> {
		self.inner.delete(key)
	}

	fn clear(&self) -> CacheResult<()> {
		self.inner.clear()
	}
}

pub fn dated(result: SearchResult, created_at: OffsetDateTime) -> SearchResult {
	SearchResult { created_at: Some(created_at), ..result }
}
