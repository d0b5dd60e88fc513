pub mod interpret;
pub mod rank;
pub mod tag;

mod keys;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use sift_cache::{CachePolicy, CacheStore};
use sift_config::{Config, ProviderConfig};
use sift_domain::query::QueryContext;
pub use sift_providers::{
	interpret::RemoteInterpretation,
	score::{CandidateSummary, RemoteScore},
};
use sift_resilience::CircuitBreaker;

pub type ServiceResult<T> = Result<T, Error>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait InterpretProvider
where
	Self: Send + Sync,
{
	fn interpret<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		query: &'a str,
		context: &'a QueryContext,
	) -> BoxFuture<'a, color_eyre::Result<RemoteInterpretation>>;
}

pub trait ScoreProvider
where
	Self: Send + Sync,
{
	fn score<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		query: &'a str,
		candidates: &'a [CandidateSummary],
		context: &'a Value,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RemoteScore>>>;
}

#[derive(Debug)]
pub enum Error {
	InvalidRequest { message: String },
}
impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
		}
	}
}
impl std::error::Error for Error {}

#[derive(Clone)]
pub struct Providers {
	pub interpret: Arc<dyn InterpretProvider>,
	pub score: Arc<dyn ScoreProvider>,
}
impl Providers {
	pub fn new(interpret: Arc<dyn InterpretProvider>, score: Arc<dyn ScoreProvider>) -> Self {
		Self { interpret, score }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { interpret: provider.clone(), score: provider }
	}
}

struct DefaultProviders;
impl InterpretProvider for DefaultProviders {
	fn interpret<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		query: &'a str,
		context: &'a QueryContext,
	) -> BoxFuture<'a, color_eyre::Result<RemoteInterpretation>> {
		Box::pin(sift_providers::interpret::interpret(cfg, query, context))
	}
}
impl ScoreProvider for DefaultProviders {
	fn score<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		query: &'a str,
		candidates: &'a [CandidateSummary],
		context: &'a Value,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RemoteScore>>> {
		Box::pin(sift_providers::score::score(cfg, query, candidates, context))
	}
}

/// Maps the configured cache quotas onto a store policy.
pub fn cache_policy(cache: &sift_config::Cache) -> CachePolicy {
	CachePolicy {
		max_bytes: cache.max_bytes,
		max_items: cache.max_items as usize,
		cleanup_ratio: cache.cleanup_ratio,
	}
}

/// The core pipeline: query interpretation, result ranking, and content
/// tagging, sharing one cache store and one circuit breaker per instance.
pub struct SiftService {
	pub cfg: Config,
	pub cache: CacheStore,
	pub gate: CircuitBreaker,
	pub providers: Providers,
}
impl SiftService {
	pub fn new(cfg: Config, cache: CacheStore) -> Self {
		Self::with_providers(cfg, cache, Providers::default())
	}

	pub fn with_providers(cfg: Config, cache: CacheStore, providers: Providers) -> Self {
		let gate = CircuitBreaker::new(
			cfg.resilience.failure_threshold,
			time::Duration::milliseconds(cfg.resilience.cooldown_ms as i64),
		);

		Self { cfg, cache, gate, providers }
	}
}
