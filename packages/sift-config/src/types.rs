use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	pub resilience: Resilience,
	pub cache: Cache,
	pub ranking: Ranking,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: "info".to_string() }
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Providers {
	pub intelligence: ProviderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	/// Endpoint path for intent interpretation requests.
	pub interpret_path: String,
	/// Endpoint path for relevance scoring requests.
	pub score_path: String,
	pub model: String,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}
impl Default for ProviderConfig {
	fn default() -> Self {
		Self {
			provider_id: "intelligence".to_string(),
			api_base: "http://127.0.0.1:8080".to_string(),
			api_key: String::new(),
			interpret_path: "/v1/interpret".to_string(),
			score_path: "/v1/score".to_string(),
			model: "default".to_string(),
			timeout_ms: 10_000,
			default_headers: Map::new(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Resilience {
	pub failure_threshold: u32,
	pub cooldown_ms: u64,
}
impl Default for Resilience {
	fn default() -> Self {
		Self { failure_threshold: 3, cooldown_ms: 300_000 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Cache {
	pub max_bytes: u64,
	pub max_items: u32,
	/// Cleanup stops evicting once usage drops below this fraction of `max_bytes`.
	pub cleanup_ratio: f32,
	pub interpret_ttl_secs: i64,
	pub ranking_ttl_secs: i64,
	pub tagging_ttl_secs: i64,
}
impl Default for Cache {
	fn default() -> Self {
		Self {
			max_bytes: 5 * 1024 * 1024,
			max_items: 1_000,
			cleanup_ratio: 0.8,
			interpret_ttl_secs: 3_600,
			ranking_ttl_secs: 86_400,
			tagging_ttl_secs: 604_800,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub weights: Weights,
}

#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Weights {
	pub relevance: f32,
	pub recency: f32,
	pub authority: f32,
	pub user_engagement: f32,
	pub content_quality: f32,
	pub personalization: f32,
}
impl Weights {
	pub fn as_array(&self) -> [f32; 6] {
		[
			self.relevance,
			self.recency,
			self.authority,
			self.user_engagement,
			self.content_quality,
			self.personalization,
		]
	}
}
impl Default for Weights {
	fn default() -> Self {
		Self {
			relevance: 0.3,
			recency: 0.2,
			authority: 0.15,
			user_engagement: 0.15,
			content_quality: 0.1,
			personalization: 0.1,
		}
	}
}
