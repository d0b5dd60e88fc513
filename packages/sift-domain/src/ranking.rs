use serde::{Deserialize, Serialize};
use sift_config::Weights;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	pub id: String,
	pub title: String,
	pub content: String,
	pub source: String,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub author: Option<String>,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryItem {
	pub query: String,
	pub result_id: Option<String>,
	pub author: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
	pub preferred_sources: Vec<String>,
	pub topic_interests: Vec<String>,
	pub tag_profile: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingContext {
	pub query: String,
	#[serde(with = "time::serde::rfc3339")]
	pub search_time: OffsetDateTime,
	#[serde(default)]
	pub history: Vec<HistoryItem>,
	#[serde(default)]
	pub preferences: UserPreferences,
}
impl RankingContext {
	pub fn new(query: impl Into<String>, search_time: OffsetDateTime) -> Self {
		Self {
			query: query.into(),
			search_time,
			history: Vec::new(),
			preferences: UserPreferences::default(),
		}
	}
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RankingOptions {
	pub weights: Weights,
	pub max_results: usize,
	pub explain_ranking: bool,
}
impl Default for RankingOptions {
	fn default() -> Self {
		Self { weights: Weights::default(), max_results: 20, explain_ranking: false }
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
	pub result: SearchResult,
	pub score: f32,
	pub factors: crate::factors::FactorScores,
	pub explanation: Option<String>,
	pub boosted_by: Vec<String>,
	pub penalized_by: Vec<String>,
}
