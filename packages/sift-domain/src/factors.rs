use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
	ranking::{RankingContext, SearchResult},
	terms,
};

pub const FACTOR_NAMES: [&str; 6] = [
	"relevance",
	"recency",
	"authority",
	"user_engagement",
	"content_quality",
	"personalization",
];

const LONG_CONTENT_CHARS: usize = 2_000;
const TRUSTED_DOMAINS: &[&str] =
	&["docs.google.com", "github.com", "wikipedia.org", ".gov", ".edu"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
	pub relevance: f32,
	pub recency: f32,
	pub authority: f32,
	pub user_engagement: f32,
	pub content_quality: f32,
	pub personalization: f32,
}
impl FactorScores {
	/// Remote scoring only returns relevance; the other factors are treated as
	/// average rather than omitted from the weighted sum.
	pub fn neutral_with_relevance(relevance: f32) -> Self {
		Self {
			relevance,
			recency: 0.5,
			authority: 0.5,
			user_engagement: 0.5,
			content_quality: 0.5,
			personalization: 0.5,
		}
	}

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

	pub fn clamped(self) -> Self {
		Self {
			relevance: self.relevance.clamp(0.0, 1.0),
			recency: self.recency.clamp(0.0, 1.0),
			authority: self.authority.clamp(0.0, 1.0),
			user_engagement: self.user_engagement.clamp(0.0, 1.0),
			content_quality: self.content_quality.clamp(0.0, 1.0),
			personalization: self.personalization.clamp(0.0, 1.0),
		}
	}
}

/// Computes all six factors locally. Pure and deterministic; this is the
/// fallback path when the remote scorer is unavailable.
pub fn compute(result: &SearchResult, context: &RankingContext) -> FactorScores {
	let query_lower = context.query.to_lowercase();
	let query_terms = terms::search_terms(&context.query);
	let result_terms: HashSet<String> = terms::tokenize(&result.title)
		.into_iter()
		.chain(result.tags.iter().flat_map(|tag| terms::tokenize(tag)))
		.collect();
	let best_history = best_history_similarity(&result_terms, context);

	FactorScores {
		relevance: relevance(result, &query_lower, &query_terms),
		recency: recency(result, context),
		authority: authority(result, context),
		user_engagement: user_engagement(result, context, best_history),
		content_quality: content_quality(result),
		personalization: personalization(result, context, best_history),
	}
	.clamped()
}

fn relevance(result: &SearchResult, query_lower: &str, query_terms: &[String]) -> f32 {
	if query_terms.is_empty() {
		return 0.0;
	}

	let title_lower = result.title.to_lowercase();
	let content_lower = result.content.to_lowercase();
	let mut score = 0.0;

	if title_lower.trim() == query_lower.trim() {
		score += 0.5;
	} else {
		let title_words: HashSet<String> = terms::tokenize(&result.title).into_iter().collect();
		let matched =
			query_terms.iter().filter(|term| title_words.contains(term.as_str())).count();

		score += 0.4 * matched as f32 / query_terms.len() as f32;
	}

	// Exact phrase appearing verbatim in the body.
	if content_lower.contains(query_lower.trim()) {
		score += 0.2;
	}

	let content_words: HashSet<String> = terms::tokenize(&result.content).into_iter().collect();
	let overlap = query_terms.iter().filter(|term| content_words.contains(term.as_str())).count();

	score += 0.25 * overlap as f32 / query_terms.len() as f32;

	if !result.tags.is_empty() {
		let tag_words: HashSet<String> =
			result.tags.iter().flat_map(|tag| terms::tokenize(tag)).collect();
		let matched =
			query_terms.iter().filter(|term| tag_words.contains(term.as_str())).count();

		score += 0.15 * matched as f32 / query_terms.len() as f32;
	}

	score.min(1.0)
}

fn recency(result: &SearchResult, context: &RankingContext) -> f32 {
	let Some(created_at) = result.created_at else {
		// Undated results rank as stale rather than neutral.
		return 0.1;
	};
	let days = (context.search_time - created_at).whole_days();

	match days {
		..=1 => 1.0,
		2..=7 => 0.8,
		8..=30 => 0.6,
		31..=90 => 0.4,
		91..=365 => 0.2,
		_ => 0.1,
	}
}

fn authority(result: &SearchResult, context: &RankingContext) -> f32 {
	let mut score: f32 = match result.source.to_lowercase().as_str() {
		"drive" | "docs" | "confluence" | "notion" | "sharepoint" | "wiki" => 0.6,
		"github" | "jira" | "asana" | "linear" => 0.5,
		"gmail" | "outlook" | "email" => 0.4,
		"slack" | "teams" | "discord" | "chat" => 0.3,
		_ => 0.4,
	};

	if let Some(author) = result.author.as_deref()
		&& context.history.iter().any(|item| item.author.as_deref() == Some(author))
	{
		score += 0.15;
	}
	if result.content.chars().count() > LONG_CONTENT_CHARS {
		score += 0.15;
	}
	if let Some(url) = result.url.as_deref() {
		let url_lower = url.to_lowercase();

		if TRUSTED_DOMAINS.iter().any(|domain| url_lower.contains(domain)) {
			score += 0.1;
		}
	}

	score.min(1.0)
}

fn user_engagement(result: &SearchResult, context: &RankingContext, best_history: f32) -> f32 {
	let mut score = 0.0;

	if best_history > 0.3 {
		score += 0.3;
	}
	if is_preferred_source(result, context) {
		score += 0.2;
	}

	score += 0.3 * overlap_ratio(&result.tags, &context.preferences.topic_interests);

	if context
		.history
		.iter()
		.take(10)
		.any(|item| item.result_id.as_deref() == Some(result.id.as_str()))
	{
		score += 0.2;
	}

	score.min(1.0)
}

fn content_quality(result: &SearchResult) -> f32 {
	let mut score: f32 = 0.5;
	let content_chars = result.content.chars().count();
	let title_chars = result.title.chars().count();

	if content_chars < 50 {
		score -= 0.2;
	}
	if content_chars > 500 {
		score += 0.1;
	}
	if content_chars > LONG_CONTENT_CHARS {
		score += 0.1;
	}
	if (10..=100).contains(&title_chars) {
		score += 0.1;
	}
	if has_structure(&result.content) {
		score += 0.1;
	}
	if !result.tags.is_empty() {
		score += 0.05;
	}
	if result.author.is_some() {
		score += 0.05;
	}
	if result.url.is_some() {
		score += 0.05;
	}

	score.clamp(0.0, 1.0)
}

fn personalization(result: &SearchResult, context: &RankingContext, best_history: f32) -> f32 {
	let tag_overlap = overlap_ratio(&result.tags, &context.preferences.tag_profile);
	let preferred = if is_preferred_source(result, context) { 1.0 } else { 0.0 };
	let topic_overlap = overlap_ratio(&result.tags, &context.preferences.topic_interests);

	0.3 * tag_overlap + 0.4 * best_history + 0.2 * preferred + 0.1 * topic_overlap
}

fn best_history_similarity(result_terms: &HashSet<String>, context: &RankingContext) -> f32 {
	let mut best = 0.0f32;

	for item in &context.history {
		let item_terms: HashSet<String> = terms::tokenize(&item.query).into_iter().collect();
		let similarity = jaccard(result_terms, &item_terms);

		if similarity > best {
			best = similarity;
		}
	}

	best
}

fn is_preferred_source(result: &SearchResult, context: &RankingContext) -> bool {
	context
		.preferences
		.preferred_sources
		.iter()
		.any(|source| source.eq_ignore_ascii_case(&result.source))
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
	if a.is_empty() || b.is_empty() {
		return 0.0;
	}

	let intersection = a.intersection(b).count();
	let union = a.len() + b.len() - intersection;

	intersection as f32 / union as f32
}

/// Fraction of profile entries matched by the result's tags.
fn overlap_ratio(tags: &[String], profile: &[String]) -> f32 {
	if profile.is_empty() || tags.is_empty() {
		return 0.0;
	}

	let matched = profile
		.iter()
		.filter(|entry| tags.iter().any(|tag| tag.eq_ignore_ascii_case(entry)))
		.count();

	matched as f32 / profile.len() as f32
}

fn has_structure(content: &str) -> bool {
	content.lines().any(|line| {
		let trimmed = line.trim_start();

		trimmed.starts_with('-')
			|| trimmed.starts_with('*')
			|| trimmed.starts_with('\u{2022}')
			|| trimmed
				.split_once('.')
				.map(|(head, _)| !head.is_empty() && head.chars().all(|ch| ch.is_ascii_digit()))
				.unwrap_or(false)
	})
}
