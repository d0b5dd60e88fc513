use std::cmp::Ordering;

use time::Duration;

use sift_config::Weights;
use sift_domain::{
	factors::{FACTOR_NAMES, FactorScores},
	ranking::{RankedResult, RankingContext, RankingOptions, SearchResult},
};
use sift_providers::score::CandidateSummary;

use crate::{Error, ServiceResult, SiftService, keys};

const SNIPPET_CHARS: usize = 200;
const BOOST_THRESHOLD: f32 = 0.8;
const PENALTY_THRESHOLD: f32 = 0.3;

impl SiftService {
	/// Scores and orders candidate results. The remote scorer supplies only a
	/// relevance score per result; when it is unavailable all six factors are
	/// computed locally. The full ranked list is cached pre-truncation, so
	/// repeat requests with a different `max_results` reuse it.
	pub async fn rank_results(
		&self,
		results: &[SearchResult],
		context: &RankingContext,
		options: &RankingOptions,
	) -> ServiceResult<Vec<RankedResult>> {
		validate_weights(&options.weights)?;

		if results.is_empty() {
			return Ok(Vec::new());
		}

		let cache_key = keys::ranking_cache_key(
			&context.query,
			results,
			&options.weights,
			options.explain_ranking,
		);

		if let Some(key) = cache_key.as_deref()
			&& let Some(mut cached) = self.cache.get::<Vec<RankedResult>>(key)
		{
			cached.truncate(options.max_results);

			return Ok(cached);
		}

		let provider_cfg = &self.cfg.providers.intelligence;
		let scored: Vec<(FactorScores, Option<String>)> = self
			.gate
			.execute_with_fallback(
				"rank_results",
				async {
					let candidates: Vec<CandidateSummary> =
						results.iter().map(summarize).collect();
					let context_json = serde_json::to_value(context)?;
					let remote = self
						.providers
						.score
						.score(provider_cfg, &context.query, &candidates, &context_json)
						.await?;

					Ok::<_, color_eyre::Report>(
						remote
							.into_iter()
							.map(|score| {
								(
									FactorScores::neutral_with_relevance(score.relevance),
									score.reason,
								)
							})
							.collect(),
					)
				},
				|| {
					results
						.iter()
						.map(|result| (sift_domain::factors::compute(result, context), None))
						.collect()
				},
			)
			.await;
		let mut ranked: Vec<RankedResult> = results
			.iter()
			.zip(scored)
			.map(|(result, (factors, reason))| {
				build_ranked(result.clone(), factors, reason, &options.weights, options.explain_ranking)
			})
			.collect();

		// Stable: ties keep input order.
		ranked.sort_by(|a, b| cmp_f32_desc(a.score, b.score));

		if let Some(key) = cache_key {
			self.cache.set(&key, &ranked, Duration::seconds(self.cfg.cache.ranking_ttl_secs));
		}

		ranked.truncate(options.max_results);

		Ok(ranked)
	}
}

fn summarize(result: &SearchResult) -> CandidateSummary {
	CandidateSummary {
		id: result.id.clone(),
		title: result.title.clone(),
		snippet: result.content.chars().take(SNIPPET_CHARS).collect(),
	}
}

fn build_ranked(
	result: SearchResult,
	factors: FactorScores,
	remote_reason: Option<String>,
	weights: &Weights,
	explain: bool,
) -> RankedResult {
	let factors = factors.clamped();
	let score = factors
		.as_array()
		.iter()
		.zip(weights.as_array())
		.map(|(factor, weight)| factor * weight)
		.sum::<f32>()
		.clamp(0.0, 1.0);
	let mut boosted_by = Vec::new();
	let mut penalized_by = Vec::new();

	for (name, value) in FACTOR_NAMES.iter().zip(factors.as_array()) {
		if value > BOOST_THRESHOLD {
			boosted_by.push(name.to_string());
		} else if value < PENALTY_THRESHOLD {
			penalized_by.push(name.to_string());
		}
	}

	let explanation = explain.then(|| build_explanation(&factors, remote_reason));

	RankedResult { result, score, factors, explanation, boosted_by, penalized_by }
}

fn build_explanation(factors: &FactorScores, remote_reason: Option<String>) -> String {
	if let Some(reason) = remote_reason
		&& !reason.trim().is_empty()
	{
		return reason;
	}

	let mut phrases: Vec<&str> = Vec::new();

	if factors.relevance >= 0.8 {
		phrases.push("strongly matches the query");
	} else if factors.relevance >= 0.5 {
		phrases.push("matches the query");
	}
	if factors.recency >= 0.8 {
		phrases.push("very recent");
	} else if factors.recency <= 0.2 {
		phrases.push("older content");
	}
	if factors.authority >= 0.7 {
		phrases.push("from an authoritative source");
	}
	if factors.user_engagement >= 0.5 {
		phrases.push("similar to content you engaged with");
	}
	if factors.content_quality >= 0.7 {
		phrases.push("well-structured content");
	}
	if factors.personalization >= 0.5 {
		phrases.push("aligned with your interests");
	}
	if phrases.is_empty() {
		phrases.push("moderate overall match");
	}

	phrases.join("; ")
}

fn validate_weights(weights: &Weights) -> ServiceResult<()> {
	for (name, weight) in FACTOR_NAMES.iter().zip(weights.as_array()) {
		if !weight.is_finite() {
			return Err(Error::InvalidRequest {
				message: format!("Weight {name} must be a finite number."),
			});
		}
		if weight < 0.0 {
			return Err(Error::InvalidRequest {
				message: format!("Weight {name} must be zero or greater."),
			});
		}
	}

	Ok(())
}

pub(crate) fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn result(id: &str) -> SearchResult {
		SearchResult {
			id: id.to_string(),
			title: "t".to_string(),
			content: "c".to_string(),
			source: "docs".to_string(),
			url: None,
			author: None,
			tags: Vec::new(),
			created_at: None,
		}
	}

	#[test]
	fn reason_tags_follow_thresholds() {
		let factors = FactorScores {
			relevance: 0.9,
			recency: 0.1,
			authority: 0.5,
			user_engagement: 0.5,
			content_quality: 0.5,
			personalization: 0.85,
		};
		let ranked = build_ranked(result("r"), factors, None, &Weights::default(), false);

		assert_eq!(ranked.boosted_by, vec!["relevance", "personalization"]);
		assert_eq!(ranked.penalized_by, vec!["recency"]);
		assert!(ranked.explanation.is_none());
	}

	#[test]
	fn remote_reason_wins_over_threshold_phrases() {
		let factors = FactorScores::neutral_with_relevance(0.9);
		let ranked = build_ranked(
			result("r"),
			factors,
			Some("cited in three recent documents".to_string()),
			&Weights::default(),
			true,
		);

		assert_eq!(ranked.explanation.as_deref(), Some("cited in three recent documents"));
	}

	#[test]
	fn score_is_clamped_for_heavy_weights() {
		let weights = Weights {
			relevance: 5.0,
			recency: 5.0,
			authority: 5.0,
			user_engagement: 5.0,
			content_quality: 5.0,
			personalization: 5.0,
		};
		let ranked =
			build_ranked(result("r"), FactorScores::neutral_with_relevance(1.0), None, &weights, false);

		assert_eq!(ranked.score, 1.0);
	}

	#[test]
	fn negative_weights_are_rejected() {
		let weights = Weights { relevance: -0.1, ..Weights::default() };

		assert!(validate_weights(&weights).is_err());
	}
}
