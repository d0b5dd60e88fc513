use color_eyre::{Result, eyre};
use serde_json::Value;

use sift_config::ProviderConfig;

#[derive(Clone, Debug, serde::Serialize)]
pub struct CandidateSummary {
	pub id: String,
	pub title: String,
	pub snippet: String,
}

#[derive(Clone, Debug, Default)]
pub struct RemoteScore {
	pub relevance: f32,
	pub reason: Option<String>,
}

/// Sends the query plus candidate summaries to the remote scorer and returns
/// one relevance score per candidate, aligned by index. Candidates the
/// response skips keep a zero score.
pub async fn score(
	cfg: &ProviderConfig,
	query: &str,
	candidates: &[CandidateSummary],
	context: &Value,
) -> Result<Vec<RemoteScore>> {
	let client = crate::build_client(cfg)?;
	let url = format!("{}{}", cfg.api_base, cfg.score_path);
	let body = serde_json::json!({
		"model": cfg.model,
		"query": query,
		"documents": candidates,
		"context": context,
	});
	let res = client.post(url).json(&body).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_score_response(json, candidates.len())
}

fn parse_score_response(json: Value, candidate_count: usize) -> Result<Vec<RemoteScore>> {
	let mut scores = vec![RemoteScore::default(); candidate_count];
	let results = json
		.get("results")
		.or_else(|| json.get("data"))
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Score response is missing results array."))?;

	for item in results {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.ok_or_else(|| eyre::eyre!("Score result missing index."))? as usize;
		let relevance = item
			.get("relevance_score")
			.or_else(|| item.get("score"))
			.and_then(|v| v.as_f64())
			.ok_or_else(|| eyre::eyre!("Score result missing score."))?
			.clamp(0.0, 1.0) as f32;
		let reason = item
			.get("reason")
			.and_then(|v| v.as_str())
			.map(|raw| raw.to_string());

		if index < scores.len() {
			scores[index] = RemoteScore { relevance, reason };
		}
	}

	Ok(scores)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn aligns_scores_by_index() {
		let json = serde_json::json!({
			"results": [
				{ "index": 1, "relevance_score": 0.2, "reason": "weak match" },
				{ "index": 0, "score": 0.9 }
			]
		});
		let scores = parse_score_response(json, 2).expect("parse failed");

		assert!((scores[0].relevance - 0.9).abs() < 1e-6);
		assert!((scores[1].relevance - 0.2).abs() < 1e-6);
		assert_eq!(scores[1].reason.as_deref(), Some("weak match"));
	}

	#[test]
	fn missing_results_array_is_an_error() {
		assert!(parse_score_response(serde_json::json!({}), 1).is_err());
	}

	#[test]
	fn out_of_range_scores_are_clamped() {
		let json = serde_json::json!({
			"results": [{ "index": 0, "score": 3.5 }]
		});
		let scores = parse_score_response(json, 1).expect("parse failed");

		assert_eq!(scores[0].relevance, 1.0);
	}
}
