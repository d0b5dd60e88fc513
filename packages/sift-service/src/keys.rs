//! Cache key construction. Keys hash a versioned JSON payload so any change to
//! the payload shape invalidates prior entries.

use serde_json::Value;

use sift_config::Weights;
use sift_domain::{
	query::InterpretOptions,
	ranking::SearchResult,
	tagging::TagOptions,
};

const CACHE_SCHEMA_VERSION: i32 = 1;

fn hash_cache_key(payload: &Value) -> Option<String> {
	match serde_json::to_vec(payload) {
		Ok(raw) => Some(blake3::hash(&raw).to_hex().to_string()),
		Err(err) => {
			tracing::warn!(error = %err, "Failed to encode cache key payload; skipping cache.");

			None
		},
	}
}

pub(crate) fn interpret_cache_key(query: &str, options: &InterpretOptions) -> Option<String> {
	let payload = serde_json::json!({
		"kind": "interpret",
		"schema_version": CACHE_SCHEMA_VERSION,
		"query": query.trim(),
		"options": serde_json::to_value(options).ok()?,
	});

	hash_cache_key(&payload)
}

pub(crate) fn ranking_cache_key(
	query: &str,
	results: &[SearchResult],
	weights: &Weights,
	explain: bool,
) -> Option<String> {
	let signature: Vec<Value> = results
		.iter()
		.map(|result| {
			serde_json::json!({
				"id": result.id,
				"created_at": result.created_at.map(|at| at.unix_timestamp()),
			})
		})
		.collect();
	let payload = serde_json::json!({
		"kind": "rank",
		"schema_version": CACHE_SCHEMA_VERSION,
		"query": query.trim(),
		"candidates": signature,
		"weights": serde_json::to_value(weights).ok()?,
		"explain": explain,
	});

	hash_cache_key(&payload)
}

pub(crate) fn tagging_cache_key(document_id: &str, options: &TagOptions) -> Option<String> {
	let payload = serde_json::json!({
		"kind": "tag",
		"schema_version": CACHE_SCHEMA_VERSION,
		"document_id": document_id,
		"options": serde_json::to_value(options).ok()?,
	});

	hash_cache_key(&payload)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identical_inputs_hash_identically() {
		let options = InterpretOptions::default();
		let a = interpret_cache_key("budget review", &options);
		let b = interpret_cache_key("budget review", &options);

		assert!(a.is_some());
		assert_eq!(a, b);
	}

	#[test]
	fn different_options_hash_differently() {
		let mut options = InterpretOptions::default();
		let a = interpret_cache_key("budget review", &options);

		options.context.recent_searches.push("q4 planning".to_string());

		let b = interpret_cache_key("budget review", &options);

		assert_ne!(a, b);
	}
}
