use time::{Duration, OffsetDateTime};

use sift_domain::{
	entities, intent,
	params,
	query::{Entity, Interpretation, InterpretOptions, IntentType, Parameters, QueryContext},
	terms,
};

use crate::{SiftService, keys};

/// Fallback classifications are trusted less than remote ones.
const FALLBACK_CONFIDENCE_SCALE: f32 = 0.7;

struct Classified {
	intent: IntentType,
	confidence: f32,
	entities: Vec<Entity>,
}

impl SiftService {
	/// Turns a raw query into a classified interpretation. Blank queries short
	/// circuit to the empty interpretation; everything else is memoized and
	/// resolved remotely when the circuit allows, locally otherwise. This never
	/// fails: the local path is total.
	pub async fn interpret_query(
		&self,
		query: &str,
		options: &InterpretOptions,
	) -> Interpretation {
		let trimmed = query.trim();

		if trimmed.is_empty() {
			return Interpretation::empty();
		}

		let cache_key = keys::interpret_cache_key(trimmed, options);

		if let Some(key) = cache_key.as_deref()
			&& let Some(cached) = self.cache.get::<Interpretation>(key)
		{
			return cached;
		}

		let now = OffsetDateTime::now_utc();
		let search_terms = terms::search_terms(trimmed);
		let parameters = params::extract(trimmed, now);
		let provider_cfg = &self.cfg.providers.intelligence;
		let context = &options.context;
		let classified = self
			.gate
			.execute_with_fallback(
				"interpret_query",
				async {
					let remote =
						self.providers.interpret.interpret(provider_cfg, trimmed, context).await?;

					Ok::<_, color_eyre::Report>(Classified {
						intent: remote.intent,
						confidence: remote.confidence,
						entities: remote.entities,
					})
				},
				|| classify_locally(trimmed),
			)
			.await;
		let confidence =
			overall_confidence(classified.confidence, &search_terms, &parameters, &classified.entities);
		let interpretation = Interpretation {
			intent: classified.intent,
			confidence,
			entities: classified.entities,
			parameters,
			search_terms,
			suggestions: suggestions(trimmed, context),
		};

		if let Some(key) = cache_key {
			self.cache.set(
				&key,
				&interpretation,
				Duration::seconds(self.cfg.cache.interpret_ttl_secs),
			);
		}

		interpretation
	}
}

/// Pure rule-based classification used whenever the remote service is
/// unavailable. Deterministic for a given query.
fn classify_locally(query: &str) -> Classified {
	let (intent, keyword_hits) = intent::classify(query);
	let entities = entities::extract(query);
	let base =
		(0.5 + 0.1 * keyword_hits as f32 + 0.05 * entities.len() as f32).min(1.0);

	Classified { intent, confidence: base * FALLBACK_CONFIDENCE_SCALE, entities }
}

fn overall_confidence(
	base: f32,
	search_terms: &[String],
	parameters: &Parameters,
	entities: &[Entity],
) -> f32 {
	let mut confidence = base;

	if search_terms.len() >= 3 {
		confidence += 0.1;
	}
	if !parameters.is_empty() {
		confidence += 0.1;
	}
	if !entities.is_empty() {
		confidence += 0.1;
	}

	confidence.min(1.0)
}

/// Recent searches that share at least one term with the query, capped at 3.
fn suggestions(query: &str, context: &QueryContext) -> Vec<String> {
	let query_terms = terms::search_terms(query);

	context
		.recent_searches
		.iter()
		.filter(|recent| recent.trim() != query.trim())
		.filter(|recent| {
			let recent_terms = terms::search_terms(recent);

			query_terms.iter().any(|term| recent_terms.contains(term))
		})
		.take(3)
		.cloned()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn local_classification_is_deterministic() {
		let a = classify_locally("Q4 budget planning last week");
		let b = classify_locally("Q4 budget planning last week");

		assert_eq!(a.intent, b.intent);
		assert_eq!(a.confidence, b.confidence);
		assert_eq!(a.entities, b.entities);
	}

	#[test]
	fn fallback_confidence_is_discounted() {
		let classified = classify_locally("budget review");

		// No intent keywords, no entities: 0.5 scaled by the fallback factor.
		assert!((classified.confidence - 0.35).abs() < 1e-6);
	}

	#[test]
	fn suggestions_share_terms_with_the_query() {
		let context = QueryContext {
			recent_searches: vec![
				"budget forecast".to_string(),
				"holiday schedule".to_string(),
				"q4 budget review".to_string(),
			],
			..QueryContext::default()
		};
		let picked = suggestions("budget planning", &context);

		assert_eq!(picked, vec!["budget forecast".to_string(), "q4 budget review".to_string()]);
	}
}
