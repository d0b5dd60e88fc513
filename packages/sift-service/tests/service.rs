use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use sift_cache::{CachePolicy, CacheStore, MemoryMedium};
use sift_domain::{
	query::{EntityKind, IntentType, InterpretOptions},
	ranking::{RankingContext, RankingOptions},
	tagging::TagOptions,
};
use sift_service::{InterpretProvider, Providers, ScoreProvider, SiftService};
use sift_testkit::{
	FailingInterpretProvider, FailingScoreProvider, FixedInterpretProvider, FixedScoreProvider,
	FlakyMedium, dated, sample_document, sample_result, test_config,
};

fn service_with(
	interpret: Arc<dyn InterpretProvider>,
	score: Arc<dyn ScoreProvider>,
) -> SiftService {
	let cfg = test_config();
	let cache =
		CacheStore::new(Arc::new(MemoryMedium::default()), sift_service::cache_policy(&cfg.cache));

	SiftService::with_providers(cfg, cache, Providers::new(interpret, score))
}

fn offline_service() -> SiftService {
	service_with(Arc::new(FailingInterpretProvider::new()), Arc::new(FailingScoreProvider::new()))
}

#[tokio::test]
async fn blank_query_skips_providers_entirely() {
	let interpret = FailingInterpretProvider::new();
	let calls = interpret.calls.clone();
	let service = service_with(Arc::new(interpret), Arc::new(FailingScoreProvider::new()));
	let interpretation = service.interpret_query("   ", &InterpretOptions::default()).await;

	assert_eq!(interpretation.intent, IntentType::Search);
	assert_eq!(interpretation.confidence, 0.0);
	assert!(interpretation.entities.is_empty());
	assert!(interpretation.search_terms.is_empty());
	assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fallback_interprets_a_dated_query() {
	let service = offline_service();
	let interpretation =
		service.interpret_query("Q4 budget planning last week", &InterpretOptions::default()).await;

	assert_eq!(interpretation.intent, IntentType::Search);
	assert_eq!(interpretation.entities.len(), 1);
	assert_eq!(interpretation.entities[0].kind, EntityKind::Date);
	assert_eq!(interpretation.entities[0].value, "last week");
	assert_eq!(interpretation.entities[0].span.start, 19);
	assert_eq!(interpretation.entities[0].span.end, 28);
	assert!(interpretation.parameters.time_range.is_some());
	assert_eq!(
		interpretation.search_terms,
		vec!["q4", "budget", "planning", "last", "week"]
	);
	// Base 0.55 scaled by the fallback discount, plus the term, parameter, and
	// entity bonuses.
	assert!((interpretation.confidence - 0.685).abs() < 1e-4);
}

#[tokio::test]
async fn fallback_output_is_stable_across_instances() {
	let first = offline_service();
	let second = offline_service();
	let options = InterpretOptions::default();
	let a = first.interpret_query("budget review notes", &options).await;
	let b = second.interpret_query("budget review notes", &options).await;

	assert_eq!(a, b);
}

#[tokio::test]
async fn repeated_interpretation_hits_the_cache() {
	let interpret = FixedInterpretProvider::new(IntentType::Analysis, 0.9);
	let calls = interpret.calls.clone();
	let service = service_with(Arc::new(interpret), Arc::new(FailingScoreProvider::new()));
	let options = InterpretOptions::default();
	let first = service.interpret_query("analyze churn drivers", &options).await;
	let second = service.interpret_query("analyze churn drivers", &options).await;

	assert_eq!(first, second);
	assert_eq!(first.intent, IntentType::Analysis);
	assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn circuit_opens_after_three_failures() {
	let interpret = FailingInterpretProvider::new();
	let calls = interpret.calls.clone();
	let service = service_with(Arc::new(interpret), Arc::new(FailingScoreProvider::new()));
	let options = InterpretOptions::default();

	// Distinct queries so the cache never short circuits the gate.
	for query in ["alpha report", "beta report", "gamma report", "delta report"] {
		let interpretation = service.interpret_query(query, &options).await;

		assert!(!interpretation.search_terms.is_empty());
	}

	// The fourth call is rejected without reaching the provider.
	assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
}

#[tokio::test]
async fn fresh_exact_match_outranks_stale_partial_match() {
	let service = offline_service();
	let now = OffsetDateTime::now_utc();
	let fresh = dated(
		sample_result(
			"fresh",
			"budget planning",
			"The complete budget planning workbook for the coming quarter.",
		),
		now - Duration::hours(2),
	);
	let stale = dated(
		sample_result("stale", "planning archive", "Minutes from an old planning meeting."),
		now - Duration::days(400),
	);
	let context = RankingContext::new("budget planning", now);
	let ranked = service
		.rank_results(&[stale, fresh], &context, &RankingOptions::default())
		.await
		.unwrap();

	assert_eq!(ranked[0].result.id, "fresh");
	assert!(ranked[0].score > ranked[1].score);
}

#[tokio::test]
async fn scores_stay_bounded_and_ordered_under_any_weights() {
	let now = OffsetDateTime::now_utc();
	let results = vec![
		dated(sample_result("a", "budget planning", "Budget planning details."), now),
		sample_result("b", "weekly notes", "Short."),
		dated(sample_result("c", "planning guide", &"x".repeat(3_000)), now - Duration::days(45)),
	];
	let context = RankingContext::new("budget planning", now);
	let weight_sets = [
		sift_config::Weights::default(),
		sift_config::Weights {
			relevance: 5.0,
			recency: 5.0,
			authority: 5.0,
			user_engagement: 5.0,
			content_quality: 5.0,
			personalization: 5.0,
		},
		sift_config::Weights {
			relevance: 1.0,
			recency: 0.0,
			authority: 0.0,
			user_engagement: 0.0,
			content_quality: 0.0,
			personalization: 0.0,
		},
	];

	for weights in weight_sets {
		let service = offline_service();
		let options = RankingOptions { weights, ..RankingOptions::default() };
		let ranked = service.rank_results(&results, &context, &options).await.unwrap();

		assert_eq!(ranked.len(), results.len());

		for pair in ranked.windows(2) {
			assert!(pair[0].score >= pair[1].score);
		}
		for item in &ranked {
			assert!((0.0..=1.0).contains(&item.score));

			for factor in item.factors.as_array() {
				assert!((0.0..=1.0).contains(&factor));
			}
		}
	}
}

#[tokio::test]
async fn remote_scores_fill_only_the_relevance_factor() {
	let mut score = FixedScoreProvider::new(vec![0.9, 0.2]);

	score.reason = Some("matched the quarterly report series".to_string());

	let service = service_with(Arc::new(FailingInterpretProvider::new()), Arc::new(score));
	let now = OffsetDateTime::now_utc();
	let results = vec![
		sample_result("a", "quarterly report", "Q3 summary."),
		sample_result("b", "meeting notes", "Agenda items."),
	];
	let context = RankingContext::new("quarterly report", now);
	let options = RankingOptions { explain_ranking: true, ..RankingOptions::default() };
	let ranked = service.rank_results(&results, &context, &options).await.unwrap();

	assert_eq!(ranked[0].result.id, "a");
	assert_eq!(ranked[0].factors.relevance, 0.9);
	assert_eq!(ranked[0].factors.recency, 0.5);
	assert_eq!(ranked[0].factors.authority, 0.5);
	assert_eq!(
		ranked[0].explanation.as_deref(),
		Some("matched the quarterly report series")
	);
	assert_eq!(ranked[1].factors.relevance, 0.2);
}

#[tokio::test]
async fn cached_ranking_serves_a_different_truncation() {
	let score = FixedScoreProvider::new(vec![0.9, 0.6, 0.3]);
	let calls = score.calls.clone();
	let service = service_with(Arc::new(FailingInterpretProvider::new()), Arc::new(score));
	let now = OffsetDateTime::now_utc();
	let results = vec![
		sample_result("a", "first", "First candidate."),
		sample_result("b", "second", "Second candidate."),
		sample_result("c", "third", "Third candidate."),
	];
	let context = RankingContext::new("candidates", now);
	let narrow = RankingOptions { max_results: 2, ..RankingOptions::default() };
	let wide = RankingOptions { max_results: 3, ..RankingOptions::default() };
	let short = service.rank_results(&results, &context, &narrow).await.unwrap();
	let full = service.rank_results(&results, &context, &wide).await.unwrap();

	assert_eq!(short.len(), 2);
	assert_eq!(full.len(), 3);
	assert_eq!(full[..2], short[..]);
	// The full list was cached before truncation, so one provider call covers
	// both requests.
	assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_candidate_list_ranks_to_nothing() {
	let service = offline_service();
	let context = RankingContext::new("anything", OffsetDateTime::now_utc());
	let ranked =
		service.rank_results(&[], &context, &RankingOptions::default()).await.unwrap();

	assert!(ranked.is_empty());
}

#[tokio::test]
async fn negative_weights_are_rejected() {
	let service = offline_service();
	let context = RankingContext::new("anything", OffsetDateTime::now_utc());
	let options = RankingOptions {
		weights: sift_config::Weights { relevance: -1.0, ..sift_config::Weights::default() },
		..RankingOptions::default()
	};
	let outcome = service
		.rank_results(&[sample_result("a", "t", "c")], &context, &options)
		.await;

	assert!(outcome.is_err());
}

#[tokio::test]
async fn degraded_cache_writes_leave_interpretation_uncached() {
	let interpret = FixedInterpretProvider::new(IntentType::Question, 0.9);
	let calls = interpret.calls.clone();
	let medium = Arc::new(FlakyMedium::default());

	medium.fail_writes(true);

	let cache = CacheStore::new(medium.clone(), CachePolicy::default());
	let service = SiftService::with_providers(
		test_config(),
		cache,
		Providers::new(Arc::new(interpret), Arc::new(FailingScoreProvider::new())),
	);
	let options = InterpretOptions::default();
	let first = service.interpret_query("what changed in the rollout", &options).await;

	medium.fail_writes(false);

	let second = service.interpret_query("what changed in the rollout", &options).await;

	// The first result never landed in the cache, so the provider ran twice.
	assert_eq!(first, second);
	assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}

#[test]
fn tagging_is_idempotent_per_document_id() {
	let service = offline_service();
	let options = TagOptions::default();
	let original = sample_document(
		"doc-1",
		"Revenue grew this quarter and the budget forecast improved across teams.",
	);
	let first = service.tag_content(&original, &options);
	let changed = sample_document("doc-1", "A completely unrelated body of text.");
	let second = service.tag_content(&changed, &options);

	assert_eq!(first, second);
	assert_eq!(first.document_id, "doc-1");
}
