use sift_config::{Config, validate};

#[test]
fn defaults_validate_cleanly() {
	assert!(validate(&Config::default()).is_ok());
}

#[test]
fn partial_files_fall_back_to_defaults() {
	let cfg: Config = toml::from_str(
		r#"
		[providers.intelligence]
		api_base = "https://intelligence.example.com"
		api_key  = "secret"

		[ranking.weights]
		relevance = 0.5
		"#,
	)
	.unwrap();

	assert_eq!(cfg.providers.intelligence.api_base, "https://intelligence.example.com");
	assert_eq!(cfg.providers.intelligence.timeout_ms, 10_000);
	assert_eq!(cfg.resilience.failure_threshold, 3);
	assert_eq!(cfg.ranking.weights.relevance, 0.5);
	assert_eq!(cfg.ranking.weights.recency, 0.2);
	assert!(validate(&cfg).is_ok());
}

#[test]
fn zero_failure_threshold_is_rejected() {
	let mut cfg = Config::default();

	cfg.resilience.failure_threshold = 0;

	assert!(validate(&cfg).is_err());
}

#[test]
fn negative_weight_is_rejected() {
	let mut cfg = Config::default();

	cfg.ranking.weights.authority = -0.2;

	assert!(validate(&cfg).is_err());
}

#[test]
fn cleanup_ratio_above_one_is_rejected() {
	let mut cfg = Config::default();

	cfg.cache.cleanup_ratio = 1.5;

	assert!(validate(&cfg).is_err());
}

#[test]
fn blank_api_base_is_rejected() {
	let mut cfg = Config::default();

	cfg.providers.intelligence.api_base = "   ".to_string();

	assert!(validate(&cfg).is_err());
}

#[test]
fn zero_ttl_is_rejected() {
	let mut cfg = Config::default();

	cfg.cache.interpret_ttl_secs = 0;

	assert!(validate(&cfg).is_err());
}
