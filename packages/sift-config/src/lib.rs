mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Cache, Config, ProviderConfig, Providers, Ranking, Resilience, Service, Weights};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.resilience.failure_threshold == 0 {
		return Err(Error::Validation {
			message: "resilience.failure_threshold must be greater than zero.".to_string(),
		});
	}
	if cfg.resilience.cooldown_ms == 0 {
		return Err(Error::Validation {
			message: "resilience.cooldown_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.max_bytes == 0 {
		return Err(Error::Validation {
			message: "cache.max_bytes must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.max_items == 0 {
		return Err(Error::Validation {
			message: "cache.max_items must be greater than zero.".to_string(),
		});
	}
	if !cfg.cache.cleanup_ratio.is_finite()
		|| cfg.cache.cleanup_ratio <= 0.0
		|| cfg.cache.cleanup_ratio > 1.0
	{
		return Err(Error::Validation {
			message: "cache.cleanup_ratio must be in the range (0.0, 1.0].".to_string(),
		});
	}

	for (label, ttl) in [
		("cache.interpret_ttl_secs", cfg.cache.interpret_ttl_secs),
		("cache.ranking_ttl_secs", cfg.cache.ranking_ttl_secs),
		("cache.tagging_ttl_secs", cfg.cache.tagging_ttl_secs),
	] {
		if ttl <= 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	for (label, weight) in [
		("relevance", cfg.ranking.weights.relevance),
		("recency", cfg.ranking.weights.recency),
		("authority", cfg.ranking.weights.authority),
		("user_engagement", cfg.ranking.weights.user_engagement),
		("content_quality", cfg.ranking.weights.content_quality),
		("personalization", cfg.ranking.weights.personalization),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation {
				message: format!("ranking.weights.{label} must be a finite number."),
			});
		}
		if weight < 0.0 {
			return Err(Error::Validation {
				message: format!("ranking.weights.{label} must be zero or greater."),
			});
		}
	}

	if cfg.providers.intelligence.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.intelligence.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.providers.intelligence.model.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.intelligence.model must be non-empty.".to_string(),
		});
	}
	for (label, path) in [
		("interpret_path", &cfg.providers.intelligence.interpret_path),
		("score_path", &cfg.providers.intelligence.score_path),
	] {
		if path.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("providers.intelligence.{label} must be non-empty."),
			});
		}
	}

	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let key = cfg.providers.intelligence.api_key.trim();

	if key.len() != cfg.providers.intelligence.api_key.len() {
		cfg.providers.intelligence.api_key = key.to_string();
	}

	while cfg.providers.intelligence.api_base.ends_with('/') {
		cfg.providers.intelligence.api_base.pop();
	}
}
