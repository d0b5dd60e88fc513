pub mod interpret;
pub mod score;

use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};

use sift_config::ProviderConfig;

pub(crate) fn build_client(cfg: &ProviderConfig) -> Result<Client> {
	let mut headers = HeaderMap::new();

	if !cfg.api_key.is_empty() {
		headers.insert(AUTHORIZATION, format!("Bearer {}", cfg.api_key).parse()?);
	}
	for (key, value) in &cfg.default_headers {
		let Some(raw) = value.as_str() else {
			return Err(eyre::eyre!("Default header values must be strings."));
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(Client::builder()
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.default_headers(headers)
		.build()?)
}
