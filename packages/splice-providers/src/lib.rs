pub mod error;
pub mod meilisearch;

pub use error::{Error, Result};
pub use meilisearch::{Health, SearchHit, SearchResponse};
pub use reqwest::Client;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

use splice_config::MeilisearchConfig;

/// Builds request headers. The bearer token is omitted for keyless development instances.
pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if !api_key.is_empty() {
		headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: format!("Default header {key} must be a string."),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// One client per backend; reqwest pools connections internally.
pub fn build_client(cfg: &MeilisearchConfig) -> Result<Client> {
	let client = Client::builder()
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.default_headers(auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.build()?;

	Ok(client)
}
