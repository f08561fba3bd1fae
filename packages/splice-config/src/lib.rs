mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, MeilisearchConfig, Providers, Search, SearchCache, SearchRewrite, Service,
};

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
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::invalid("service.log_level", "must be non-empty"));
	}

	let meili = &cfg.providers.meilisearch;

	if meili.api_base.is_empty() {
		return Err(Error::invalid("providers.meilisearch.api_base", "must be non-empty"));
	}
	if meili.index.trim().is_empty() {
		return Err(Error::invalid("providers.meilisearch.index", "must be non-empty"));
	}
	if meili.timeout_ms == 0 {
		return Err(Error::invalid("providers.meilisearch.timeout_ms", "must be greater than zero"));
	}

	let search = &cfg.search;

	for (field, value) in [
		("search.min_term_length", search.min_term_length),
		("search.default_limit", search.default_limit),
		("search.facet_scan_limit", search.facet_scan_limit),
	] {
		if value == 0 {
			return Err(Error::invalid(field, "must be greater than zero"));
		}
	}
	if search.max_results == 0 {
		return Err(Error::invalid("search.max_results", "must be greater than zero"));
	}
	if search.cache.ttl_ms == 0 {
		return Err(Error::invalid("search.cache.ttl_ms", "must be greater than zero"));
	}
	if search.cache.wait_timeout_ms == 0 {
		return Err(Error::invalid("search.cache.wait_timeout_ms", "must be greater than zero"));
	}
	if search.cache.wait_timeout_ms >= search.cache.ttl_ms {
		return Err(Error::invalid(
			"search.cache.wait_timeout_ms",
			"must be less than search.cache.ttl_ms",
		));
	}
	if search.live_item_types.is_empty() {
		return Err(Error::invalid("search.live_item_types", "must be non-empty"));
	}
	if search.broadcast_request_types.is_empty() {
		return Err(Error::invalid("search.broadcast_request_types", "must be non-empty"));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let meili = &mut cfg.providers.meilisearch;

	meili.api_base = meili.api_base.trim().trim_end_matches('/').to_string();
	meili.api_key = meili.api_key.trim().to_string();

	for types in [
		&mut cfg.search.excluded_item_types,
		&mut cfg.search.live_item_types,
		&mut cfg.search.broadcast_request_types,
	] {
		types.retain(|t| !t.trim().is_empty());
		types.iter_mut().for_each(|t| *t = t.trim().to_string());
	}
}
