use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub search: Search,
	pub providers: Providers,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Master switch. A disabled interceptor declines every query.
	pub enabled: bool,
	/// Minimum term length in characters before the engine is consulted.
	pub min_term_length: usize,
	/// Engine fetch size, capped by [`Search::fetch_limit`].
	pub max_results: u32,
	/// Top-N size used when the incoming query carries no limit.
	pub default_limit: usize,
	/// Number of leading ids scanned when building per-type facets.
	pub facet_scan_limit: usize,
	/// Concrete types dropped from top-N results.
	pub excluded_item_types: Vec<String>,
	/// Engine type tags classified as live TV.
	pub live_item_types: Vec<String>,
	/// Requested type filters that route a query to the live TV ids.
	pub broadcast_request_types: Vec<String>,
	pub cache: SearchCache,
	pub rewrite: SearchRewrite,
}
impl Search {
	pub const MAX_FETCH_LIMIT: u32 = 500;

	/// Number of hits requested from the engine for one cached result.
	pub fn fetch_limit(&self) -> u32 {
		self.max_results.min(Self::MAX_FETCH_LIMIT)
	}
}
impl Default for Search {
	fn default() -> Self {
		Self {
			enabled: true,
			min_term_length: 1,
			max_results: 100,
			default_limit: 50,
			facet_scan_limit: 50,
			excluded_item_types: vec!["Episode".to_string()],
			live_item_types: vec!["LiveTvChannel".to_string(), "LiveTvProgram".to_string()],
			broadcast_request_types: vec!["TvChannel".to_string(), "LiveTvChannel".to_string()],
			cache: SearchCache::default(),
			rewrite: SearchRewrite::default(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchCache {
	pub ttl_ms: u64,
	pub wait_timeout_ms: u64,
}
impl Default for SearchCache {
	fn default() -> Self {
		Self { ttl_ms: 30_000, wait_timeout_ms: 500 }
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchRewrite {
	/// Keep the caller's content and share restriction flags on id-scoped rewrites.
	pub preserve_restrictions: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub meilisearch: MeilisearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeilisearchConfig {
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	#[serde(default = "default_index")]
	pub index: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

fn default_index() -> String {
	"emby_media".to_string()
}

fn default_timeout_ms() -> u64 {
	30_000
}
