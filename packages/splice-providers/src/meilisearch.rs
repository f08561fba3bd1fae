//! Meilisearch HTTP API: search, health and index statistics.

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use splice_config::MeilisearchConfig;

use crate::{Error, Result};

/// Attributes fetched per hit. Everything else stays on the engine.
pub const RETRIEVED_ATTRIBUTES: [&str; 4] = ["InternalId", "Id", "ItemType", "Name"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
	#[serde(rename = "InternalId", default)]
	pub internal_id: i64,
	#[serde(rename = "ItemType", default)]
	pub item_type: String,
	#[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}
impl SearchHit {
	pub fn new(internal_id: i64, item_type: impl Into<String>) -> Self {
		Self { internal_id, item_type: item_type.into(), name: None }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
	pub hits: Vec<SearchHit>,
	#[serde(default)]
	pub estimated_total_hits: Option<u64>,
	#[serde(default)]
	pub processing_time_ms: u64,
	#[serde(default)]
	pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
	pub status: String,
}
impl Health {
	pub fn is_available(&self) -> bool {
		self.status == "available"
	}
}

pub async fn search(
	client: &Client,
	cfg: &MeilisearchConfig,
	term: &str,
	type_filter: Option<&[String]>,
	limit: u32,
) -> Result<SearchResponse> {
	let path = format!("/indexes/{}/search", cfg.index);
	let body = build_search_body(term, type_filter, limit);
	let res = client.post(format!("{}{path}", cfg.api_base)).json(&body).send().await?;
	let json: Value = ensure_success(res, &path)?.json().await?;
	let parsed = parse_search_response(json)?;

	tracing::debug!(
		term,
		hits = parsed.hits.len(),
		processing_time_ms = parsed.processing_time_ms,
		"Meilisearch search completed."
	);

	Ok(parsed)
}

pub async fn health(client: &Client, cfg: &MeilisearchConfig) -> Result<Health> {
	let path = "/health";
	let res = client.get(format!("{}{path}", cfg.api_base)).send().await?;

	Ok(ensure_success(res, path)?.json().await?)
}

pub async fn index_stats(client: &Client, cfg: &MeilisearchConfig) -> Result<Value> {
	let path = format!("/indexes/{}/stats", cfg.index);
	let res = client.get(format!("{}{path}", cfg.api_base)).send().await?;

	Ok(ensure_success(res, &path)?.json().await?)
}

/// Maps the loose type names hosts send for live TV onto the indexed type tags.
pub fn map_item_type(name: &str) -> &str {
	match name.trim().to_ascii_lowercase().as_str() {
		"channel" | "tvchannel" | "livetvchannel" => "LiveTvChannel",
		"program" | "tvprogram" | "livetvprogram" => "LiveTvProgram",
		_ => name.trim(),
	}
}

pub fn build_type_filter(types: &[String]) -> Option<String> {
	let clauses: Vec<String> = types
		.iter()
		.filter(|t| !t.trim().is_empty())
		.map(|t| format!("ItemType = \"{}\"", escape_filter_value(map_item_type(t))))
		.collect();

	if clauses.is_empty() { None } else { Some(clauses.join(" OR ")) }
}

/// Escapes a value for a double-quoted filter string. Backslashes go first.
fn escape_filter_value(value: &str) -> String {
	value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn build_search_body(term: &str, type_filter: Option<&[String]>, limit: u32) -> Value {
	let mut body = serde_json::json!({
		"q": term,
		"limit": limit,
		"attributesToRetrieve": RETRIEVED_ATTRIBUTES,
	});

	if let Some(filter) = type_filter.and_then(build_type_filter) {
		body["filter"] = Value::String(filter);
	}

	body
}

fn ensure_success(res: Response, path: &str) -> Result<Response> {
	let status = res.status();

	if !status.is_success() {
		return Err(Error::Status { status, path: path.to_string() });
	}

	Ok(res)
}

fn parse_search_response(json: Value) -> Result<SearchResponse> {
	if !json.get("hits").is_some_and(Value::is_array) {
		return Err(Error::InvalidResponse {
			message: "Search response is missing hits array.".to_string(),
		});
	}

	Ok(serde_json::from_value(json)?)
}
