use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::{Table, Value};

use splice_config::Error;

const EXAMPLE_CONFIG_TOML: &str = include_str!("../../../splice.example.toml");

fn example_with(section: &[&str], key: &str, value: Value) -> String {
	let mut root: Table = toml::from_str(EXAMPLE_CONFIG_TOML).expect("Failed to parse example config.");
	let mut table = &mut root;

	for name in section {
		table = table
			.get_mut(*name)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Example config must include [{name}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render example config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("splice_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_error(payload: String) -> Error {
	let path = write_temp_config(payload);
	let result = splice_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result.expect_err("Expected validation error.")
}

fn assert_rejected(payload: String, expected: &str) {
	let err = load_error(payload);
	let message = err.to_string();

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error: {err:?}");
	assert_eq!(message, expected);
}

#[test]
fn example_toml_is_valid() {
	let path = write_temp_config(EXAMPLE_CONFIG_TOML.to_string());
	let result = splice_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Example config must load.");

	assert_eq!(cfg.search.fetch_limit(), 100);
	assert_eq!(cfg.search.cache.wait_timeout_ms, 500);
	assert!(!cfg.search.rewrite.preserve_restrictions);
}

#[test]
fn wait_timeout_must_stay_below_ttl() {
	assert_rejected(
		example_with(&["search", "cache"], "wait_timeout_ms", Value::Integer(30_000)),
		"search.cache.wait_timeout_ms must be less than search.cache.ttl_ms.",
	);
}

#[test]
fn cache_ttl_must_be_positive() {
	assert_rejected(
		example_with(&["search", "cache"], "ttl_ms", Value::Integer(0)),
		"search.cache.ttl_ms must be greater than zero.",
	);
}

#[test]
fn search_sizes_must_be_positive() {
	for key in ["min_term_length", "default_limit", "facet_scan_limit", "max_results"] {
		assert_rejected(
			example_with(&["search"], key, Value::Integer(0)),
			&format!("search.{key} must be greater than zero."),
		);
	}
}

#[test]
fn live_types_cannot_be_blank() {
	assert_rejected(
		example_with(
			&["search"],
			"live_item_types",
			Value::Array(vec![Value::String("  ".to_string())]),
		),
		"search.live_item_types must be non-empty.",
	);
}

#[test]
fn api_base_cannot_be_whitespace() {
	assert_rejected(
		example_with(&["providers", "meilisearch"], "api_base", Value::String("   ".to_string())),
		"providers.meilisearch.api_base must be non-empty.",
	);
}

#[test]
fn provider_timeout_must_be_positive() {
	assert_rejected(
		example_with(&["providers", "meilisearch"], "timeout_ms", Value::Integer(0)),
		"providers.meilisearch.timeout_ms must be greater than zero.",
	);
}

#[test]
fn api_base_trailing_slash_is_trimmed() {
	let path = write_temp_config(example_with(
		&["providers", "meilisearch"],
		"api_base",
		Value::String(" http://search.local:7700/ ".to_string()),
	));
	let result = splice_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Config must load.");

	assert_eq!(cfg.providers.meilisearch.api_base, "http://search.local:7700");
}

#[test]
fn malformed_toml_is_parse_error() {
	let err = load_error("[search\nenabled = true".to_string());

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}
