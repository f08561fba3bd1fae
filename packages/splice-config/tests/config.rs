use std::path::PathBuf;

fn example_path() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../splice.example.toml")
}

#[test]
fn loads_example_config() {
	let cfg = splice_config::load(&example_path()).expect("Failed to load example config.");

	assert_eq!(cfg.service.log_level, "info");
	assert!(cfg.search.enabled);
	assert_eq!(cfg.search.default_limit, 50);
	assert_eq!(cfg.search.facet_scan_limit, 50);
	assert_eq!(
		cfg.search.broadcast_request_types,
		vec!["TvChannel".to_string(), "LiveTvChannel".to_string()]
	);
	assert_eq!(cfg.providers.meilisearch.api_base, "http://localhost:7700");
	assert!(cfg.providers.meilisearch.api_key.is_empty());
	assert!(cfg.providers.meilisearch.default_headers.is_empty());
}

#[test]
fn missing_file_is_read_error() {
	let err = splice_config::load(&example_path().with_file_name("missing.toml"))
		.expect_err("Expected read error.");

	assert!(matches!(err, splice_config::Error::ReadConfig { .. }));
}
