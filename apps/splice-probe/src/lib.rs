use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use splice_providers::meilisearch;
use splice_service::{MeilisearchBackend, PartitionedResult, SearchBackend, partition_hits};

#[derive(Debug, Parser)]
#[command(
	version = splice_cli::VERSION,
	rename_all = "kebab",
	styles = splice_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Print the engine status.
	Health,
	/// Print the index statistics.
	Stats,
	/// Run one engine search and print the partitioned ids.
	Search {
		term: String,
		/// Restrict the search to these item types. Channel and program aliases are accepted.
		#[arg(long, value_delimiter = ',')]
		types: Vec<String>,
	},
}

#[derive(Debug, Serialize)]
pub struct SearchReport {
	pub term: String,
	#[serde(flatten)]
	pub result: PartitionedResult,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = splice_config::load(&args.config)?;
	init_tracing(&config)?;
	let backend = MeilisearchBackend::new(config.providers.meilisearch.clone())?;

	match args.command {
		Command::Health => {
			let health = meilisearch::health(backend.client(), backend.config()).await?;

			if !health.is_available() {
				return Err(eyre::eyre!("Meilisearch reports status {}.", health.status));
			}

			println!("{}", health.status);
		},
		Command::Stats => {
			let stats = meilisearch::index_stats(backend.client(), backend.config()).await?;

			println!("{}", serde_json::to_string_pretty(&stats)?);
		},
		Command::Search { term, types } => {
			let report = search(&backend, &config.search, &term, &types).await?;

			println!("{}", serde_json::to_string_pretty(&report)?);
		},
	}

	Ok(())
}

/// Runs the same engine query the interceptor would, without touching any cache.
pub async fn search(
	backend: &dyn SearchBackend,
	cfg: &splice_config::Search,
	term: &str,
	types: &[String],
) -> color_eyre::Result<SearchReport> {
	let term = term.trim();

	if term.is_empty() {
		return Err(eyre::eyre!("Search term must not be empty."));
	}

	let type_filter = (!types.is_empty()).then_some(types);
	let hits = backend.search(term, type_filter, cfg.fetch_limit()).await?;
	let result = partition_hits(&hits, &cfg.live_item_types);

	tracing::info!(term, hits = hits.len(), ids = result.len(), "Debug search completed.");

	Ok(SearchReport { term: term.to_string(), result })
}

fn init_tracing(config: &splice_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).init();
	Ok(())
}
