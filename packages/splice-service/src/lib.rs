pub mod coordinator;
pub mod error;
pub mod intercept;
pub mod materialize;
pub mod partition;
pub mod query;
pub mod rewrite;

pub use coordinator::{SearchCacheEntry, SearchCoordinator};
pub use error::{Error, Result};
pub use intercept::{QueryInterceptor, SearchInterceptor};
pub use partition::{PartitionedResult, partition_hits};
pub use query::{DeclineReason, Interception, ItemsQuery, QueryResult};

use std::{future::Future, pin::Pin};

use splice_config::MeilisearchConfig;
use splice_providers::{Client, SearchHit, meilisearch};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The external full-text engine. Hits come back in authoritative relevance order.
pub trait SearchBackend
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		term: &'a str,
		type_filter: Option<&'a [String]>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<SearchHit>>>;
}

/// The host's item repository.
pub trait ItemStore
where
	Self: Send + Sync,
{
	type Item: Send;

	fn resolve(&self, id: i64) -> Option<Self::Item>;

	fn concrete_type<'a>(&self, item: &'a Self::Item) -> &'a str;
}

pub struct MeilisearchBackend {
	cfg: MeilisearchConfig,
	client: Client,
}
impl MeilisearchBackend {
	pub fn new(cfg: MeilisearchConfig) -> Result<Self> {
		let client = splice_providers::build_client(&cfg)?;

		Ok(Self { cfg, client })
	}

	pub fn config(&self) -> &MeilisearchConfig {
		&self.cfg
	}

	pub fn client(&self) -> &Client {
		&self.client
	}
}
impl SearchBackend for MeilisearchBackend {
	fn search<'a>(
		&'a self,
		term: &'a str,
		type_filter: Option<&'a [String]>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<SearchHit>>> {
		Box::pin(async move {
			let res = meilisearch::search(&self.client, &self.cfg, term, type_filter, limit).await?;

			Ok(res.hits)
		})
	}
}
