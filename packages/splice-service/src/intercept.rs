//! The host-facing interception point.
//!
//! A free-text query is looked up through the coordinator once per normalized term. The cached
//! ids then either rewrite the query into an id scope, or are materialized into the final result
//! when the query asks for a shape the host can take as-is.

use std::{
	panic::{self, AssertUnwindSafe},
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};

use splice_config::Search;

use crate::{
	BoxFuture, Error, ItemStore, Result, SearchBackend,
	coordinator::{SearchCacheEntry, SearchCoordinator},
	materialize,
	partition::partition_hits,
	query::{DeclineReason, Interception, ItemsQuery, QueryResult},
	rewrite,
};

/// The composition point a host registers at startup.
pub trait QueryInterceptor<T>
where
	Self: Send + Sync,
{
	fn intercept<'a>(&'a self, query: &'a mut ItemsQuery) -> BoxFuture<'a, Interception<T>>;
}

pub struct SearchInterceptor<S>
where
	S: ItemStore,
{
	cfg: Search,
	enabled: AtomicBool,
	backend: Arc<dyn SearchBackend>,
	store: Arc<S>,
	coordinator: SearchCoordinator,
}
impl<S> SearchInterceptor<S>
where
	S: ItemStore,
{
	pub fn new(cfg: Search, backend: Arc<dyn SearchBackend>, store: Arc<S>) -> Self {
		let coordinator = SearchCoordinator::from_config(&cfg.cache);

		Self { enabled: AtomicBool::new(cfg.enabled), cfg, backend, store, coordinator }
	}

	pub fn config(&self) -> &Search {
		&self.cfg
	}

	pub fn coordinator(&self) -> &SearchCoordinator {
		&self.coordinator
	}

	/// Runtime switch. Has no effect when the configuration disables search.
	pub fn set_enabled(&self, enabled: bool) {
		self.enabled.store(enabled, Ordering::Relaxed);

		tracing::info!(enabled, "Search interception toggled.");
	}

	pub fn is_enabled(&self) -> bool {
		self.cfg.enabled && self.enabled.load(Ordering::Relaxed)
	}

	/// Stops intercepting and drops every cached result.
	pub fn shutdown(&self) {
		self.enabled.store(false, Ordering::Relaxed);
		self.coordinator.clear();

		tracing::info!("Search interception shut down.");
	}

	/// The partitioned engine result for `term`, shared across concurrent callers.
	pub async fn lookup(&self, term: &str) -> Result<Arc<SearchCacheEntry>> {
		let term = term.trim();
		let key = cache_key(term);
		let backend = self.backend.clone();
		let owned_term = term.to_string();
		let limit = self.cfg.fetch_limit();
		let live_item_types = self.cfg.live_item_types.clone();

		self.coordinator
			.get_or_compute(&key, move || async move {
				let hits = backend.search(&owned_term, None, limit).await.inspect_err(|err| {
					tracing::error!(term = %owned_term, error = %err, "Search backend call failed.");
				})?;
				let result = partition_hits(&hits, &live_item_types);

				tracing::debug!(
					term = %owned_term,
					hits = hits.len(),
					regular = result.regular_ids.len(),
					live = result.live_ids.len(),
					"Partitioned search hits."
				);

				Ok::<_, Error>(result)
			})
			.await
	}

	/// Decides what the host does with `query`. Never fails; every failure declines.
	pub async fn intercept(&self, query: &mut ItemsQuery) -> Interception<S::Item> {
		match self.try_intercept(query).await {
			Ok(outcome) => {
				if let Interception::Declined(reason) = &outcome {
					tracing::debug!(?reason, "Search query declined.");
				}

				outcome
			},
			Err(err) => {
				let reason = DeclineReason::from(&err);

				tracing::warn!(?reason, error = %err, "Search interception degraded.");

				Interception::Declined(reason)
			},
		}
	}

	async fn try_intercept(&self, query: &mut ItemsQuery) -> Result<Interception<S::Item>> {
		let Some(term) = query.search_term.as_deref().map(str::trim).filter(|t| !t.is_empty())
		else {
			return Ok(Interception::Declined(DeclineReason::EmptyTerm));
		};

		if !self.is_enabled() {
			return Ok(Interception::Declined(DeclineReason::Disabled));
		}
		if term.chars().count() < self.cfg.min_term_length {
			return Ok(Interception::Declined(DeclineReason::TermTooShort));
		}

		let entry = self.lookup(term).await?;
		let result = &entry.result;

		if result.is_empty() {
			return Ok(Interception::Declined(DeclineReason::NoResults));
		}

		let preserve = self.cfg.rewrite.preserve_restrictions;

		if self.requests_broadcast(&query.include_item_types) {
			return Ok(scoped(rewrite::scope_to_ids(query, &result.live_ids, preserve)));
		}
		if !query.include_item_types.is_empty() {
			return Ok(scoped(rewrite::scope_to_ids(query, &result.regular_ids, preserve)));
		}
		if query.group_by_presentation_unique_key == Some(false) {
			let facets = guarded("facets", || {
				materialize::facets(self.store.as_ref(), &result.ordered_ids, self.cfg.facet_scan_limit)
			})?;

			return Ok(Interception::Handled(facets));
		}

		let limit = query.limit.unwrap_or(self.cfg.default_limit);
		let top = guarded("top_n", || {
			materialize::top_n(
				self.store.as_ref(),
				&result.ordered_ids,
				limit,
				&self.cfg.excluded_item_types,
			)
		})?;

		Ok(Interception::Handled(top))
	}

	fn requests_broadcast(&self, include_item_types: &[String]) -> bool {
		include_item_types.iter().any(|requested| {
			self.cfg.broadcast_request_types.iter().any(|t| t.eq_ignore_ascii_case(requested))
		})
	}
}
impl<S> QueryInterceptor<S::Item> for SearchInterceptor<S>
where
	S: ItemStore,
{
	fn intercept<'a>(&'a self, query: &'a mut ItemsQuery) -> BoxFuture<'a, Interception<S::Item>> {
		Box::pin(SearchInterceptor::intercept(self, query))
	}
}

/// Case-insensitive cache key for a search term.
pub fn cache_key(term: &str) -> String {
	term.trim().to_lowercase()
}

/// Runs a materializer over the host store. A panicking store becomes an internal fault.
fn guarded<T>(
	policy: &'static str,
	run: impl FnOnce() -> QueryResult<T>,
) -> Result<QueryResult<T>> {
	panic::catch_unwind(AssertUnwindSafe(run)).map_err(|payload| {
		let message = payload
			.downcast_ref::<&str>()
			.copied()
			.or_else(|| payload.downcast_ref::<String>().map(String::as_str))
			.unwrap_or("non-string panic");

		Error::internal(format!("item store panicked during {policy}: {message}"))
	})
}

fn scoped<T>(rewritten: bool) -> Interception<T> {
	if rewritten { Interception::Rewritten } else { Interception::Declined(DeclineReason::EmptyScope) }
}
