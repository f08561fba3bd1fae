//! Single-flight, TTL-bounded cache of partitioned engine results.
//!
//! Per key the state moves `Absent -> InFlight -> Cached -> (expiry | eviction) -> Absent`. One
//! mutex serializes every transition of the entry and marker maps and is never held across an
//! await point. The computation itself runs on a spawned task, so a caller that gives up or is
//! cancelled never aborts a remote call that later callers are waiting on.

use std::{
	collections::HashMap,
	future::Future,
	sync::{Arc, Mutex, MutexGuard, PoisonError},
	time::Duration,
};

use tokio::{
	sync::watch,
	time::{self, Instant},
};

use crate::{Error, Result, partition::PartitionedResult};

/// An immutable cached engine result. Replaced, never mutated.
#[derive(Debug)]
pub struct SearchCacheEntry {
	pub result: PartitionedResult,
	pub created_at: Instant,
}
impl SearchCacheEntry {
	pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
		now.saturating_duration_since(self.created_at) >= ttl
	}
}

#[derive(Debug, Default)]
struct CacheState {
	entries: HashMap<String, Arc<SearchCacheEntry>>,
	/// Dropping a sender wakes every waiter subscribed to that key.
	in_flight: HashMap<String, watch::Sender<()>>,
}

enum Claim {
	Hit(Arc<SearchCacheEntry>),
	Owner(InFlightGuard),
	Waiter(watch::Receiver<()>),
}

/// Holds the in-flight marker for one key. Dropping it without [`InFlightGuard::complete`]
/// releases the marker and stores nothing, which covers errors, panics and cancellation alike.
struct InFlightGuard {
	state: Arc<Mutex<CacheState>>,
	key: String,
	ttl: Duration,
	armed: bool,
}
impl InFlightGuard {
	fn complete(mut self, result: PartitionedResult) -> Arc<SearchCacheEntry> {
		let now = Instant::now();
		let entry = Arc::new(SearchCacheEntry { result, created_at: now });
		let mut state = lock(&self.state);

		state.entries.retain(|_, cached| !cached.is_expired(self.ttl, now));
		state.entries.insert(self.key.clone(), entry.clone());
		state.in_flight.remove(&self.key);

		self.armed = false;

		entry
	}
}
impl Drop for InFlightGuard {
	fn drop(&mut self) {
		if self.armed {
			lock(&self.state).in_flight.remove(&self.key);
		}
	}
}

#[derive(Debug)]
pub struct SearchCoordinator {
	ttl: Duration,
	wait_timeout: Duration,
	state: Arc<Mutex<CacheState>>,
}
impl SearchCoordinator {
	pub fn new(ttl: Duration, wait_timeout: Duration) -> Self {
		Self { ttl, wait_timeout, state: Arc::new(Mutex::new(CacheState::default())) }
	}

	pub fn from_config(cfg: &splice_config::SearchCache) -> Self {
		Self::new(Duration::from_millis(cfg.ttl_ms), Duration::from_millis(cfg.wait_timeout_ms))
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Returns the fresh entry for `key`, computing it at most once across concurrent callers.
	///
	/// A caller that finds another computation in flight waits up to the configured timeout. If
	/// that computation fails the waiter takes over; if the timeout passes first the waiter gets
	/// [`Error::Unavailable`] and the running computation is left alone.
	pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Result<Arc<SearchCacheEntry>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<PartitionedResult>> + Send + 'static,
	{
		let deadline = Instant::now() + self.wait_timeout;

		loop {
			let mut released = match self.claim(key) {
				Claim::Hit(entry) => return Ok(entry),
				Claim::Owner(guard) => return Self::run(guard, compute()).await,
				Claim::Waiter(released) => released,
			};

			// The sender is only ever dropped, so any wake-up means the marker is gone.
			if time::timeout_at(deadline, released.changed()).await.is_err() {
				tracing::warn!(key, "Timed out waiting for in-flight search.");

				return Err(Error::unavailable(format!(
					"timed out after {:?} waiting for in-flight search",
					self.wait_timeout
				)));
			}
		}
	}

	/// The fresh entry for `key`, if any. Never starts a computation.
	pub fn get(&self, key: &str) -> Option<Arc<SearchCacheEntry>> {
		let mut state = lock(&self.state);

		self.fresh_entry(&mut state, key)
	}

	pub fn is_in_flight(&self, key: &str) -> bool {
		lock(&self.state).in_flight.contains_key(key)
	}

	pub fn invalidate(&self, key: &str) -> bool {
		lock(&self.state).entries.remove(key).is_some()
	}

	/// Drops every cached entry. Running computations keep their markers and still store their
	/// result when they finish.
	pub fn clear(&self) {
		lock(&self.state).entries.clear();
	}

	/// Stored entries, including expired ones not yet swept.
	pub fn len(&self) -> usize {
		lock(&self.state).entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn claim(&self, key: &str) -> Claim {
		let mut state = lock(&self.state);

		if let Some(entry) = self.fresh_entry(&mut state, key) {
			return Claim::Hit(entry);
		}
		if let Some(marker) = state.in_flight.get(key) {
			return Claim::Waiter(marker.subscribe());
		}

		let (marker, _) = watch::channel(());

		state.in_flight.insert(key.to_string(), marker);

		Claim::Owner(InFlightGuard {
			state: self.state.clone(),
			key: key.to_string(),
			ttl: self.ttl,
			armed: true,
		})
	}

	fn fresh_entry(&self, state: &mut CacheState, key: &str) -> Option<Arc<SearchCacheEntry>> {
		let entry = state.entries.get(key)?;

		if entry.is_expired(self.ttl, Instant::now()) {
			state.entries.remove(key);

			return None;
		}

		Some(entry.clone())
	}

	async fn run<Fut>(guard: InFlightGuard, computation: Fut) -> Result<Arc<SearchCacheEntry>>
	where
		Fut: Future<Output = Result<PartitionedResult>> + Send + 'static,
	{
		let task = tokio::spawn(async move {
			let result = computation.await?;

			Ok::<_, Error>(guard.complete(result))
		});

		match task.await {
			Ok(outcome) => outcome,
			Err(err) => Err(Error::internal(format!("search computation aborted: {err}"))),
		}
	}
}

// Every critical section leaves both maps consistent, so a poisoned lock is still usable.
fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
	state.lock().unwrap_or_else(PoisonError::into_inner)
}
