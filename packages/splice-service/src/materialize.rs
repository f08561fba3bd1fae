use std::collections::HashSet;

use crate::{ItemStore, query::QueryResult};

/// Resolves ids in relevance order into at most `limit` items, dropping unresolvable ids and any
/// item whose concrete type is in `excluded_types`.
pub fn top_n<S>(store: &S, ids: &[i64], limit: usize, excluded_types: &[String]) -> QueryResult<S::Item>
where
	S: ItemStore + ?Sized,
{
	let mut items = Vec::with_capacity(limit.min(ids.len()));

	for &id in ids {
		if items.len() >= limit {
			break;
		}
		if id <= 0 {
			continue;
		}

		let Some(item) = store.resolve(id) else {
			continue;
		};

		if excluded_types.iter().any(|t| t == store.concrete_type(&item)) {
			continue;
		}

		items.push(item);
	}

	QueryResult::from_items(items)
}

/// One representative item per concrete type, taken from the first `scan_limit` ids.
///
/// Hosts use the result only to decide which type tabs to show, so the scan is capped
/// independently of the page size.
pub fn facets<S>(store: &S, ids: &[i64], scan_limit: usize) -> QueryResult<S::Item>
where
	S: ItemStore + ?Sized,
{
	let mut seen_types = HashSet::new();
	let mut items = Vec::new();

	for &id in ids.iter().take(scan_limit) {
		if id <= 0 {
			continue;
		}

		let Some(item) = store.resolve(id) else {
			continue;
		};

		if seen_types.insert(store.concrete_type(&item).to_string()) {
			items.push(item);
		}
	}

	QueryResult::from_items(items)
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	#[derive(Debug, Clone, PartialEq, Eq)]
	struct Record {
		id: i64,
		kind: &'static str,
	}

	struct Library(HashMap<i64, Record>);
	impl Library {
		fn new(records: &[(i64, &'static str)]) -> Self {
			Self(records.iter().map(|&(id, kind)| (id, Record { id, kind })).collect())
		}
	}
	impl ItemStore for Library {
		type Item = Record;

		fn resolve(&self, id: i64) -> Option<Record> {
			self.0.get(&id).cloned()
		}

		fn concrete_type<'a>(&self, item: &'a Record) -> &'a str {
			item.kind
		}
	}

	fn ids(result: &QueryResult<Record>) -> Vec<i64> {
		result.items.iter().map(|r| r.id).collect()
	}

	fn episode() -> Vec<String> {
		vec!["Episode".to_string()]
	}

	#[test]
	fn top_n_skips_excluded_types_and_fills_limit() {
		let library = Library::new(&[(1, "Episode"), (2, "Movie"), (3, "Series")]);
		let result = top_n(&library, &[1, 2, 3], 2, &episode());

		assert_eq!(ids(&result), vec![2, 3]);
		assert_eq!(result.total_record_count, 2);
	}

	#[test]
	fn top_n_skips_unresolved_and_stops_at_limit() {
		let library = Library::new(&[(2, "Movie"), (4, "Audio"), (5, "Movie"), (6, "Movie")]);
		let result = top_n(&library, &[9, 2, 4, 5, 6], 3, &episode());

		assert_eq!(ids(&result), vec![2, 4, 5]);
	}

	#[test]
	fn top_n_stops_when_ids_run_out() {
		let library = Library::new(&[(2, "Movie")]);
		let result = top_n(&library, &[2, 3], 50, &episode());

		assert_eq!(ids(&result), vec![2]);
	}

	#[test]
	fn top_n_with_zero_limit_is_empty() {
		let library = Library::new(&[(2, "Movie")]);

		assert!(top_n(&library, &[2], 0, &episode()).items.is_empty());
	}

	#[test]
	fn facets_keep_first_item_per_type_within_scan() {
		let mut records = Vec::new();

		for id in 1..=60 {
			let kind = match id {
				1..=20 => "Movie",
				21..=45 => "Series",
				46..=50 => "Episode",
				_ => "MusicAlbum",
			};

			records.push((id, kind));
		}

		let library = Library::new(&records);
		let order: Vec<i64> = (1..=60).collect();
		let result = facets(&library, &order, 50);

		assert_eq!(ids(&result), vec![1, 21, 46]);
		assert_eq!(result.total_record_count, 3);
	}

	#[test]
	fn facets_ignore_unresolved_ids() {
		let library = Library::new(&[(3, "Series"), (4, "Series"), (5, "Movie")]);
		let result = facets(&library, &[1, 2, 3, 4, 5], 50);

		assert_eq!(ids(&result), vec![3, 5]);
	}
}
