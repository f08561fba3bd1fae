use std::collections::HashSet;

use serde::Serialize;

use splice_providers::SearchHit;

/// Engine hits reduced to item ids, split into library items and live TV items.
///
/// `regular_ids` and `live_ids` are disjoint subsequences of `ordered_ids` whose union is
/// `ordered_ids`. All three keep the engine's relevance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionedResult {
	pub ordered_ids: Vec<i64>,
	pub regular_ids: Vec<i64>,
	pub live_ids: Vec<i64>,
}
impl PartitionedResult {
	pub fn is_empty(&self) -> bool {
		self.ordered_ids.is_empty()
	}

	pub fn len(&self) -> usize {
		self.ordered_ids.len()
	}
}

pub fn partition_hits<'a, I>(hits: I, live_item_types: &[String]) -> PartitionedResult
where
	I: IntoIterator<Item = &'a SearchHit>,
{
	let mut seen = HashSet::new();
	let mut out = PartitionedResult::default();

	for hit in hits {
		if hit.internal_id <= 0 || !seen.insert(hit.internal_id) {
			continue;
		}

		out.ordered_ids.push(hit.internal_id);

		if live_item_types.iter().any(|t| t == &hit.item_type) {
			out.live_ids.push(hit.internal_id);
		} else {
			out.regular_ids.push(hit.internal_id);
		}
	}

	out
}
