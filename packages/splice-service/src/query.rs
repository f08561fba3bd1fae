use serde::{Deserialize, Serialize};

use crate::Error;

/// The host's mutable item query, as seen at the interception point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemsQuery {
	pub search_term: Option<String>,
	pub include_item_types: Vec<String>,
	pub exclude_item_types: Vec<String>,
	/// `Some(false)` marks the per-type tab count request.
	pub group_by_presentation_unique_key: Option<bool>,
	pub limit: Option<usize>,
	/// Explicit id allow-list. Empty means unrestricted.
	pub item_ids: Vec<i64>,
	pub recursive: bool,
	pub parent_id: Option<i64>,
	pub top_parent_ids: Vec<i64>,
	pub ancestor_ids: Vec<i64>,
	pub enforce_content_restriction: bool,
	pub enforce_share_level: bool,
}
impl ItemsQuery {
	/// A plain free-text query with the host's usual restriction enforcement.
	pub fn search(term: impl Into<String>) -> Self {
		Self {
			search_term: Some(term.into()),
			enforce_content_restriction: true,
			enforce_share_level: true,
			..Default::default()
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult<T> {
	pub items: Vec<T>,
	pub total_record_count: usize,
}
impl<T> QueryResult<T> {
	pub fn from_items(items: Vec<T>) -> Self {
		let total_record_count = items.len();

		Self { items, total_record_count }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclineReason {
	EmptyTerm,
	Disabled,
	TermTooShort,
	NoResults,
	EmptyScope,
	Unavailable,
	InternalFault,
}
impl DeclineReason {
	/// Whether the host is running degraded because the engine path failed.
	pub fn is_degraded(self) -> bool {
		matches!(self, Self::Unavailable | Self::InternalFault)
	}
}

impl From<&Error> for DeclineReason {
	fn from(err: &Error) -> Self {
		match err {
			Error::Unavailable { .. } => Self::Unavailable,
			Error::InternalFault { .. } => Self::InternalFault,
		}
	}
}

/// What the host does next with the query it handed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception<T> {
	/// The query is untouched; run it as usual.
	Declined(DeclineReason),
	/// The query was rewritten in place to an id scope; run it as usual.
	Rewritten,
	/// The final result; skip host retrieval.
	Handled(QueryResult<T>),
}
impl<T> Interception<T> {
	pub fn is_handled(&self) -> bool {
		matches!(self, Self::Handled(_))
	}

	pub fn into_result(self) -> Option<QueryResult<T>> {
		match self {
			Self::Handled(result) => Some(result),
			_ => None,
		}
	}
}
