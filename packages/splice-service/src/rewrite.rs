use crate::query::ItemsQuery;

/// Turns a free-text query into an id-scoped one.
///
/// The id set already encodes the intended scope, so parent, ancestor and top-parent scoping and
/// exclude-type filters are dropped. Returns `false` and leaves the query untouched when `ids` is
/// empty.
pub fn scope_to_ids(query: &mut ItemsQuery, ids: &[i64], preserve_restrictions: bool) -> bool {
	if ids.is_empty() {
		return false;
	}

	query.search_term = None;
	query.item_ids = ids.to_vec();
	query.recursive = true;
	query.parent_id = None;
	query.top_parent_ids.clear();
	query.ancestor_ids.clear();
	query.exclude_item_types.clear();

	if !preserve_restrictions {
		query.enforce_content_restriction = false;
		query.enforce_share_level = false;
	}

	true
}
