//! The change list: request parameters to a restricted result page.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use grappelli_db::{
	DatabaseConnection, Filter, FilterCondition, FilterOperator, FilterValue, OrderBy,
	OrderDirection, Row, SelectQuery,
};

use crate::error::{ChangeListError, ChangeListResult};
use crate::pagination::Paginator;

/// Request parameter disabling pagination.
pub const ALL_VAR: &str = "all";
/// Request parameter selecting the ordering column by display index.
pub const ORDER_VAR: &str = "o";
/// Request parameter overriding the ordering direction (`asc`/`desc`).
pub const ORDER_TYPE_VAR: &str = "ot";
/// Request parameter selecting the page.
pub const PAGE_VAR: &str = "p";
/// Request parameter carrying the search term.
pub const SEARCH_VAR: &str = "q";
/// Request parameter naming the field a raw-id popup writes back to.
pub const TO_FIELD_VAR: &str = "t";
/// Request parameter marking a popup window.
pub const IS_POPUP_VAR: &str = "pop";
/// Request parameter flagging that the previous request had errors.
pub const ERROR_FLAG: &str = "e";

const META_FLAGS: [&str; 8] = [
	ALL_VAR,
	ORDER_VAR,
	ORDER_TYPE_VAR,
	PAGE_VAR,
	SEARCH_VAR,
	TO_FIELD_VAR,
	IS_POPUP_VAR,
	ERROR_FLAG,
];

/// Builds the filtered, searched, ordered, paginated query behind an
/// admin list page.
///
/// One instance serves one request: the result page and both counts are
/// computed lazily and memoized per instance.
pub struct ChangeList {
	conn: Arc<dyn DatabaseConnection>,
	table: String,
	params: Vec<(String, String)>,
	list_display: Vec<String>,
	list_filter: Vec<String>,
	search_fields: Vec<String>,
	list_per_page: u64,
	result_page: OnceCell<Vec<Row>>,
	filtered_count: OnceCell<u64>,
	full_count: OnceCell<u64>,
}

impl ChangeList {
	/// Creates a change list for one request.
	///
	/// `params` are the decoded query-string pairs in request order;
	/// `list_display` is the ordered set of displayed columns that the
	/// `o` parameter indexes into; `list_filter` names the fields the
	/// filter sidebar offers; `search_fields` may carry `^`, `=`, or `@`
	/// sigils selecting the match type.
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		conn: Arc<dyn DatabaseConnection>,
		table: impl Into<String>,
		list_display: Vec<String>,
		list_filter: Vec<String>,
		search_fields: Vec<String>,
		list_per_page: u64,
		params: Vec<(String, String)>,
	) -> Self {
		Self {
			conn,
			table: table.into(),
			params,
			list_display,
			list_filter,
			search_fields,
			list_per_page,
			result_page: OnceCell::new(),
			filtered_count: OnceCell::new(),
			full_count: OnceCell::new(),
		}
	}

	fn param(&self, key: &str) -> Option<&str> {
		self.params
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// The search term from the request, or the empty string.
	pub fn search_term(&self) -> &str {
		self.param(SEARCH_VAR).unwrap_or("")
	}

	/// Whether the request asked for the full, unpaginated list.
	pub fn show_all(&self) -> bool {
		self.param(ALL_VAR).is_some()
	}

	/// The fields from `list_filter` that the request is filtering on,
	/// with their raw values.
	pub fn active_filters(&self) -> Vec<(&str, &str)> {
		self.params
			.iter()
			.filter(|(key, _)| {
				let field = key.split("__").next().unwrap_or(key);
				self.list_filter.iter().any(|f| f == field)
			})
			.map(|(k, v)| (k.as_str(), v.as_str()))
			.collect()
	}

	/// Applies every non-reserved request parameter as a filter.
	fn apply_filters(&self, mut query: SelectQuery) -> ChangeListResult<SelectQuery> {
		for (key, value) in &self.params {
			if META_FLAGS.contains(&key.as_str()) {
				continue;
			}
			let filter = parse_lookup(key, value)?;
			debug!(field = %filter.field, "applying request filter");
			query = query.filter(FilterCondition::Single(filter));
		}
		Ok(query)
	}

	/// Applies the search term, one OR group per character.
	//
	// Splitting per character, not per word. Changing this changes which
	// rows match.
	fn apply_search(&self, mut query: SelectQuery) -> SelectQuery {
		let term = self.search_term().trim().to_string();
		if self.search_fields.is_empty() || term.is_empty() {
			return query;
		}

		for bit in term.chars() {
			let filters = self
				.search_fields
				.iter()
				.map(|field| construct_search(field, bit))
				.collect();
			query = query.filter(FilterCondition::or_filters(filters));
		}

		if self.search_fields.iter().any(|f| f.contains("__")) {
			query = query.distinct();
		}
		query
	}

	/// Applies the `o`/`ot` ordering parameters, ignoring unresolvable
	/// column indices.
	fn apply_ordering(&self, query: SelectQuery) -> SelectQuery {
		let Some(order_param) = self.param(ORDER_VAR) else {
			return query;
		};

		let (index_str, mut direction) = match order_param.strip_prefix('-') {
			Some(rest) => (rest, OrderDirection::Desc),
			None => (order_param, OrderDirection::Asc),
		};

		let Some(field) = index_str
			.parse::<usize>()
			.ok()
			.and_then(|idx| self.list_display.get(idx))
		else {
			// Out-of-range or non-numeric index: no ordering applied.
			return query;
		};

		match self.param(ORDER_TYPE_VAR) {
			Some("asc") => direction = OrderDirection::Asc,
			Some("desc") => direction = OrderDirection::Desc,
			_ => {}
		}

		query.order_by(OrderBy {
			field: field.clone(),
			direction,
		})
	}

	fn restricted_query(&self) -> ChangeListResult<SelectQuery> {
		let query = SelectQuery::new(&self.table);
		let query = self.apply_filters(query)?;
		Ok(self.apply_search(query))
	}

	/// The rows of the requested page.
	pub async fn result_page(&self) -> ChangeListResult<&[Row]> {
		let rows = self
			.result_page
			.get_or_try_init(|| async {
				let query = self.apply_ordering(self.restricted_query()?);
				if self.show_all() {
					return self.run_restricted(&query).await;
				}

				let count = self.filtered_count().await?;
				let paginator = Paginator::new(self.list_per_page);
				let requested = self
					.param(PAGE_VAR)
					.and_then(|p| p.parse::<u64>().ok())
					.unwrap_or(0);
				// Out-of-range pages fall back to the first page, which
				// always exists.
				let window = paginator
					.page(count, requested)
					.or_else(|_| paginator.page(count, 0))
					.unwrap_or(crate::pagination::PageWindow {
						offset: 0,
						limit: self.list_per_page.max(1),
					});

				self.run_restricted(&query.limit(window.limit).offset(window.offset))
					.await
			})
			.await?;
		Ok(rows)
	}

	/// Count of rows matching the request's filters and search.
	pub async fn filtered_count(&self) -> ChangeListResult<u64> {
		self.filtered_count
			.get_or_try_init(|| async {
				let query = self.restricted_query()?;
				self.conn
					.count(&query)
					.await
					.map_err(|_| ChangeListError::IncorrectLookupParameters)
			})
			.await
			.copied()
	}

	/// Count of all rows in the table, ignoring request parameters.
	pub async fn full_count(&self) -> ChangeListResult<u64> {
		self.full_count
			.get_or_try_init(|| async {
				let restricted = self.restricted_query()?;
				if restricted.condition.is_none() {
					// Nothing restricts the list; reuse the filtered count.
					return self.filtered_count().await;
				}
				Ok(self.conn.count(&SelectQuery::new(&self.table)).await?)
			})
			.await
			.copied()
	}

	/// Runs a request-restricted query, folding any backend rejection of
	/// the request-supplied filters into the dedicated lookup error.
	async fn run_restricted(&self, query: &SelectQuery) -> ChangeListResult<Vec<Row>> {
		self.conn
			.select(query)
			.await
			.map_err(|_| ChangeListError::IncorrectLookupParameters)
	}
}

/// Turns one `field[__lookup]=value` request parameter into a filter.
///
/// A trailing path segment that names a known lookup selects the
/// operator; otherwise the whole key is taken as a column path with an
/// exact match, and it is up to the backend to reject unknown columns.
fn parse_lookup(key: &str, value: &str) -> ChangeListResult<Filter> {
	if key.is_empty() {
		return Err(ChangeListError::IncorrectLookupParameters);
	}

	let (field, operator) = match key.rsplit_once("__") {
		Some((field, suffix)) => match FilterOperator::from_lookup(suffix) {
			Some(op) if !field.is_empty() => (field, op),
			_ => (key, FilterOperator::Exact),
		},
		None => (key, FilterOperator::Exact),
	};

	let filter_value = match operator {
		FilterOperator::In => {
			FilterValue::List(value.split(',').map(|s| s.to_string()).collect())
		}
		FilterOperator::IsNull => match value {
			"" | "0" | "false" | "False" => FilterValue::Boolean(false),
			_ => FilterValue::Boolean(true),
		},
		_ => FilterValue::Text(value.to_string()),
	};

	Ok(Filter::new(field, operator, filter_value))
}

/// Maps a search field's sigil to its match type for one search
/// character.
fn construct_search(field: &str, bit: char) -> Filter {
	let (field, operator) = if let Some(rest) = field.strip_prefix('^') {
		(rest, FilterOperator::IStartsWith)
	} else if let Some(rest) = field.strip_prefix('=') {
		(rest, FilterOperator::IExact)
	} else if let Some(rest) = field.strip_prefix('@') {
		(rest, FilterOperator::Search)
	} else {
		(field, FilterOperator::IContains)
	};
	Filter::new(field, operator, FilterValue::Text(bit.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_lookup_default_exact() {
		let filter = parse_lookup("name", "Germany").unwrap();
		assert_eq!(filter.field, "name");
		assert_eq!(filter.operator, FilterOperator::Exact);
		assert_eq!(filter.value, FilterValue::Text("Germany".into()));
	}

	#[test]
	fn test_parse_lookup_in_splits_on_commas() {
		let filter = parse_lookup("iso_two_letter__in", "US,NL,DE").unwrap();
		assert_eq!(filter.operator, FilterOperator::In);
		assert_eq!(
			filter.value,
			FilterValue::List(vec!["US".into(), "NL".into(), "DE".into()])
		);
	}

	#[test]
	fn test_parse_lookup_unknown_suffix_is_column_path() {
		// "author__name" is a relation path, not a lookup.
		let filter = parse_lookup("author__name", "x").unwrap();
		assert_eq!(filter.field, "author__name");
		assert_eq!(filter.operator, FilterOperator::Exact);
	}

	#[test]
	fn test_parse_lookup_isnull_value() {
		let filter = parse_lookup("deleted__isnull", "false").unwrap();
		assert_eq!(filter.value, FilterValue::Boolean(false));
		let filter = parse_lookup("deleted__isnull", "1").unwrap();
		assert_eq!(filter.value, FilterValue::Boolean(true));
	}

	#[test]
	fn test_construct_search_sigils() {
		assert_eq!(
			construct_search("^name", 'a').operator,
			FilterOperator::IStartsWith
		);
		assert_eq!(
			construct_search("=iso_two_letter", 'a').operator,
			FilterOperator::IExact
		);
		assert_eq!(
			construct_search("@summary", 'a').operator,
			FilterOperator::Search
		);
		assert_eq!(
			construct_search("name", 'a').operator,
			FilterOperator::IContains
		);
		assert_eq!(construct_search("^name", 'a').field, "name");
	}
}
