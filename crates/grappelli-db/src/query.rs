//! Structured query types.
//!
//! These types are the currency between the higher-level crates (admin
//! changelist, fixture loader) and a database backend: filters with
//! AND/OR/NOT composition, ordering, pagination, and multi-row inserts.
//! Rendering to SQL text lives in [`crate::sql`]; the in-memory testing
//! backend interprets the structured form directly.

use serde::{Deserialize, Serialize};

use crate::connection::SqlValue;

/// Comparison operator of a single filter expression.
///
/// The set mirrors the lookup suffixes accepted in query-string filter
/// parameters (`field__lookup=value`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
	/// Exact match (the default when no lookup suffix is given).
	Exact,
	/// Case-insensitive exact match.
	IExact,
	/// Substring match.
	Contains,
	/// Case-insensitive substring match.
	IContains,
	/// Case-insensitive prefix match.
	IStartsWith,
	/// Membership in a comma-separated list.
	In,
	/// Greater than.
	Gt,
	/// Greater than or equal.
	Gte,
	/// Less than.
	Lt,
	/// Less than or equal.
	Lte,
	/// NULL check; the value selects IS NULL (true) or IS NOT NULL.
	IsNull,
	/// Full-text search match.
	Search,
}

impl FilterOperator {
	/// Resolves a lookup suffix (`"icontains"`, `"in"`, ...) to an
	/// operator. Returns `None` for suffixes this seam does not know,
	/// which callers surface as an invalid lookup parameter.
	pub fn from_lookup(lookup: &str) -> Option<Self> {
		match lookup {
			"exact" => Some(Self::Exact),
			"iexact" => Some(Self::IExact),
			"contains" => Some(Self::Contains),
			"icontains" => Some(Self::IContains),
			"istartswith" => Some(Self::IStartsWith),
			"in" => Some(Self::In),
			"gt" => Some(Self::Gt),
			"gte" => Some(Self::Gte),
			"lt" => Some(Self::Lt),
			"lte" => Some(Self::Lte),
			"isnull" => Some(Self::IsNull),
			"search" => Some(Self::Search),
			_ => None,
		}
	}
}

/// Value side of a filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
	/// Text value.
	Text(String),
	/// Integer value.
	Integer(i64),
	/// Floating point value.
	Float(f64),
	/// Boolean value.
	Boolean(bool),
	/// SQL NULL.
	Null,
	/// List of values, used with [`FilterOperator::In`].
	List(Vec<String>),
}

impl From<&str> for FilterValue {
	fn from(s: &str) -> Self {
		FilterValue::Text(s.to_string())
	}
}

impl From<String> for FilterValue {
	fn from(s: String) -> Self {
		FilterValue::Text(s)
	}
}

impl From<i64> for FilterValue {
	fn from(i: i64) -> Self {
		FilterValue::Integer(i)
	}
}

impl From<bool> for FilterValue {
	fn from(b: bool) -> Self {
		FilterValue::Boolean(b)
	}
}

/// A single filter expression: `field <operator> value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
	/// Column name, possibly spanning a relation (`"author__name"`).
	pub field: String,
	/// Comparison operator.
	pub operator: FilterOperator,
	/// Comparison value.
	pub value: FilterValue,
}

impl Filter {
	/// Creates a new filter expression.
	pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
		Self {
			field: field.into(),
			operator,
			value,
		}
	}

	/// True when the filter's field traverses a relation.
	pub fn spans_relation(&self) -> bool {
		self.field.contains("__")
	}
}

/// Composite filter condition with AND/OR/NOT logic.
///
/// Search across several fields is expressed as an OR group of
/// per-field filters; stacking filters from request parameters is an
/// AND group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterCondition {
	/// A single filter expression.
	Single(Filter),
	/// All conditions must match.
	And(Vec<FilterCondition>),
	/// Any condition must match.
	Or(Vec<FilterCondition>),
	/// Negates the inner condition.
	Not(Box<FilterCondition>),
}

impl FilterCondition {
	/// Wraps a single filter.
	pub fn single(filter: Filter) -> Self {
		Self::Single(filter)
	}

	/// AND-combination of conditions.
	pub fn and(conditions: Vec<FilterCondition>) -> Self {
		Self::And(conditions)
	}

	/// OR-combination of conditions.
	pub fn or(conditions: Vec<FilterCondition>) -> Self {
		Self::Or(conditions)
	}

	/// Negation of a condition.
	// A plain constructor reads better at call sites than
	// implementing std::ops::Not.
	#[allow(clippy::should_implement_trait)]
	pub fn not(condition: FilterCondition) -> Self {
		Self::Not(Box::new(condition))
	}

	/// OR-combination of plain filters, the shape search code builds.
	pub fn or_filters(filters: Vec<Filter>) -> Self {
		Self::Or(filters.into_iter().map(FilterCondition::Single).collect())
	}

	/// AND-combination of plain filters.
	pub fn and_filters(filters: Vec<Filter>) -> Self {
		Self::And(filters.into_iter().map(FilterCondition::Single).collect())
	}

	/// True when the condition contains no actual filter.
	pub fn is_empty(&self) -> bool {
		match self {
			FilterCondition::Single(_) => false,
			FilterCondition::And(conditions) | FilterCondition::Or(conditions) => {
				conditions.is_empty() || conditions.iter().all(|c| c.is_empty())
			}
			FilterCondition::Not(condition) => condition.is_empty(),
		}
	}

	/// Visits every single filter in the condition tree.
	pub fn for_each_filter(&self, f: &mut impl FnMut(&Filter)) {
		match self {
			FilterCondition::Single(filter) => f(filter),
			FilterCondition::And(conditions) | FilterCondition::Or(conditions) => {
				for condition in conditions {
					condition.for_each_filter(f);
				}
			}
			FilterCondition::Not(condition) => condition.for_each_filter(f),
		}
	}
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
	/// Ascending.
	Asc,
	/// Descending.
	Desc,
}

impl OrderDirection {
	/// The opposite direction.
	pub fn reversed(self) -> Self {
		match self {
			OrderDirection::Asc => OrderDirection::Desc,
			OrderDirection::Desc => OrderDirection::Asc,
		}
	}
}

/// One ordering term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
	/// Column to sort by.
	pub field: String,
	/// Sort direction.
	pub direction: OrderDirection,
}

impl OrderBy {
	/// Ascending ordering on a field.
	pub fn asc(field: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			direction: OrderDirection::Asc,
		}
	}

	/// Descending ordering on a field.
	pub fn desc(field: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			direction: OrderDirection::Desc,
		}
	}

	/// Parses the `-field` convention: a leading minus means descending.
	pub fn parse(spec: &str) -> Self {
		match spec.strip_prefix('-') {
			Some(field) => Self::desc(field),
			None => Self::asc(spec),
		}
	}
}

/// A restricted, ordered, paginated select over one table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
	/// Table to select from.
	pub table: String,
	/// Columns to project; empty means all columns.
	pub columns: Vec<String>,
	/// Row restriction.
	pub condition: Option<FilterCondition>,
	/// Ordering terms, applied in sequence.
	pub order: Vec<OrderBy>,
	/// Maximum number of rows.
	pub limit: Option<u64>,
	/// Number of rows to skip.
	pub offset: Option<u64>,
	/// Whether duplicate rows are collapsed.
	pub distinct: bool,
}

impl SelectQuery {
	/// Creates a query selecting all columns of a table.
	pub fn new(table: impl Into<String>) -> Self {
		Self {
			table: table.into(),
			columns: Vec::new(),
			condition: None,
			order: Vec::new(),
			limit: None,
			offset: None,
			distinct: false,
		}
	}

	/// Restricts the projection to the given columns.
	pub fn columns<I, S>(mut self, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.columns = columns.into_iter().map(Into::into).collect();
		self
	}

	/// AND-merges a condition into the existing restriction.
	pub fn filter(mut self, condition: FilterCondition) -> Self {
		self.condition = Some(match self.condition.take() {
			Some(existing) => FilterCondition::And(vec![existing, condition]),
			None => condition,
		});
		self
	}

	/// Appends an ordering term.
	pub fn order_by(mut self, order: OrderBy) -> Self {
		self.order.push(order);
		self
	}

	/// Replaces the ordering.
	pub fn ordering(mut self, order: Vec<OrderBy>) -> Self {
		self.order = order;
		self
	}

	/// Caps the number of returned rows.
	pub fn limit(mut self, limit: u64) -> Self {
		self.limit = Some(limit);
		self
	}

	/// Skips the first `offset` rows.
	pub fn offset(mut self, offset: u64) -> Self {
		self.offset = Some(offset);
		self
	}

	/// Collapses duplicate result rows.
	pub fn distinct(mut self) -> Self {
		self.distinct = true;
		self
	}

	/// A copy of this query with ordering and pagination stripped, the
	/// shape used for counting.
	pub fn for_count(&self) -> Self {
		Self {
			table: self.table.clone(),
			columns: Vec::new(),
			condition: self.condition.clone(),
			order: Vec::new(),
			limit: None,
			offset: None,
			distinct: self.distinct,
		}
	}
}

/// A multi-row insert into one table.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
	/// Target table.
	pub table: String,
	/// Column names, in row order.
	pub columns: Vec<String>,
	/// Rows of values; each must match `columns` in length.
	pub rows: Vec<Vec<SqlValue>>,
}

impl InsertStatement {
	/// Creates an insert statement.
	pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			table: table.into(),
			columns: columns.into_iter().map(Into::into).collect(),
			rows: Vec::new(),
		}
	}

	/// Appends one row of values.
	pub fn row(mut self, values: Vec<SqlValue>) -> Self {
		self.rows.push(values);
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_operator_from_lookup() {
		assert_eq!(FilterOperator::from_lookup("in"), Some(FilterOperator::In));
		assert_eq!(
			FilterOperator::from_lookup("icontains"),
			Some(FilterOperator::IContains)
		);
		assert_eq!(FilterOperator::from_lookup("regex"), None);
	}

	#[test]
	fn test_order_by_parse() {
		assert_eq!(OrderBy::parse("name"), OrderBy::asc("name"));
		assert_eq!(OrderBy::parse("-name"), OrderBy::desc("name"));
	}

	#[test]
	fn test_condition_is_empty() {
		assert!(FilterCondition::And(vec![]).is_empty());
		assert!(FilterCondition::Or(vec![FilterCondition::And(vec![])]).is_empty());

		let single = FilterCondition::single(Filter::new(
			"name",
			FilterOperator::Exact,
			FilterValue::from("x"),
		));
		assert!(!single.is_empty());
		assert!(!FilterCondition::not(single).is_empty());
	}

	#[test]
	fn test_filter_merge_is_conjunction() {
		let q = SelectQuery::new("country")
			.filter(FilterCondition::single(Filter::new(
				"name",
				FilterOperator::IContains,
				FilterValue::from("land"),
			)))
			.filter(FilterCondition::single(Filter::new(
				"iso_two_letter",
				FilterOperator::Exact,
				FilterValue::from("NL"),
			)));

		match q.condition {
			Some(FilterCondition::And(parts)) => assert_eq!(parts.len(), 2),
			other => panic!("expected AND condition, got {other:?}"),
		}
	}

	#[test]
	fn test_for_count_strips_pagination() {
		let q = SelectQuery::new("country")
			.order_by(OrderBy::desc("name"))
			.limit(10)
			.offset(20);
		let count = q.for_count();
		assert!(count.order.is_empty());
		assert!(count.limit.is_none());
		assert!(count.offset.is_none());
	}
}
