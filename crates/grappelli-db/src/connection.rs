//! Connection and transaction traits.
//!
//! Applications plug a real driver in behind [`DatabaseConnection`];
//! everything above this crate only sees structured statements and
//! [`Row`] values coming back.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::backends::DatabaseBackend;
use crate::error::DbResult;
use crate::query::{InsertStatement, SelectQuery};

/// A scalar value travelling to or from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
	/// SQL NULL.
	Null,
	/// Signed integer.
	Integer(i64),
	/// Double precision float.
	Float(f64),
	/// Text.
	Text(String),
	/// Boolean.
	Bool(bool),
}

impl SqlValue {
	/// True for [`SqlValue::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, SqlValue::Null)
	}

	/// Text content, if this is a text value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			SqlValue::Text(s) => Some(s),
			_ => None,
		}
	}

	/// Integer content, if this is an integer value.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			SqlValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	/// Boolean content, if this is a boolean value.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			SqlValue::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Renders the value the way it would appear in a text column.
	pub fn to_text(&self) -> String {
		match self {
			SqlValue::Null => String::new(),
			SqlValue::Integer(i) => i.to_string(),
			SqlValue::Float(f) => f.to_string(),
			SqlValue::Text(s) => s.clone(),
			SqlValue::Bool(b) => b.to_string(),
		}
	}

	/// Total ordering used for ORDER BY in the in-memory backend: NULLs
	/// first, then numeric comparison where both sides are numeric, then
	/// text comparison.
	pub fn compare(&self, other: &SqlValue) -> Ordering {
		match (self, other) {
			(SqlValue::Null, SqlValue::Null) => Ordering::Equal,
			(SqlValue::Null, _) => Ordering::Less,
			(_, SqlValue::Null) => Ordering::Greater,
			(a, b) => match (a.as_number(), b.as_number()) {
				(Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
				_ => a.to_text().cmp(&b.to_text()),
			},
		}
	}

	fn as_number(&self) -> Option<f64> {
		match self {
			SqlValue::Integer(i) => Some(*i as f64),
			SqlValue::Float(f) => Some(*f),
			SqlValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
			_ => None,
		}
	}
}

impl From<&str> for SqlValue {
	fn from(s: &str) -> Self {
		SqlValue::Text(s.to_string())
	}
}

impl From<String> for SqlValue {
	fn from(s: String) -> Self {
		SqlValue::Text(s)
	}
}

impl From<i64> for SqlValue {
	fn from(i: i64) -> Self {
		SqlValue::Integer(i)
	}
}

impl From<i32> for SqlValue {
	fn from(i: i32) -> Self {
		SqlValue::Integer(i64::from(i))
	}
}

impl From<f64> for SqlValue {
	fn from(f: f64) -> Self {
		SqlValue::Float(f)
	}
}

impl From<bool> for SqlValue {
	fn from(b: bool) -> Self {
		SqlValue::Bool(b)
	}
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
	fn from(opt: Option<T>) -> Self {
		match opt {
			Some(v) => v.into(),
			None => SqlValue::Null,
		}
	}
}

/// One result row: column names and values in matching order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
	columns: Vec<String>,
	values: Vec<SqlValue>,
}

impl Row {
	/// Creates a row. `columns` and `values` must have the same length.
	pub fn new(columns: Vec<String>, values: Vec<SqlValue>) -> Self {
		debug_assert_eq!(columns.len(), values.len());
		Self { columns, values }
	}

	/// Column names in projection order.
	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	/// Values in projection order.
	pub fn values(&self) -> &[SqlValue] {
		&self.values
	}

	/// Looks a value up by column name.
	pub fn get(&self, column: &str) -> Option<&SqlValue> {
		self.columns
			.iter()
			.position(|c| c == column)
			.map(|idx| &self.values[idx])
	}

	/// Consumes the row into its parts.
	pub fn into_parts(self) -> (Vec<String>, Vec<SqlValue>) {
		(self.columns, self.values)
	}

	/// A copy of this row restricted to the given columns, preserving
	/// their order. Missing columns become NULL.
	pub fn project(&self, columns: &[String]) -> Row {
		let values = columns
			.iter()
			.map(|c| self.get(c).cloned().unwrap_or(SqlValue::Null))
			.collect();
		Row::new(columns.to_vec(), values)
	}
}

/// Statement execution surface shared by connections and transactions.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
	/// Executes a multi-row insert, returning the number of rows written.
	async fn insert(&self, stmt: &InsertStatement) -> DbResult<u64>;

	/// Runs a select and returns the result rows.
	async fn select(&self, query: &SelectQuery) -> DbResult<Vec<Row>>;

	/// Executes a raw SQL statement, e.g. a sequence reset.
	async fn execute_raw(&self, sql: &str) -> DbResult<u64>;
}

/// An open transaction. Dropping without [`commit`](Transaction::commit)
/// must behave like a rollback.
#[async_trait]
pub trait Transaction: TransactionExecutor {
	/// Makes the transaction's writes visible.
	async fn commit(self: Box<Self>) -> DbResult<()>;

	/// Discards the transaction's writes.
	async fn rollback(self: Box<Self>) -> DbResult<()>;
}

/// A database connection.
#[async_trait]
pub trait DatabaseConnection: TransactionExecutor {
	/// Opens a transaction.
	async fn begin(&self) -> DbResult<Box<dyn Transaction>>;

	/// Counts the rows a query would return. The default implementation
	/// materializes the rows; SQL-backed implementations should issue
	/// `SELECT COUNT(*)` instead.
	async fn count(&self, query: &SelectQuery) -> DbResult<u64> {
		Ok(self.select(&query.for_count()).await?.len() as u64)
	}

	/// The backend this connection talks to, used for row adaptation and
	/// sequence reset SQL.
	fn backend(&self) -> &dyn DatabaseBackend;
}
