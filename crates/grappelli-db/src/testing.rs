//! In-memory connection for tests.
//!
//! [`InMemoryConnection`] interprets the structured query form directly
//! instead of going through SQL, stores rows per table, and records raw
//! statements (sequence resets) so tests can assert they ran.
//! Transactions work on a snapshot and publish it on commit, which makes
//! rollback behavior observable.
//!
//! Semantics are close enough to a real backend for the glue layers under
//! test: full-text search degrades to a case-insensitive substring match
//! here.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::backends::{DatabaseBackend, PostgresBackend};
use crate::connection::{DatabaseConnection, Row, SqlValue, Transaction, TransactionExecutor};
use crate::error::{DbError, DbResult};
use crate::query::{
	Filter, FilterCondition, FilterOperator, FilterValue, InsertStatement, OrderDirection,
	SelectQuery,
};

type Tables = HashMap<String, Vec<Row>>;

/// In-memory [`DatabaseConnection`] implementation.
#[derive(Default)]
pub struct InMemoryConnection {
	backend: PostgresBackend,
	tables: Arc<RwLock<Tables>>,
	statements: Arc<RwLock<Vec<String>>>,
}

impl InMemoryConnection {
	/// Creates an empty in-memory database.
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds a table with rows, outside any transaction.
	pub fn seed_table(&self, table: &str, columns: &[&str], rows: Vec<Vec<SqlValue>>) {
		let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
		let mut tables = self.tables.write();
		let entry = tables.entry(table.to_string()).or_default();
		for values in rows {
			entry.push(Row::new(columns.clone(), values));
		}
	}

	/// All rows currently stored for a table.
	pub fn table_rows(&self, table: &str) -> Vec<Row> {
		self.tables.read().get(table).cloned().unwrap_or_default()
	}

	/// Raw statements executed so far, committed transactions included.
	pub fn executed_statements(&self) -> Vec<String> {
		self.statements.read().clone()
	}
}

#[async_trait]
impl TransactionExecutor for InMemoryConnection {
	async fn insert(&self, stmt: &InsertStatement) -> DbResult<u64> {
		apply_insert(&mut self.tables.write(), stmt)
	}

	async fn select(&self, query: &SelectQuery) -> DbResult<Vec<Row>> {
		evaluate(&self.tables.read(), query)
	}

	async fn execute_raw(&self, sql: &str) -> DbResult<u64> {
		self.statements.write().push(sql.to_string());
		Ok(0)
	}
}

#[async_trait]
impl DatabaseConnection for InMemoryConnection {
	async fn begin(&self) -> DbResult<Box<dyn Transaction>> {
		Ok(Box::new(InMemoryTransaction {
			target: Arc::clone(&self.tables),
			shared_statements: Arc::clone(&self.statements),
			working: RwLock::new(self.tables.read().clone()),
			statements: RwLock::new(Vec::new()),
		}))
	}

	fn backend(&self) -> &dyn DatabaseBackend {
		&self.backend
	}
}

/// Snapshot transaction over an [`InMemoryConnection`].
pub struct InMemoryTransaction {
	target: Arc<RwLock<Tables>>,
	shared_statements: Arc<RwLock<Vec<String>>>,
	working: RwLock<Tables>,
	statements: RwLock<Vec<String>>,
}

#[async_trait]
impl TransactionExecutor for InMemoryTransaction {
	async fn insert(&self, stmt: &InsertStatement) -> DbResult<u64> {
		apply_insert(&mut self.working.write(), stmt)
	}

	async fn select(&self, query: &SelectQuery) -> DbResult<Vec<Row>> {
		evaluate(&self.working.read(), query)
	}

	async fn execute_raw(&self, sql: &str) -> DbResult<u64> {
		self.statements.write().push(sql.to_string());
		Ok(0)
	}
}

#[async_trait]
impl Transaction for InMemoryTransaction {
	async fn commit(self: Box<Self>) -> DbResult<()> {
		let this = *self;
		*this.target.write() = this.working.into_inner();
		this.shared_statements
			.write()
			.extend(this.statements.into_inner());
		Ok(())
	}

	async fn rollback(self: Box<Self>) -> DbResult<()> {
		Ok(())
	}
}

fn apply_insert(tables: &mut Tables, stmt: &InsertStatement) -> DbResult<u64> {
	let columns: Vec<String> = stmt.columns.clone();
	let entry = tables.entry(stmt.table.clone()).or_default();
	for values in &stmt.rows {
		if values.len() != columns.len() {
			return Err(DbError::QueryBuild(format!(
				"insert row has {} values for {} columns",
				values.len(),
				columns.len()
			)));
		}
		entry.push(Row::new(columns.clone(), values.clone()));
	}
	Ok(stmt.rows.len() as u64)
}

fn evaluate(tables: &Tables, query: &SelectQuery) -> DbResult<Vec<Row>> {
	let source = tables.get(&query.table).cloned().unwrap_or_default();

	let mut rows = Vec::with_capacity(source.len());
	for row in source {
		let keep = match &query.condition {
			Some(condition) => matches_condition(&row, condition)?,
			None => true,
		};
		if keep {
			rows.push(row);
		}
	}

	if !query.order.is_empty() {
		rows.sort_by(|a, b| {
			for order in &query.order {
				let left = a.get(&order.field).cloned().unwrap_or(SqlValue::Null);
				let right = b.get(&order.field).cloned().unwrap_or(SqlValue::Null);
				let ordering = match order.direction {
					OrderDirection::Asc => left.compare(&right),
					OrderDirection::Desc => right.compare(&left),
				};
				if ordering != std::cmp::Ordering::Equal {
					return ordering;
				}
			}
			std::cmp::Ordering::Equal
		});
	}

	if !query.columns.is_empty() {
		rows = rows.iter().map(|row| row.project(&query.columns)).collect();
	}

	if query.distinct {
		let mut seen = HashSet::new();
		rows.retain(|row| {
			let key = row
				.values()
				.iter()
				.map(SqlValue::to_text)
				.collect::<Vec<_>>()
				.join("\u{1f}");
			seen.insert(key)
		});
	}

	let offset = query.offset.unwrap_or(0) as usize;
	let rows: Vec<Row> = match query.limit {
		Some(limit) => rows.into_iter().skip(offset).take(limit as usize).collect(),
		None => rows.into_iter().skip(offset).collect(),
	};

	Ok(rows)
}

fn matches_condition(row: &Row, condition: &FilterCondition) -> DbResult<bool> {
	match condition {
		FilterCondition::Single(filter) => matches_filter(row, filter),
		FilterCondition::And(parts) => {
			for part in parts {
				if !matches_condition(row, part)? {
					return Ok(false);
				}
			}
			Ok(true)
		}
		FilterCondition::Or(parts) => {
			for part in parts {
				if matches_condition(row, part)? {
					return Ok(true);
				}
			}
			Ok(false)
		}
		FilterCondition::Not(inner) => Ok(!matches_condition(row, inner)?),
	}
}

fn matches_filter(row: &Row, filter: &Filter) -> DbResult<bool> {
	let value = row
		.get(&filter.field)
		.ok_or_else(|| DbError::UnknownColumn(filter.field.clone()))?;

	Ok(match filter.operator {
		FilterOperator::Exact => match &filter.value {
			FilterValue::Null => value.is_null(),
			other => value.to_text() == filter_text(other),
		},
		FilterOperator::IExact => {
			value.to_text().to_lowercase() == filter_text(&filter.value).to_lowercase()
		}
		FilterOperator::Contains => value.to_text().contains(&filter_text(&filter.value)),
		FilterOperator::IContains | FilterOperator::Search => value
			.to_text()
			.to_lowercase()
			.contains(&filter_text(&filter.value).to_lowercase()),
		FilterOperator::IStartsWith => value
			.to_text()
			.to_lowercase()
			.starts_with(&filter_text(&filter.value).to_lowercase()),
		FilterOperator::In => match &filter.value {
			FilterValue::List(items) => items.iter().any(|item| *item == value.to_text()),
			other => value.to_text() == filter_text(other),
		},
		FilterOperator::Gt => compare(value, &filter.value) == std::cmp::Ordering::Greater,
		FilterOperator::Gte => compare(value, &filter.value) != std::cmp::Ordering::Less,
		FilterOperator::Lt => compare(value, &filter.value) == std::cmp::Ordering::Less,
		FilterOperator::Lte => compare(value, &filter.value) != std::cmp::Ordering::Greater,
		FilterOperator::IsNull => {
			if matches!(&filter.value, FilterValue::Boolean(false)) {
				!value.is_null()
			} else {
				value.is_null()
			}
		}
	})
}

fn filter_text(value: &FilterValue) -> String {
	match value {
		FilterValue::Text(s) => s.clone(),
		FilterValue::Integer(i) => i.to_string(),
		FilterValue::Float(f) => f.to_string(),
		FilterValue::Boolean(b) => b.to_string(),
		FilterValue::Null => String::new(),
		FilterValue::List(items) => items.join(","),
	}
}

fn compare(value: &SqlValue, filter_value: &FilterValue) -> std::cmp::Ordering {
	let rhs = match filter_value {
		FilterValue::Integer(i) => SqlValue::Integer(*i),
		FilterValue::Float(f) => SqlValue::Float(*f),
		FilterValue::Boolean(b) => SqlValue::Bool(*b),
		FilterValue::Null => SqlValue::Null,
		FilterValue::Text(s) => match s.parse::<f64>() {
			Ok(parsed) if value.as_str().is_none() => SqlValue::Float(parsed),
			_ => SqlValue::Text(s.clone()),
		},
		FilterValue::List(items) => SqlValue::Text(items.join(",")),
	};
	value.compare(&rhs)
}
