//! Per-backend behavior: row post-processing and sequence resets.
//!
//! Result rows come back from drivers in the backend's native shape.
//! MySQL has no boolean column type and returns 0/1 integers for boolean
//! fields, so its adapter coerces those back to booleans based on the
//! declared column types. PostgreSQL rows pass through untouched, but it
//! is the backend that knows how to re-synchronize sequences after rows
//! with explicit primary keys were inserted.

use crate::connection::{Row, SqlValue};
use crate::sql::SqlDialect;

/// Declared type of a result column, as far as row adaptation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
	/// Boolean field.
	Boolean,
	/// Nullable boolean field.
	NullBoolean,
	/// Integer field.
	Integer,
	/// Floating point field.
	Float,
	/// Text field.
	Text,
	/// Date or datetime field.
	DateTime,
}

impl ColumnType {
	fn is_boolean(self) -> bool {
		matches!(self, ColumnType::Boolean | ColumnType::NullBoolean)
	}
}

/// Backend-specific behavior behind a [`DatabaseConnection`].
///
/// [`DatabaseConnection`]: crate::connection::DatabaseConnection
pub trait DatabaseBackend: Send + Sync {
	/// Backend name, e.g. `"postgresql"`.
	fn name(&self) -> &'static str;

	/// SQL dialect used when rendering structured statements.
	fn dialect(&self) -> SqlDialect;

	/// Post-processes one result row. `column_types` holds the declared
	/// types of the projected columns, in projection order; columns
	/// beyond its length pass through unchanged.
	fn resolve_row(&self, row: Row, column_types: &[ColumnType]) -> Row {
		let _ = column_types;
		row
	}

	/// Statements that re-synchronize auto-increment counters for the
	/// given tables after manual primary key inserts.
	fn sequence_reset_sql(&self, tables: &[String]) -> Vec<String> {
		let _ = tables;
		Vec::new()
	}
}

/// PostgreSQL backend behavior.
#[derive(Debug, Default)]
pub struct PostgresBackend;

impl DatabaseBackend for PostgresBackend {
	fn name(&self) -> &'static str {
		"postgresql"
	}

	fn dialect(&self) -> SqlDialect {
		SqlDialect::Postgres
	}

	fn sequence_reset_sql(&self, tables: &[String]) -> Vec<String> {
		tables
			.iter()
			.map(|table| {
				format!(
					"SELECT setval(pg_get_serial_sequence('\"{table}\"', 'id'), \
					 coalesce(max(\"id\"), 1), max(\"id\") IS NOT NULL) FROM \"{table}\";"
				)
			})
			.collect()
	}
}

/// MySQL backend behavior.
#[derive(Debug, Default)]
pub struct MysqlBackend;

impl DatabaseBackend for MysqlBackend {
	fn name(&self) -> &'static str {
		"mysql"
	}

	fn dialect(&self) -> SqlDialect {
		SqlDialect::Mysql
	}

	// MySQL reports boolean columns as TINYINT; 0/1 values for
	// boolean-typed columns become real booleans here.
	fn resolve_row(&self, row: Row, column_types: &[ColumnType]) -> Row {
		let (columns, values) = row.into_parts();
		let values = values
			.into_iter()
			.enumerate()
			.map(|(idx, value)| match (column_types.get(idx), &value) {
				(Some(ty), SqlValue::Integer(i @ (0 | 1))) if ty.is_boolean() => {
					SqlValue::Bool(*i == 1)
				}
				_ => value,
			})
			.collect();
		Row::new(columns, values)
	}

	// MySQL AUTO_INCREMENT advances past explicit inserts on its own.
}
