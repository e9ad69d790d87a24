//! Error types for the database seam.

use thiserror::Error;

/// Errors surfaced by the query seam.
#[derive(Debug, Error)]
pub enum DbError {
	/// A value passed to an operation was rejected before reaching the
	/// database, e.g. bulk-creating a multi-table inherited model.
	#[error("value error: {0}")]
	Value(String),

	/// The underlying database driver reported a failure.
	#[error("database error: {0}")]
	Database(String),

	/// Beginning, committing, or rolling back a transaction failed.
	#[error("transaction error: {0}")]
	Transaction(String),

	/// A structured query could not be rendered to SQL.
	#[error("query build error: {0}")]
	QueryBuild(String),

	/// A filter or ordering referenced a column the result set does not
	/// carry.
	#[error("unknown column: {0}")]
	UnknownColumn(String),
}

/// Result type alias for database seam operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let error = DbError::Value("bad pk".to_string());
		assert_eq!(error.to_string(), "value error: bad pk");

		let error = DbError::UnknownColumn("nme".to_string());
		assert_eq!(error.to_string(), "unknown column: nme");
	}
}
