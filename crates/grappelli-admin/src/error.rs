//! Error types for the admin change list.

use grappelli_db::DbError;
use thiserror::Error;

/// Errors raised while building or running a change list query.
#[derive(Debug, Error)]
pub enum ChangeListError {
	/// A request filter parameter could not be turned into a valid
	/// query restriction. Deliberately carries no detail: the parameters
	/// come straight from the request and anything in them is suspect.
	#[error("incorrect lookup parameters")]
	IncorrectLookupParameters,

	/// A database failure outside the request-controlled filter path.
	#[error(transparent)]
	Db(#[from] DbError),
}

/// Result type alias for change list operations.
pub type ChangeListResult<T> = Result<T, ChangeListError>;
