//! Error types for the seeding module.

use thiserror::Error;

use grappelli_db::DbError;

/// Errors that can occur during fixture discovery and loading.
#[derive(Debug, Error)]
pub enum SeedingError {
	/// No file matched the fixture label in any search directory.
	#[error("No fixture named '{0}' found")]
	FixtureNotFound(String),

	/// More than one file matched the label inside a single directory.
	#[error("Multiple fixtures named '{name}' in {dir}. Aborting.")]
	MultipleFixtures {
		/// Fixture name from the label.
		name: String,
		/// Directory holding the ambiguous matches.
		dir: String,
	},

	/// The label carries an extension that is not a known serialization
	/// format.
	#[error("Problem installing fixture '{name}': {ext} is not a known serialization format")]
	UnknownSerializationFormat {
		/// Fixture name from the label.
		name: String,
		/// The unrecognized extension.
		ext: String,
	},

	/// A fixture file parsed successfully but contained no records.
	#[error("No fixture data found for '{0}'. (File format may be invalid.)")]
	EmptyFixture(String),

	/// A record names a model no loader is registered for.
	#[error("Model not found: {0}")]
	ModelNotFound(String),

	/// The same directory appears twice in the configured search path.
	#[error("Duplicate fixture directory: {0}")]
	DuplicateFixtureDir(String),

	/// Error parsing fixture data.
	#[error("Parse error: {0}")]
	Parse(String),

	/// JSON deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// YAML deserialization error (when the `yaml` feature is enabled).
	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	Yaml(#[from] serde_yaml::Error),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Database operation failed.
	#[error("Database error: {0}")]
	Db(#[from] DbError),
}

/// Result type alias for seeding operations.
pub type SeedingResult<T> = Result<T, SeedingError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_fixture_not_found_message() {
		let error = SeedingError::FixtureNotFound("initial_data".to_string());
		assert_eq!(error.to_string(), "No fixture named 'initial_data' found");
	}

	#[rstest]
	fn test_multiple_fixtures_message() {
		let error = SeedingError::MultipleFixtures {
			name: "users".to_string(),
			dir: "app/fixtures".to_string(),
		};
		assert_eq!(
			error.to_string(),
			"Multiple fixtures named 'users' in app/fixtures. Aborting."
		);
	}

	#[rstest]
	fn test_empty_fixture_message() {
		let error = SeedingError::EmptyFixture("users".to_string());
		assert_eq!(
			error.to_string(),
			"No fixture data found for 'users'. (File format may be invalid.)"
		);
	}

	#[rstest]
	fn test_io_error_from() {
		let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
		let seeding_error: SeedingError = io_error.into();
		assert!(matches!(seeding_error, SeedingError::Io(_)));
	}
}
