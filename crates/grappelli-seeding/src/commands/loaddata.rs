//! loaddata command implementation.
//!
//! Installs named fixtures into the database, the management-command
//! face of [`FixtureLoader`].

use std::path::PathBuf;
use std::sync::Arc;

use grappelli_db::DatabaseConnection;

use crate::error::SeedingResult;
use crate::fixtures::{FixtureLoader, FixtureRouter, LoadResult};

/// Options for the loaddata command.
#[derive(Debug, Clone, Default)]
pub struct LoadDataOptions {
	/// Extra fixture search directories, tried before the current
	/// directory.
	pub fixture_dirs: Vec<PathBuf>,

	/// Database alias to load fixtures into.
	pub database: Option<String>,

	/// Verbosity level (0 = silent, 1 = summary).
	pub verbosity: u8,
}

impl LoadDataOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds fixture search directories.
	pub fn with_fixture_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
		self.fixture_dirs = dirs;
		self
	}

	/// Sets the database alias.
	pub fn with_database(mut self, database: impl Into<String>) -> Self {
		self.database = Some(database.into());
		self
	}

	/// Sets the verbosity level.
	pub fn with_verbosity(mut self, level: u8) -> Self {
		self.verbosity = level;
		self
	}
}

/// The loaddata management command.
///
/// # Example
///
/// ```ignore
/// let cmd = LoadDataCommand::new(conn);
/// let options = LoadDataOptions::new().with_verbosity(1);
/// let result = cmd.execute(&["initial_data"], options).await?;
/// ```
pub struct LoadDataCommand {
	conn: Arc<dyn DatabaseConnection>,
	router: Option<Arc<dyn FixtureRouter>>,
}

impl LoadDataCommand {
	/// Creates a loaddata command against a connection.
	pub fn new(conn: Arc<dyn DatabaseConnection>) -> Self {
		Self { conn, router: None }
	}

	/// Installs a router consulted for every record.
	pub fn with_router(mut self, router: Arc<dyn FixtureRouter>) -> Self {
		self.router = Some(router);
		self
	}

	/// The command name.
	pub fn name(&self) -> &str {
		"loaddata"
	}

	/// The command description.
	pub fn description(&self) -> &str {
		"Installs the named fixture(s) in the database"
	}

	/// The command help text.
	pub fn help(&self) -> &str {
		r#"
Usage: loaddata [options] fixture [fixture ...]

Installs the named fixture(s) in the database.

Arguments:
  fixture              One or more fixture labels to load

Options:
  --database DB        Database alias to load fixtures into
  --verbosity LEVEL    Verbosity level (0=silent, 1=summary)
"#
	}

	/// Executes the command for the given fixture labels.
	pub async fn execute(
		&self,
		labels: &[&str],
		options: LoadDataOptions,
	) -> SeedingResult<LoadResult> {
		let mut loader = FixtureLoader::new(Arc::clone(&self.conn));
		for dir in &options.fixture_dirs {
			loader.add_fixture_dir(dir.clone())?;
		}
		if let Some(database) = &options.database {
			loader = loader.with_database(database.clone());
		}
		if let Some(router) = &self.router {
			loader = loader.with_router(Arc::clone(router));
		}

		let result = loader.load(labels).await?;
		if options.verbosity > 0 {
			println!("{}", result.summary());
		}
		Ok(result)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	use grappelli_db::testing::InMemoryConnection;

	#[rstest]
	fn test_command_metadata() {
		let cmd = LoadDataCommand::new(Arc::new(InMemoryConnection::new()));
		assert_eq!(cmd.name(), "loaddata");
		assert!(!cmd.description().is_empty());
		assert!(!cmd.help().is_empty());
	}

	#[rstest]
	fn test_options_builder() {
		let options = LoadDataOptions::new()
			.with_fixture_dirs(vec![PathBuf::from("app/fixtures")])
			.with_database("secondary")
			.with_verbosity(1);

		assert_eq!(options.fixture_dirs, vec![PathBuf::from("app/fixtures")]);
		assert_eq!(options.database, Some("secondary".to_string()));
		assert_eq!(options.verbosity, 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_execute_unknown_label() {
		let cmd = LoadDataCommand::new(Arc::new(InMemoryConnection::new()));
		let result = cmd.execute(&["does_not_exist"], LoadDataOptions::new()).await;
		assert!(result.is_err());
	}
}
