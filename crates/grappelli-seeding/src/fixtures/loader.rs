//! Transactional fixture loading.
//!
//! All fixtures named in one load share a single transaction: either
//! every record lands or none do. After loading, the auto-increment
//! sequence of every touched table is re-synchronized so later inserts
//! do not collide with explicitly loaded keys.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use grappelli_db::{DatabaseConnection, InsertStatement, Transaction};

use crate::error::{SeedingError, SeedingResult};
use crate::fixtures::discovery::{FixtureDiscovery, FixtureFile, parse_label};
use crate::fixtures::parser::FixtureParser;
use crate::fixtures::registry::{AllowAllRouter, FixtureRouter, ModelRegistry};

/// Statistics of a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
	/// Records written to the database.
	pub object_count: usize,
	/// Fixture files installed.
	pub fixture_count: usize,
}

impl LoadResult {
	/// The one-line summary a management command prints.
	pub fn summary(&self) -> String {
		format!(
			"Installed {} object(s) from {} fixture(s)",
			self.object_count, self.fixture_count
		)
	}
}

/// Loads fixtures into a database.
pub struct FixtureLoader {
	conn: Arc<dyn DatabaseConnection>,
	discovery: FixtureDiscovery,
	registry: ModelRegistry,
	router: Arc<dyn FixtureRouter>,
	database: Option<String>,
}

impl FixtureLoader {
	/// Creates a loader searching only the current directory.
	pub fn new(conn: Arc<dyn DatabaseConnection>) -> Self {
		Self {
			conn,
			discovery: FixtureDiscovery::new(),
			registry: ModelRegistry::new(),
			router: Arc::new(AllowAllRouter),
			database: None,
		}
	}

	/// Adds a fixture search directory.
	pub fn add_fixture_dir(&mut self, dir: impl Into<std::path::PathBuf>) -> SeedingResult<()> {
		self.discovery.add_dir(dir)
	}

	/// Targets a named database alias: discovery prefers alias-suffixed
	/// fixture files and the router sees the alias.
	pub fn with_database(mut self, database: impl Into<String>) -> Self {
		let database = database.into();
		self.discovery = self.discovery.clone().with_database(database.clone());
		self.database = Some(database);
		self
	}

	/// Replaces the default allow-all router.
	pub fn with_router(mut self, router: Arc<dyn FixtureRouter>) -> Self {
		self.router = router;
		self
	}

	/// Loads every fixture the labels name, in one transaction.
	pub async fn load(&self, labels: &[&str]) -> SeedingResult<LoadResult> {
		let mut files: Vec<(String, FixtureFile)> = Vec::new();
		for label in labels {
			let (name, _, _) = parse_label(label)?;
			for file in self.discovery.find(label)? {
				files.push((name.clone(), file));
			}
		}

		let tx = self.conn.begin().await?;
		match self.load_into(tx.as_ref(), &files).await {
			Ok((object_count, reset_tables)) => {
				if let Err(err) = self.reset_sequences(tx.as_ref(), reset_tables).await {
					tx.rollback().await.ok();
					return Err(err);
				}
				tx.commit().await?;
				let result = LoadResult {
					object_count,
					fixture_count: files.len(),
				};
				info!(
					objects = result.object_count,
					fixtures = result.fixture_count,
					"fixtures installed"
				);
				Ok(result)
			}
			Err(err) => {
				tx.rollback().await.ok();
				Err(err)
			}
		}
	}

	async fn load_into(
		&self,
		tx: &dyn Transaction,
		files: &[(String, FixtureFile)],
	) -> SeedingResult<(usize, BTreeSet<String>)> {
		let parser = FixtureParser::new();
		let mut object_count = 0;
		let mut reset_tables = BTreeSet::new();

		for (name, file) in files {
			debug!(path = %file.path.display(), "installing fixture");
			let records = parser.parse_file(&file.path, file.format, file.compression)?;
			if records.is_empty() {
				return Err(SeedingError::EmptyFixture(name.clone()));
			}

			for record in &records {
				if !self
					.router
					.allow_load(self.database.as_deref(), &record.model)
				{
					debug!(model = %record.model, "router skipped record");
					continue;
				}

				let target = self
					.registry
					.resolve(&record.model)
					.ok_or_else(|| SeedingError::ModelNotFound(record.model.clone()))?;

				// Every touched table with a sequence behind its key gets
				// re-synchronized after the load.
				if target.auto_pk {
					reset_tables.insert(target.table.clone());
				}

				let mut columns = Vec::new();
				let mut values = Vec::new();
				if let Some(pk) = record.pk_value() {
					columns.push(target.pk_column.clone());
					values.push(pk);
				}
				for (column, value) in record.field_values() {
					columns.push(column);
					values.push(value);
				}

				let stmt = InsertStatement::new(&target.table, columns).row(values);
				tx.insert(&stmt).await?;
				object_count += 1;
			}
		}

		Ok((object_count, reset_tables))
	}

	async fn reset_sequences(
		&self,
		tx: &dyn Transaction,
		tables: BTreeSet<String>,
	) -> SeedingResult<()> {
		if tables.is_empty() {
			return Ok(());
		}
		let tables: Vec<String> = tables.into_iter().collect();
		for sql in self.conn.backend().sequence_reset_sql(&tables) {
			tx.execute_raw(&sql).await?;
		}
		Ok(())
	}
}
