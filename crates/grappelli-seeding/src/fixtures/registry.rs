//! Model registry for fixture loading.
//!
//! Fixture records name models as `app.Model`; the registry maps those
//! identifiers onto the table and primary key column the loader writes
//! to.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Where a fixture model's rows land in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTarget {
	/// Table name.
	pub table: String,
	/// Primary key column, written when a record carries an explicit pk.
	pub pk_column: String,
	/// Whether the primary key is backed by an auto-increment sequence
	/// that needs re-synchronizing after explicit pk inserts.
	pub auto_pk: bool,
}

impl ModelTarget {
	/// Creates a target with an auto-increment `id` primary key.
	pub fn new(table: impl Into<String>) -> Self {
		Self {
			table: table.into(),
			pk_column: "id".to_string(),
			auto_pk: true,
		}
	}

	/// Overrides the primary key column.
	pub fn pk_column(mut self, column: impl Into<String>) -> Self {
		self.pk_column = column.into();
		self
	}

	/// Marks the primary key as natural, with no sequence behind it.
	pub fn natural_pk(mut self) -> Self {
		self.auto_pk = false;
		self
	}
}

static MODEL_REGISTRY: Lazy<RwLock<HashMap<String, Arc<ModelTarget>>>> =
	Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers a model target in the global registry, replacing any
/// earlier registration for the same identifier.
pub fn register_model(model_id: impl Into<String>, target: ModelTarget) {
	MODEL_REGISTRY
		.write()
		.insert(model_id.into(), Arc::new(target));
}

/// Read access to the registered model targets.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelRegistry;

impl ModelRegistry {
	/// Creates a registry handle.
	pub fn new() -> Self {
		Self
	}

	/// Resolves a model identifier to its target, if registered.
	pub fn resolve(&self, model_id: &str) -> Option<Arc<ModelTarget>> {
		MODEL_REGISTRY.read().get(model_id).cloned()
	}

	/// Whether a model identifier is registered.
	pub fn has_model(&self, model_id: &str) -> bool {
		MODEL_REGISTRY.read().contains_key(model_id)
	}

	/// All registered identifiers.
	pub fn model_ids(&self) -> Vec<String> {
		MODEL_REGISTRY.read().keys().cloned().collect()
	}

	/// Removes every registration. Primarily useful in tests.
	pub fn clear(&self) {
		MODEL_REGISTRY.write().clear();
	}
}

/// Decides which models a given database accepts fixtures for.
///
/// The default router allows everything; applications partitioning
/// models across databases implement this to keep fixture rows out of
/// databases that do not hold the model's table.
pub trait FixtureRouter: Send + Sync {
	/// Whether `model_id` may be loaded into the database named by
	/// `database` (`None` is the default database).
	fn allow_load(&self, database: Option<&str>, model_id: &str) -> bool;
}

/// Router that accepts every model on every database.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAllRouter;

impl FixtureRouter for AllowAllRouter {
	fn allow_load(&self, _database: Option<&str>, _model_id: &str) -> bool {
		true
	}
}
