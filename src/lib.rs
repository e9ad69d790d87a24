//! # Grappelli
//!
//! Admin querying, fixture loading, and framework glue for Rust web
//! applications.
//!
//! Grappelli does not ship its own ORM, template engine, or router; it is
//! the layer that sits on top of them. The workspace members cover:
//!
//! - [`db`] - the structured query and connection seam, backend row
//!   adaptation, and bulk insert
//! - [`admin`] - the [`ChangeList`](admin::ChangeList) request-to-query
//!   builder
//! - [`seeding`] - fixture discovery, parsing, and the `loaddata` command
//! - [`forms`] - form field validation and region-specific fields
//! - [`i18n`] - locale format data and number localization
//! - [`staticfiles`] - development static file serving
//!
//! ## Feature Flags
//!
//! - `yaml` - YAML fixture format support
//! - `bz2` - bzip2-compressed fixture support
//! - `full` (default) - everything above

pub use grappelli_admin as admin;
pub use grappelli_db as db;
pub use grappelli_forms as forms;
pub use grappelli_i18n as i18n;
pub use grappelli_seeding as seeding;
pub use grappelli_static as staticfiles;

/// Commonly used types, importable in one line.
pub mod prelude {
	pub use grappelli_admin::{ChangeList, ChangeListError};
	pub use grappelli_db::{
		DatabaseConnection, DbError, DbResult, Filter, FilterCondition, FilterOperator,
		FilterValue, Manager, Model, SelectQuery,
	};
	pub use grappelli_seeding::{FixtureLoader, LoadDataCommand, SeedingError, SeedingResult};
}
