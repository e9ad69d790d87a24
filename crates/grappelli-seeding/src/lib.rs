//! Fixture discovery and loading for the Grappelli framework.
//!
//! Fixtures are files of serialized model records installed into the
//! database as a unit:
//!
//! ```json
//! [
//!   {
//!     "model": "fixtures.Article",
//!     "pk": 2,
//!     "fields": {
//!       "headline": "Poker has no place on ESPN",
//!       "pub_date": "2006-06-16T12:00:00"
//!     }
//!   }
//! ]
//! ```
//!
//! A fixture is named by a label rather than a path: `articles` finds
//! `articles.json`, `articles.yaml.gz`, or a database-specific
//! `articles.secondary.json` across the configured search directories.
//! Loading is all-or-nothing: every record of every named fixture lands
//! in one transaction, and a failure anywhere rolls the whole load back.
//!
//! # Features
//!
//! - `json` - JSON fixture format support (enabled by default)
//! - `yaml` - YAML fixture format support
//! - `bz2` - bzip2-compressed fixture support
//! - `full` - All features enabled
//!
//! # Quick Start
//!
//! ```ignore
//! use grappelli_seeding::fixtures::{FixtureLoader, ModelTarget, register_model};
//!
//! register_model("fixtures.Article", ModelTarget::new("article"));
//!
//! let mut loader = FixtureLoader::new(conn);
//! loader.add_fixture_dir("app/fixtures")?;
//! let result = loader.load(&["articles"]).await?;
//! println!("{}", result.summary());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod commands;
pub mod error;
pub mod fixtures;

pub use commands::{LoadDataCommand, LoadDataOptions};
pub use error::{SeedingError, SeedingResult};
pub use fixtures::{
	CompressionFormat, FixtureDiscovery, FixtureFormat, FixtureLoader, FixtureParser,
	FixtureRecord, LoadResult, ModelRegistry, ModelTarget, register_model,
};
