//! Fixture system: record shape, formats, discovery, and loading.

pub mod discovery;
pub mod format;
pub mod loader;
pub mod parser;
pub mod record;
pub mod registry;

pub use discovery::{FixtureDiscovery, FixtureFile, parse_label};
pub use format::{CompressionFormat, FixtureFormat};
pub use loader::{FixtureLoader, LoadResult};
pub use parser::FixtureParser;
pub use record::FixtureRecord;
pub use registry::{
	AllowAllRouter, FixtureRouter, ModelRegistry, ModelTarget, register_model,
};
