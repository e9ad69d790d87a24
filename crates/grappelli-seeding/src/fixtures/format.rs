//! Serialization and compression formats of fixture files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{SeedingError, SeedingResult};

/// Supported fixture serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FixtureFormat {
	/// JSON format (default).
	#[default]
	Json,

	/// YAML format (requires the `yaml` feature).
	#[cfg(feature = "yaml")]
	Yaml,
}

impl FixtureFormat {
	/// Every format this build understands, in candidate order.
	pub fn all() -> &'static [FixtureFormat] {
		&[
			FixtureFormat::Json,
			#[cfg(feature = "yaml")]
			FixtureFormat::Yaml,
		]
	}

	/// Resolves a file extension to a format.
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"json" => Some(Self::Json),
			#[cfg(feature = "yaml")]
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// The canonical file extension for this format.
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Json => "json",
			#[cfg(feature = "yaml")]
			Self::Yaml => "yaml",
		}
	}
}

impl std::fmt::Display for FixtureFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.extension())
	}
}

/// Compression wrappers a fixture file may carry as its outermost
/// extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CompressionFormat {
	/// Plain, uncompressed file.
	#[default]
	Plain,

	/// gzip (`.gz`).
	Gz,

	/// A zip archive holding the fixture as its single entry.
	Zip,

	/// bzip2 (`.bz2`, requires the `bz2` feature).
	#[cfg(feature = "bz2")]
	Bz2,
}

impl CompressionFormat {
	/// Every compression this build understands, plain first.
	pub fn all() -> &'static [CompressionFormat] {
		&[
			CompressionFormat::Plain,
			CompressionFormat::Gz,
			CompressionFormat::Zip,
			#[cfg(feature = "bz2")]
			CompressionFormat::Bz2,
		]
	}

	/// Resolves a file extension to a compression format. `Plain` has no
	/// extension and never matches here.
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"gz" => Some(Self::Gz),
			"zip" => Some(Self::Zip),
			#[cfg(feature = "bz2")]
			"bz2" => Some(Self::Bz2),
			_ => None,
		}
	}

	/// The file extension for this compression, empty for `Plain`.
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Plain => "",
			Self::Gz => "gz",
			Self::Zip => "zip",
			#[cfg(feature = "bz2")]
			Self::Bz2 => "bz2",
		}
	}

	/// Reads the whole decompressed content of a fixture file.
	pub fn read_file(&self, path: &Path) -> SeedingResult<String> {
		let file = File::open(path)?;
		let mut content = String::new();
		match self {
			Self::Plain => {
				let mut file = file;
				file.read_to_string(&mut content)?;
			}
			Self::Gz => {
				GzDecoder::new(file).read_to_string(&mut content)?;
			}
			Self::Zip => {
				let mut archive = zip::ZipArchive::new(file)
					.map_err(|e| SeedingError::Parse(format!("invalid zip archive: {e}")))?;
				// The fixture must be the archive's only entry.
				if archive.len() != 1 {
					return Err(SeedingError::Parse(format!(
						"zip archive {} must hold exactly one file, found {}",
						path.display(),
						archive.len()
					)));
				}
				archive
					.by_index(0)
					.map_err(|e| SeedingError::Parse(format!("invalid zip archive: {e}")))?
					.read_to_string(&mut content)?;
			}
			#[cfg(feature = "bz2")]
			Self::Bz2 => {
				bzip2::read::BzDecoder::new(file).read_to_string(&mut content)?;
			}
		}
		Ok(content)
	}
}
