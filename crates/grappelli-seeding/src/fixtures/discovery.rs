//! Fixture discovery: from a fixture label to concrete files on disk.
//!
//! A label names a fixture without tying it to one file: `users` may
//! resolve to `users.json`, `users.yaml.gz`, or a database-specific
//! `users.secondary.json`, whichever exists in the search directories.
//! A label may also pin any of those parts explicitly
//! (`users.secondary.json.gz`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{SeedingError, SeedingResult};
use crate::fixtures::format::{CompressionFormat, FixtureFormat};

/// One resolved fixture file with the formats its name declares.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureFile {
	/// Location on disk.
	pub path: PathBuf,
	/// Serialization format.
	pub format: FixtureFormat,
	/// Compression wrapper.
	pub compression: CompressionFormat,
}

/// Splits a fixture label into its name and the optional serialization
/// and compression formats it pins.
///
/// The compression extension is stripped first, then the serialization
/// extension. A remaining dotted suffix that is not a known
/// serialization format is an error rather than part of the name.
pub fn parse_label(
	label: &str,
) -> SeedingResult<(String, Option<FixtureFormat>, Option<CompressionFormat>)> {
	// Only the final path component carries extensions; a dot in a
	// leading directory name is not one.
	let split_at = label
		.rfind(std::path::MAIN_SEPARATOR)
		.map(|i| i + 1)
		.unwrap_or(0);
	let (prefix, base) = label.split_at(split_at);

	let (rest, compression) = match base.rsplit_once('.') {
		Some((stem, ext)) if !stem.is_empty() => match CompressionFormat::from_extension(ext) {
			Some(cmp) => (stem, Some(cmp)),
			None => (base, None),
		},
		_ => (base, None),
	};

	let (name, format) = match rest.rsplit_once('.') {
		Some((stem, ext)) if !stem.is_empty() => match FixtureFormat::from_extension(ext) {
			Some(fmt) => (stem, Some(fmt)),
			None => {
				return Err(SeedingError::UnknownSerializationFormat {
					name: stem.to_string(),
					ext: ext.to_string(),
				});
			}
		},
		_ => (rest, None),
	};

	Ok((format!("{prefix}{name}"), format, compression))
}

/// Locates fixture files for labels across a set of search directories.
#[derive(Debug, Clone)]
pub struct FixtureDiscovery {
	dirs: Vec<PathBuf>,
	database: Option<String>,
}

impl Default for FixtureDiscovery {
	fn default() -> Self {
		Self::new()
	}
}

impl FixtureDiscovery {
	/// Creates a discovery searching only the current directory.
	pub fn new() -> Self {
		Self {
			dirs: vec![PathBuf::from(".")],
			database: None,
		}
	}

	/// Adds a search directory ahead of the current directory. The same
	/// directory may only be added once.
	pub fn add_dir(&mut self, dir: impl Into<PathBuf>) -> SeedingResult<()> {
		let dir = dir.into();
		if self.dirs.contains(&dir) {
			return Err(SeedingError::DuplicateFixtureDir(
				dir.display().to_string(),
			));
		}
		self.dirs.insert(self.dirs.len() - 1, dir);
		Ok(())
	}

	/// Prefers fixtures suffixed with this database alias.
	pub fn with_database(mut self, database: impl Into<String>) -> Self {
		self.database = Some(database.into());
		self
	}

	/// The search directories, in order.
	pub fn dirs(&self) -> &[PathBuf] {
		&self.dirs
	}

	/// Resolves a label to its files, one per search directory at most.
	///
	/// More than one candidate matching inside a single directory is
	/// ambiguous and aborts; a label matching nothing anywhere is an
	/// error as well.
	pub fn find(&self, label: &str) -> SeedingResult<Vec<FixtureFile>> {
		let (mut name, format, compression) = parse_label(label)?;

		let mut dirs: Vec<PathBuf> = self.dirs.clone();
		let name_path = PathBuf::from(&name);
		if name_path.is_absolute() {
			// An absolute label bypasses the search path entirely.
			dirs = vec![
				name_path
					.parent()
					.map(Path::to_path_buf)
					.unwrap_or_default(),
			];
			name = file_name_of(&name_path);
		} else if name_path.components().count() > 1 {
			// Relative subpaths anchor below each search directory.
			let sub = name_path.parent().map(Path::to_path_buf).unwrap_or_default();
			dirs = dirs.iter().map(|dir| dir.join(&sub)).collect();
			name = file_name_of(&name_path);
		}

		let targets = self.candidate_names(&name, format, compression);
		debug!(label, candidates = targets.len(), "searching for fixture");

		let mut found = Vec::new();
		for dir in &dirs {
			let Ok(entries) = std::fs::read_dir(dir) else {
				continue;
			};
			let mut in_dir = Vec::new();
			for entry in entries.flatten() {
				let file_name = entry.file_name();
				let Some(file_name) = file_name.to_str() else {
					continue;
				};
				if let Some((fmt, cmp)) = targets.get(file_name) {
					in_dir.push(FixtureFile {
						path: entry.path(),
						format: *fmt,
						compression: *cmp,
					});
				}
			}
			if in_dir.len() > 1 {
				return Err(SeedingError::MultipleFixtures {
					name: name.clone(),
					dir: dir.display().to_string(),
				});
			}
			found.extend(in_dir);
		}

		if found.is_empty() {
			return Err(SeedingError::FixtureNotFound(name));
		}
		found.sort_by(|a, b| a.path.cmp(&b.path));
		Ok(found)
	}

	/// Every file name the label could legally resolve to, with the
	/// formats each one implies. The candidate set is the product of the
	/// database alias (and its absence), the serialization formats, and
	/// the compression formats not pinned by the label.
	fn candidate_names(
		&self,
		name: &str,
		format: Option<FixtureFormat>,
		compression: Option<CompressionFormat>,
	) -> HashMap<String, (FixtureFormat, CompressionFormat)> {
		let databases: Vec<Option<&str>> = match self.database.as_deref() {
			Some(db) => vec![Some(db), None],
			None => vec![None],
		};
		let formats: Vec<FixtureFormat> = match format {
			Some(fmt) => vec![fmt],
			None => FixtureFormat::all().to_vec(),
		};
		let compressions: Vec<CompressionFormat> = match compression {
			Some(cmp) => vec![cmp],
			None => CompressionFormat::all().to_vec(),
		};

		let mut targets = HashMap::new();
		for db in &databases {
			for fmt in &formats {
				for cmp in &compressions {
					let mut candidate = name.to_string();
					if let Some(db) = db {
						candidate.push('.');
						candidate.push_str(db);
					}
					candidate.push('.');
					candidate.push_str(fmt.extension());
					if *cmp != CompressionFormat::Plain {
						candidate.push('.');
						candidate.push_str(cmp.extension());
					}
					targets.insert(candidate, (*fmt, *cmp));
				}
			}
		}
		targets
	}
}

fn file_name_of(path: &Path) -> String {
	path.file_name()
		.and_then(|n| n.to_str())
		.unwrap_or_default()
		.to_string()
}
