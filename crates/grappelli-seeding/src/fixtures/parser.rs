//! Deserializing fixture file content into records.

use std::path::Path;

use crate::error::SeedingResult;
use crate::fixtures::format::{CompressionFormat, FixtureFormat};
use crate::fixtures::record::FixtureRecord;

/// Turns fixture text into [`FixtureRecord`]s.
#[derive(Debug, Default)]
pub struct FixtureParser;

impl FixtureParser {
	/// Creates a parser.
	pub fn new() -> Self {
		Self
	}

	/// Parses fixture content already in memory.
	pub fn parse_str(
		&self,
		content: &str,
		format: FixtureFormat,
	) -> SeedingResult<Vec<FixtureRecord>> {
		match format {
			FixtureFormat::Json => Ok(serde_json::from_str(content)?),
			#[cfg(feature = "yaml")]
			FixtureFormat::Yaml => Ok(serde_yaml::from_str(content)?),
		}
	}

	/// Reads a fixture file through its compression wrapper and parses it.
	pub fn parse_file(
		&self,
		path: &Path,
		format: FixtureFormat,
		compression: CompressionFormat,
	) -> SeedingResult<Vec<FixtureRecord>> {
		let content = compression.read_file(path)?;
		self.parse_str(&content, format)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::SeedingError;
	use rstest::rstest;

	#[rstest]
	fn test_parse_json_records() {
		let content = r#"[
			{"model": "fixtures.Article", "pk": 1, "fields": {"headline": "Python program becomes self aware"}},
			{"model": "fixtures.Article", "fields": {"headline": "Poker has no place on ESPN"}}
		]"#;
		let records = FixtureParser::new()
			.parse_str(content, FixtureFormat::Json)
			.unwrap();
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].model, "fixtures.Article");
		assert_eq!(records[0].pk, Some(serde_json::json!(1)));
		assert!(records[1].pk.is_none());
	}

	#[rstest]
	fn test_parse_empty_document() {
		let records = FixtureParser::new()
			.parse_str("[]", FixtureFormat::Json)
			.unwrap();
		assert!(records.is_empty());
	}

	#[rstest]
	fn test_parse_malformed_json() {
		let result = FixtureParser::new().parse_str("[{", FixtureFormat::Json);
		assert!(matches!(result, Err(SeedingError::Json(_))));
	}

	#[cfg(feature = "yaml")]
	#[rstest]
	fn test_parse_yaml_records() {
		let content = "
- model: fixtures.Article
  pk: 1
  fields:
    headline: Python program becomes self aware
";
		let records = FixtureParser::new()
			.parse_str(content, FixtureFormat::Yaml)
			.unwrap();
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].model, "fixtures.Article");
	}

	#[rstest]
	fn test_parse_file_through_compression() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("articles.json");
		std::fs::write(
			&path,
			r#"[{"model": "fixtures.Article", "fields": {"headline": "x"}}]"#,
		)
		.unwrap();

		let records = FixtureParser::new()
			.parse_file(&path, FixtureFormat::Json, CompressionFormat::Plain)
			.unwrap();
		assert_eq!(records.len(), 1);
	}
}
