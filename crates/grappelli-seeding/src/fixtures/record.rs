//! The fixture record shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use grappelli_db::SqlValue;

/// A single model instance inside a fixture file.
///
/// # Example
///
/// ```json
/// {
///   "model": "auth.User",
///   "pk": 1,
///   "fields": {
///     "username": "admin",
///     "email": "admin@example.com"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixtureRecord {
	/// Model identifier in the form `app.Model`.
	pub model: String,

	/// Primary key value. Optional for auto-increment fields.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pk: Option<Value>,

	/// Field values as a JSON object.
	pub fields: Value,
}

impl FixtureRecord {
	/// Creates a new fixture record.
	pub fn new(model: impl Into<String>, fields: Value) -> Self {
		Self {
			model: model.into(),
			pk: None,
			fields,
		}
	}

	/// Creates a new fixture record with a primary key.
	pub fn with_pk(model: impl Into<String>, pk: Value, fields: Value) -> Self {
		Self {
			model: model.into(),
			pk: Some(pk),
			fields,
		}
	}

	/// The app label portion of the model identifier.
	pub fn app_label(&self) -> Option<&str> {
		self.model.split('.').next()
	}

	/// The model name portion of the model identifier.
	pub fn model_name(&self) -> Option<&str> {
		self.model.split('.').nth(1)
	}

	/// Field names and values as database-ready pairs.
	pub fn field_values(&self) -> Vec<(String, SqlValue)> {
		match &self.fields {
			Value::Object(map) => map
				.iter()
				.map(|(name, value)| (name.clone(), json_to_sql(value)))
				.collect(),
			_ => Vec::new(),
		}
	}

	/// The primary key as a database value, if the record carries one.
	pub fn pk_value(&self) -> Option<SqlValue> {
		self.pk.as_ref().map(json_to_sql)
	}
}

/// Maps a JSON scalar onto a database value. Arrays and objects are kept
/// as their JSON text, the way a serialized relation column stores them.
pub fn json_to_sql(value: &Value) -> SqlValue {
	match value {
		Value::Null => SqlValue::Null,
		Value::Bool(b) => SqlValue::Bool(*b),
		Value::Number(n) => match n.as_i64() {
			Some(i) => SqlValue::Integer(i),
			None => SqlValue::Float(n.as_f64().unwrap_or_default()),
		},
		Value::String(s) => SqlValue::Text(s.clone()),
		other => SqlValue::Text(other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_record_labels() {
		let record = FixtureRecord::new("auth.User", json!({}));
		assert_eq!(record.app_label(), Some("auth"));
		assert_eq!(record.model_name(), Some("User"));
	}

	#[rstest]
	fn test_field_values() {
		let record = FixtureRecord::with_pk(
			"fixtures.Article",
			json!(1),
			json!({"headline": "Poker has no place on ESPN", "pub_date": "2006-06-16"}),
		);
		let fields = record.field_values();
		assert_eq!(fields[0].0, "headline");
		assert_eq!(fields[1].0, "pub_date");
		assert_eq!(record.pk_value(), Some(SqlValue::Integer(1)));
	}

	#[rstest]
	#[case(json!(null), SqlValue::Null)]
	#[case(json!(true), SqlValue::Bool(true))]
	#[case(json!(42), SqlValue::Integer(42))]
	#[case(json!(2.5), SqlValue::Float(2.5))]
	#[case(json!("x"), SqlValue::Text("x".into()))]
	fn test_json_to_sql(#[case] input: serde_json::Value, #[case] expected: SqlValue) {
		assert_eq!(json_to_sql(&input), expected);
	}

	#[rstest]
	fn test_record_serialization_round_trip() {
		let record = FixtureRecord::with_pk("auth.User", json!(1), json!({"username": "admin"}));
		let text = serde_json::to_string(&record).unwrap();
		let parsed: FixtureRecord = serde_json::from_str(&text).unwrap();
		assert_eq!(record, parsed);
	}
}
