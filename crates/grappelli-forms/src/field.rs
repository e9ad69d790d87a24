//! Core form field types.

use thiserror::Error;

/// Errors raised while cleaning a form field value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
	/// The value failed validation.
	#[error("{0}")]
	Validation(String),

	/// A required field received no value.
	#[error("This field is required.")]
	Required,
}

/// Result type alias for field validation.
pub type FieldResult<T> = Result<T, FieldError>;

/// A form field that cleans raw input into a normalized value.
///
/// `clean` returns `Ok(None)` when an optional field receives an empty
/// value; a required field turns the same input into
/// [`FieldError::Required`].
pub trait FormField {
	/// Whether the field must receive a non-empty value.
	fn is_required(&self) -> bool;

	/// Validates and normalizes one raw input value.
	fn clean(&self, value: &str) -> FieldResult<Option<String>>;

	/// Shared empty-value handling: `Ok(Some(()))` means the caller has
	/// a non-empty value to validate.
	fn clean_empty(&self, value: &str) -> FieldResult<Option<()>> {
		if value.trim().is_empty() {
			if self.is_required() {
				return Err(FieldError::Required);
			}
			return Ok(None);
		}
		Ok(Some(()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Plain {
		required: bool,
	}

	impl FormField for Plain {
		fn is_required(&self) -> bool {
			self.required
		}

		fn clean(&self, value: &str) -> FieldResult<Option<String>> {
			match self.clean_empty(value)? {
				None => Ok(None),
				Some(()) => Ok(Some(value.trim().to_string())),
			}
		}
	}

	#[test]
	fn test_optional_field_accepts_empty() {
		let field = Plain { required: false };
		assert_eq!(field.clean(""), Ok(None));
		assert_eq!(field.clean("  "), Ok(None));
	}

	#[test]
	fn test_required_field_rejects_empty() {
		let field = Plain { required: true };
		assert_eq!(field.clean(""), Err(FieldError::Required));
		assert_eq!(field.clean("x"), Ok(Some("x".to_string())));
	}
}
