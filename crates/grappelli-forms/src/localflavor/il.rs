//! Israeli form fields.

use std::sync::LazyLock;

use regex::Regex;

use crate::field::{FieldError, FieldResult, FormField};

static POSTAL_CODE_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^\d{5}$").expect("POSTAL_CODE_REGEX: invalid regex pattern"));

// Up to eight digits of number plus the trailing check digit.
static ID_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(\d{1,8})(\d)$").expect("ID_NUMBER_REGEX: invalid regex pattern")
});

/// Validates Israeli postal codes: exactly five digits, with interior
/// spaces tolerated and stripped.
///
/// # Examples
///
/// ```
/// use grappelli_forms::FormField;
/// use grappelli_forms::localflavor::il::IlPostalCodeField;
///
/// let field = IlPostalCodeField::new();
/// assert_eq!(field.clean("69973").unwrap(), Some("69973".to_string()));
/// assert_eq!(field.clean("699 73").unwrap(), Some("69973".to_string()));
/// assert!(field.clean("699731").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct IlPostalCodeField {
	required: bool,
}

impl IlPostalCodeField {
	/// Creates an optional postal code field.
	pub fn new() -> Self {
		Self::default()
	}

	/// Marks the field as required.
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
}

impl FormField for IlPostalCodeField {
	fn is_required(&self) -> bool {
		self.required
	}

	fn clean(&self, value: &str) -> FieldResult<Option<String>> {
		let value = value.replace(' ', "");
		if self.clean_empty(&value)?.is_none() {
			return Ok(None);
		}
		if !POSTAL_CODE_REGEX.is_match(&value) {
			return Err(FieldError::Validation(
				"Enter a postal code in the format XXXXX".to_string(),
			));
		}
		Ok(Some(value))
	}
}

/// Validates Israeli identity numbers.
///
/// An ID number has up to eight digits followed by a check digit. The
/// check digit is verified with a luhn-style weighted checksum over the
/// number zero-padded to eight digits.
///
/// # Examples
///
/// ```
/// use grappelli_forms::FormField;
/// use grappelli_forms::localflavor::il::IlIdNumberField;
///
/// let field = IlIdNumberField::new();
/// assert_eq!(field.clean("39337423").unwrap(), Some("39337423".to_string()));
/// assert!(field.clean("39337424").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct IlIdNumberField {
	required: bool,
}

impl IlIdNumberField {
	/// Creates an optional ID number field.
	pub fn new() -> Self {
		Self::default()
	}

	/// Marks the field as required.
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
}

impl FormField for IlIdNumberField {
	fn is_required(&self) -> bool {
		self.required
	}

	fn clean(&self, value: &str) -> FieldResult<Option<String>> {
		if self.clean_empty(value)?.is_none() {
			return Ok(None);
		}
		// The raw value is matched as-is; surrounding whitespace is not
		// forgiven.
		let invalid = || FieldError::Validation("Enter a valid ID number.".to_string());

		let captures = ID_NUMBER_REGEX.captures(value).ok_or_else(invalid)?;
		let number = format!("{:0>8}", &captures[1]);
		let check = &captures[2];

		if !checksum_valid(&format!("{number}{check}")) {
			return Err(invalid());
		}
		Ok(Some(value.to_string()))
	}
}

/// Weighted checksum over the nine-digit form: weights alternate 1 and
/// 2, each product folds into its digit sum, and the total must be
/// divisible by ten.
fn checksum_valid(digits: &str) -> bool {
	let mut checksum = 0u32;
	let mut weight = 1u32;
	for ch in digits.chars() {
		let product = ch.to_digit(10).unwrap_or(0) * weight;
		checksum += product / 10 + product % 10;
		weight ^= 3;
	}
	checksum % 10 == 0
}
