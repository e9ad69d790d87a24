//! Form field validation for the Grappelli framework.
//!
//! [`FormField`] is the cleaning seam: raw request input goes in, a
//! normalized value or a [`FieldError`] comes out. The
//! [`localflavor`] module holds fields that validate country-specific
//! formats.

pub mod field;
pub mod localflavor;

pub use field::{FieldError, FieldResult, FormField};
