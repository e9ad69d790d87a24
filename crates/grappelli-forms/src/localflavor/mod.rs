//! Country-specific form fields.

pub mod il;
