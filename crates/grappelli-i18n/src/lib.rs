//! Localization support for the Grappelli framework.
//!
//! The [`formats`] module holds per-locale formatting conventions:
//! date and time format strings in the template date syntax, and the
//! separators used when localizing numbers. Conventions resolve through
//! a registry with language fallback, so `uk-UA` finds the `uk` entry.

pub mod formats;

pub use formats::{LocaleFormats, format_with, register_locale_formats};
