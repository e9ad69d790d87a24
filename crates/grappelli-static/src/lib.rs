//! Static file serving for the Grappelli framework.
//!
//! [`StaticFileService`] maps request paths onto files below a document
//! root and answers with full [`http`] responses: guessed content type,
//! content length, last-modified, and a `Content-Encoding` for
//! compressed files served as-is. Conditional requests via
//! `If-Modified-Since` get `304 Not Modified` without a body.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod serve;

pub use error::{Result, StaticError};
pub use serve::StaticFileService;
