//! Error types for static file serving.

use thiserror::Error;

/// Errors raised while serving a static file.
#[derive(Debug, Error)]
pub enum StaticError {
	/// The requested path does not resolve to a servable file. Covers
	/// missing files, directories, and path components that try to
	/// escape the document root.
	#[error("'{0}' does not exist")]
	NotFound(String),

	/// I/O failure reading an existing file.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result type alias for static serving.
pub type Result<T> = std::result::Result<T, StaticError>;
