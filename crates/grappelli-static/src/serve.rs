//! Serving files below a document root.

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use http::{Response, StatusCode, header};
use tracing::debug;

use crate::error::{Result, StaticError};

/// Serves files below a single document root.
///
/// Request paths are sanitized before hitting the filesystem: empty
/// components and `.` are dropped, and any component that would walk
/// upward makes the whole path unresolvable.
#[derive(Debug, Clone)]
pub struct StaticFileService {
	root: PathBuf,
}

impl StaticFileService {
	/// Creates a service serving files below `root`.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// The document root.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Serves one request path.
	///
	/// `if_modified_since` is the raw request header, if present; a file
	/// unchanged since then yields `304 Not Modified` with an empty
	/// body. An unparseable header is ignored and the full file is
	/// served.
	pub async fn serve(
		&self,
		path: &str,
		if_modified_since: Option<&str>,
	) -> Result<Response<Bytes>> {
		let relative = sanitize_path(path).ok_or_else(|| StaticError::NotFound(path.to_string()))?;
		let full_path = self.root.join(&relative);

		let metadata = tokio::fs::metadata(&full_path)
			.await
			.map_err(|_| StaticError::NotFound(path.to_string()))?;
		if !metadata.is_file() {
			return Err(StaticError::NotFound(path.to_string()));
		}

		let mtime = metadata.modified()?;
		if !was_modified_since(if_modified_since, mtime, metadata.len()) {
			debug!(path, "not modified");
			return not_modified();
		}

		let (mime_type, encoding) = guess_content(&full_path);
		let body = Bytes::from(tokio::fs::read(&full_path).await?);

		let mut builder = Response::builder()
			.status(StatusCode::OK)
			.header(header::CONTENT_TYPE, mime_type)
			.header(header::CONTENT_LENGTH, body.len())
			.header(header::LAST_MODIFIED, httpdate::fmt_http_date(mtime));
		if let Some(encoding) = encoding {
			builder = builder.header(header::CONTENT_ENCODING, encoding);
		}

		builder
			.body(body)
			.map_err(|e| StaticError::Io(std::io::Error::other(e)))
	}
}

fn not_modified() -> Result<Response<Bytes>> {
	Response::builder()
		.status(StatusCode::NOT_MODIFIED)
		.body(Bytes::new())
		.map_err(|e| StaticError::Io(std::io::Error::other(e)))
}

/// Normalizes a request path to a safe relative path, or `None` when a
/// component would escape the root.
fn sanitize_path(path: &str) -> Option<PathBuf> {
	let mut clean = PathBuf::new();
	for part in path.split('/') {
		if part.is_empty() || part == "." {
			continue;
		}
		// A lone request component must stay a single normal component
		// after OS path interpretation.
		match Path::new(part).components().next() {
			Some(Component::Normal(c)) if c == part => clean.push(part),
			_ => return None,
		}
	}
	Some(clean)
}

/// Guesses the content type and transfer encoding of a file. A
/// compression extension becomes the Content-Encoding, and the type
/// comes from the name underneath it.
fn guess_content(path: &Path) -> (String, Option<&'static str>) {
	let encoding = path
		.extension()
		.and_then(|ext| ext.to_str())
		.and_then(|ext| match ext {
			"gz" => Some("gzip"),
			"br" => Some("br"),
			"bz2" => Some("bzip2"),
			_ => None,
		});

	let type_path = if encoding.is_some() {
		path.with_extension("")
	} else {
		path.to_path_buf()
	};
	let mime_type = mime_guess::from_path(&type_path)
		.first_or_octet_stream()
		.to_string();
	(mime_type, encoding)
}

/// Whether the resource changed relative to an `If-Modified-Since`
/// header. A missing or malformed header counts as modified.
fn was_modified_since(header: Option<&str>, mtime: SystemTime, size: u64) -> bool {
	let Some(header) = header else {
		return true;
	};

	// The header may carry an old-style "; length=N" suffix.
	let (date_part, length_part) = match header.split_once(';') {
		Some((date, rest)) => (date.trim(), Some(rest.trim())),
		None => (header.trim(), None),
	};

	let Ok(header_mtime) = httpdate::parse_http_date(date_part) else {
		return true;
	};
	if let Some(length_part) = length_part {
		let Some(length) = length_part
			.strip_prefix("length=")
			.and_then(|v| v.parse::<u64>().ok())
		else {
			return true;
		};
		if length != size {
			return true;
		}
	}

	mtime > header_mtime
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[test]
	fn test_sanitize_drops_empty_and_dot_components() {
		assert_eq!(
			sanitize_path("a//b/./c.txt"),
			Some(PathBuf::from("a/b/c.txt"))
		);
		assert_eq!(sanitize_path("file.txt"), Some(PathBuf::from("file.txt")));
	}

	#[test]
	fn test_sanitize_rejects_traversal() {
		assert_eq!(sanitize_path("../secret"), None);
		assert_eq!(sanitize_path("a/../../b"), None);
	}

	#[test]
	fn test_guess_content_plain() {
		let (mime, encoding) = guess_content(Path::new("file.txt"));
		assert_eq!(mime, "text/plain");
		assert_eq!(encoding, None);
	}

	#[test]
	fn test_guess_content_compressed() {
		let (mime, encoding) = guess_content(Path::new("file.txt.gz"));
		assert_eq!(mime, "text/plain");
		assert_eq!(encoding, Some("gzip"));
	}

	#[test]
	fn test_guess_content_unknown_type() {
		let (mime, _) = guess_content(Path::new("file.unknown"));
		assert_eq!(mime, "application/octet-stream");
	}

	#[test]
	fn test_was_modified_since_edge_cases() {
		let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
		// No header: modified.
		assert!(was_modified_since(None, mtime, 10));
		// Garbage header: modified.
		assert!(was_modified_since(
			Some("Mon, 28 May 999999999999 28:25:26 GMT"),
			mtime,
			10
		));
		// Header after mtime: not modified.
		assert!(!was_modified_since(
			Some("Mon, 18 Jan 2038 05:14:07 GMT"),
			mtime,
			10
		));
		// Header before mtime: modified.
		assert!(was_modified_since(
			Some("Thu, 01 Jan 1970 00:00:00 GMT"),
			mtime,
			10
		));
	}

	#[test]
	fn test_was_modified_since_length_mismatch() {
		let mtime = SystemTime::UNIX_EPOCH;
		let header = "Mon, 18 Jan 2038 05:14:07 GMT; length=10";
		assert!(!was_modified_since(Some(header), mtime, 10));
		assert!(was_modified_since(Some(header), mtime, 11));
	}
}
