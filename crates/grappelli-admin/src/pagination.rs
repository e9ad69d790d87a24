//! Page arithmetic for the change list.

use thiserror::Error;

/// Errors from resolving a page number against a result count.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
	/// The page number does not exist for this count.
	#[error("invalid page number")]
	Invalid,

	/// The page exists but holds no rows.
	#[error("empty page")]
	Empty,
}

/// Splits a counted result set into fixed-size pages.
///
/// Page numbers are zero-based. The first page always exists, even for
/// an empty result set.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
	per_page: u64,
}

/// Offset/limit window of one resolved page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
	/// Rows to skip.
	pub offset: u64,
	/// Rows on the page.
	pub limit: u64,
}

impl Paginator {
	/// Creates a paginator with the given page size. A zero page size is
	/// treated as one row per page.
	pub fn new(per_page: u64) -> Self {
		Self {
			per_page: per_page.max(1),
		}
	}

	/// Number of pages for `count` rows; at least one.
	pub fn num_pages(&self, count: u64) -> u64 {
		count.div_ceil(self.per_page).max(1)
	}

	/// Resolves a zero-based page number to its offset/limit window.
	pub fn page(&self, count: u64, number: u64) -> Result<PageWindow, PageError> {
		if number >= self.num_pages(count) {
			return Err(PageError::Invalid);
		}
		let offset = number * self.per_page;
		if count > 0 && offset >= count {
			return Err(PageError::Empty);
		}
		Ok(PageWindow {
			offset,
			limit: self.per_page,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0, 1)]
	#[case(1, 1)]
	#[case(25, 1)]
	#[case(26, 2)]
	#[case(100, 4)]
	fn test_num_pages(#[case] count: u64, #[case] pages: u64) {
		assert_eq!(Paginator::new(25).num_pages(count), pages);
	}

	#[test]
	fn test_page_windows() {
		let paginator = Paginator::new(25);
		assert_eq!(
			paginator.page(60, 2),
			Ok(PageWindow {
				offset: 50,
				limit: 25
			})
		);
		assert_eq!(paginator.page(60, 3), Err(PageError::Invalid));
	}

	#[test]
	fn test_first_page_of_empty_set() {
		let paginator = Paginator::new(25);
		assert_eq!(
			paginator.page(0, 0),
			Ok(PageWindow {
				offset: 0,
				limit: 25
			})
		);
	}
}
