//! Admin change list for the Grappelli framework.
//!
//! A [`ChangeList`] turns the query string of an admin list request into
//! a restricted, ordered, paginated query against the database seam:
//! arbitrary `field__lookup=value` parameters become filters, the `q`
//! parameter drives search across configured fields, `o`/`ot` select the
//! ordering from the displayed columns, and `p` picks the page.
//!
//! The admin UI that renders the result is not part of this crate.

pub mod changelist;
pub mod error;
pub mod pagination;

pub use changelist::{
	ALL_VAR, ChangeList, ERROR_FLAG, IS_POPUP_VAR, ORDER_TYPE_VAR, ORDER_VAR, PAGE_VAR,
	SEARCH_VAR, TO_FIELD_VAR,
};
pub use error::{ChangeListError, ChangeListResult};
pub use pagination::{PageError, PageWindow, Paginator};
