//! Management commands.

pub mod loaddata;

pub use loaddata::{LoadDataCommand, LoadDataOptions};
