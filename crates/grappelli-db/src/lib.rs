//! Structured query seam for the Grappelli framework.
//!
//! Grappelli does not ship an ORM. This crate is the boundary the rest of
//! the workspace talks to instead: structured filter/order/pagination
//! types that render to SQL through sea-query, an async
//! [`DatabaseConnection`] trait with explicit transactions, per-backend
//! row post-processing, and multi-row inserts via [`Manager::bulk_create`].
//!
//! Real driver integration (sqlx, postgres, ...) lives behind
//! [`DatabaseConnection`] and is supplied by the application. The
//! [`testing`] module provides an in-memory implementation that evaluates
//! the structured query form directly, which is what the workspace test
//! suites run against.

pub mod backends;
pub mod connection;
pub mod error;
pub mod model;
pub mod query;
pub mod sql;
pub mod testing;

pub use backends::{ColumnType, DatabaseBackend, MysqlBackend, PostgresBackend};
pub use connection::{DatabaseConnection, Row, SqlValue, Transaction, TransactionExecutor};
pub use error::{DbError, DbResult};
pub use model::{Manager, Model};
pub use query::{
	Filter, FilterCondition, FilterOperator, FilterValue, InsertStatement, OrderBy,
	OrderDirection, SelectQuery,
};
pub use sql::SqlDialect;
