//! Model trait and manager.
//!
//! A [`Model`] describes how a record type maps onto one table; a
//! [`Manager`] runs operations for that type against a connection. Only
//! the operations the workspace needs exist here — this is not a general
//! ORM.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::connection::{DatabaseConnection, Row, SqlValue};
use crate::error::{DbError, DbResult};
use crate::query::{InsertStatement, SelectQuery};

/// Mapping between a record type and its table.
pub trait Model: Sized {
	/// Table the model's own fields live in.
	fn table_name() -> &'static str;

	/// Insertable column names. Includes the primary key column only for
	/// models without an auto-increment key.
	fn columns() -> Vec<&'static str>;

	/// The model's values for [`Model::columns`], in matching order.
	fn row(&self) -> Vec<SqlValue>;

	/// Whether the primary key is database-assigned.
	fn has_auto_pk() -> bool {
		true
	}

	/// Ancestor tables for multi-table inheritance, nearest parent first.
	/// Empty for models that own their whole row.
	fn parent_tables() -> &'static [&'static str] {
		&[]
	}
}

/// Entry point for running model operations on a connection.
pub struct Manager<M: Model> {
	conn: Arc<dyn DatabaseConnection>,
	_model: PhantomData<fn() -> M>,
}

impl<M: Model> Manager<M> {
	/// Creates a manager bound to a connection.
	pub fn new(conn: Arc<dyn DatabaseConnection>) -> Self {
		Self {
			conn,
			_model: PhantomData,
		}
	}

	/// The connection this manager runs against.
	pub fn connection(&self) -> &Arc<dyn DatabaseConnection> {
		&self.conn
	}

	/// A query over the model's table.
	pub fn query(&self) -> SelectQuery {
		SelectQuery::new(M::table_name())
	}

	/// Inserts all objects in a single multi-row statement and returns
	/// them.
	///
	/// Models one inheritance level deep insert into their own table,
	/// carrying the explicitly assigned primary key. Deeper multi-table
	/// inheritance chains cannot be written in one statement per table
	/// consistently, so they are rejected with a value error before
	/// anything is sent to the database.
	pub async fn bulk_create(&self, objs: Vec<M>) -> DbResult<Vec<M>> {
		if objs.is_empty() {
			return Ok(objs);
		}
		if M::parent_tables().len() > 1 {
			return Err(DbError::Value(format!(
				"cannot bulk create {}: multi-table inheritance deeper than one level",
				M::table_name()
			)));
		}

		let mut stmt = InsertStatement::new(M::table_name(), M::columns());
		for obj in &objs {
			stmt = stmt.row(obj.row());
		}
		self.conn.insert(&stmt).await?;
		Ok(objs)
	}

	/// Runs a query over the model's table and returns the rows.
	pub async fn find(&self, query: &SelectQuery) -> DbResult<Vec<Row>> {
		self.conn.select(query).await
	}

	/// Counts all rows of the model's table.
	pub async fn count(&self) -> DbResult<u64> {
		self.conn.count(&self.query()).await
	}
}
