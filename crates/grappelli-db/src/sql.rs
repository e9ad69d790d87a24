//! Rendering structured queries to SQL text via sea-query.

use sea_query::{
	Alias, Asterisk, Cond, Condition, Expr, Func, MysqlQueryBuilder, Order, PostgresQueryBuilder,
	Query, SimpleExpr, SqliteQueryBuilder, Value,
};

use crate::connection::SqlValue;
use crate::error::{DbError, DbResult};
use crate::query::{
	Filter, FilterCondition, FilterOperator, FilterValue, InsertStatement, OrderDirection,
	SelectQuery,
};

/// SQL dialect a statement is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
	/// PostgreSQL.
	Postgres,
	/// MySQL / MariaDB.
	Mysql,
	/// SQLite.
	Sqlite,
}

impl SelectQuery {
	/// Renders this query as SQL for the given dialect.
	pub fn to_sql(&self, dialect: SqlDialect) -> String {
		let mut stmt = Query::select();
		stmt.from(Alias::new(&self.table));

		if self.columns.is_empty() {
			stmt.column(Asterisk);
		} else {
			for column in &self.columns {
				stmt.column(Alias::new(column));
			}
		}

		if let Some(condition) = &self.condition {
			stmt.cond_where(build_condition(condition));
		}

		for order in &self.order {
			let direction = match order.direction {
				OrderDirection::Asc => Order::Asc,
				OrderDirection::Desc => Order::Desc,
			};
			stmt.order_by(Alias::new(&order.field), direction);
		}

		if let Some(limit) = self.limit {
			stmt.limit(limit);
		}
		if let Some(offset) = self.offset {
			stmt.offset(offset);
		}
		if self.distinct {
			stmt.distinct();
		}

		match dialect {
			SqlDialect::Postgres => stmt.to_string(PostgresQueryBuilder),
			SqlDialect::Mysql => stmt.to_string(MysqlQueryBuilder),
			SqlDialect::Sqlite => stmt.to_string(SqliteQueryBuilder),
		}
	}
}

impl InsertStatement {
	/// Renders this insert as SQL for the given dialect.
	pub fn to_sql(&self, dialect: SqlDialect) -> DbResult<String> {
		let mut stmt = Query::insert();
		stmt.into_table(Alias::new(&self.table));
		stmt.columns(self.columns.iter().map(Alias::new));

		for row in &self.rows {
			if row.len() != self.columns.len() {
				return Err(DbError::QueryBuild(format!(
					"insert row has {} values for {} columns",
					row.len(),
					self.columns.len()
				)));
			}
			stmt.values(row.iter().map(sql_value_to_sea).map(SimpleExpr::from))
				.map_err(|e| DbError::QueryBuild(e.to_string()))?;
		}

		Ok(match dialect {
			SqlDialect::Postgres => stmt.to_string(PostgresQueryBuilder),
			SqlDialect::Mysql => stmt.to_string(MysqlQueryBuilder),
			SqlDialect::Sqlite => stmt.to_string(SqliteQueryBuilder),
		})
	}
}

/// Converts a filter condition tree into a sea-query condition.
pub fn build_condition(condition: &FilterCondition) -> Condition {
	match condition {
		FilterCondition::Single(filter) => Cond::all().add(filter_expr(filter)),
		FilterCondition::And(parts) => parts
			.iter()
			.fold(Cond::all(), |cond, part| cond.add(build_condition(part))),
		FilterCondition::Or(parts) => parts
			.iter()
			.fold(Cond::any(), |cond, part| cond.add(build_condition(part))),
		FilterCondition::Not(inner) => build_condition(inner).not(),
	}
}

fn filter_expr(filter: &Filter) -> SimpleExpr {
	let col = || Expr::col(Alias::new(&filter.field));
	let lowered = || Expr::expr(Func::lower(col()));

	match filter.operator {
		FilterOperator::Exact => match &filter.value {
			FilterValue::Null => col().is_null(),
			value => col().eq(filter_value_to_sea(value)),
		},
		FilterOperator::IExact => lowered().eq(text_value(&filter.value).to_lowercase()),
		FilterOperator::Contains => {
			col().like(format!("%{}%", escape_like(&text_value(&filter.value))))
		}
		FilterOperator::IContains => lowered().like(format!(
			"%{}%",
			escape_like(&text_value(&filter.value).to_lowercase())
		)),
		FilterOperator::IStartsWith => lowered().like(format!(
			"{}%",
			escape_like(&text_value(&filter.value).to_lowercase())
		)),
		FilterOperator::In => {
			let items: Vec<Value> = match &filter.value {
				FilterValue::List(items) => items.iter().map(|s| s.clone().into()).collect(),
				other => vec![filter_value_to_sea(other)],
			};
			col().is_in(items)
		}
		FilterOperator::Gt => col().gt(filter_value_to_sea(&filter.value)),
		FilterOperator::Gte => col().gte(filter_value_to_sea(&filter.value)),
		FilterOperator::Lt => col().lt(filter_value_to_sea(&filter.value)),
		FilterOperator::Lte => col().lte(filter_value_to_sea(&filter.value)),
		FilterOperator::IsNull => {
			if matches!(&filter.value, FilterValue::Boolean(false)) {
				col().is_not_null()
			} else {
				col().is_null()
			}
		}
		// Field names come from server-side configuration, never from the
		// request, so interpolating the quoted column is safe here.
		FilterOperator::Search => Expr::cust_with_values(
			format!(
				"to_tsvector(\"{}\") @@ plainto_tsquery(?)",
				filter.field.replace('"', "")
			),
			[text_value(&filter.value)],
		),
	}
}

fn text_value(value: &FilterValue) -> String {
	match value {
		FilterValue::Text(s) => s.clone(),
		FilterValue::Integer(i) => i.to_string(),
		FilterValue::Float(f) => f.to_string(),
		FilterValue::Boolean(b) => b.to_string(),
		FilterValue::Null => String::new(),
		FilterValue::List(items) => items.join(","),
	}
}

fn filter_value_to_sea(value: &FilterValue) -> Value {
	match value {
		FilterValue::Text(s) => s.clone().into(),
		FilterValue::Integer(i) => (*i).into(),
		FilterValue::Float(f) => (*f).into(),
		FilterValue::Boolean(b) => (*b).into(),
		FilterValue::Null => Value::Int(None),
		FilterValue::List(items) => items.join(",").into(),
	}
}

fn sql_value_to_sea(value: &SqlValue) -> Value {
	match value {
		SqlValue::Null => Value::Int(None),
		SqlValue::Integer(i) => (*i).into(),
		SqlValue::Float(f) => (*f).into(),
		SqlValue::Text(s) => s.clone().into(),
		SqlValue::Bool(b) => (*b).into(),
	}
}

/// Escapes LIKE wildcards in a user-supplied pattern fragment.
pub fn escape_like(fragment: &str) -> String {
	fragment
		.replace('\\', "\\\\")
		.replace('%', "\\%")
		.replace('_', "\\_")
}
