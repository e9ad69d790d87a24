//! Bulk insert behavior through the model manager.

use std::sync::Arc;

use grappelli_db::testing::InMemoryConnection;
use grappelli_db::{
	DatabaseConnection, DbError, Manager, Model, OrderBy, SelectQuery, SqlValue,
};

struct Country {
	name: String,
	iso_two_letter: String,
}

impl Country {
	fn new(name: &str, iso: &str) -> Self {
		Self {
			name: name.to_string(),
			iso_two_letter: iso.to_string(),
		}
	}
}

impl Model for Country {
	fn table_name() -> &'static str {
		"country"
	}

	fn columns() -> Vec<&'static str> {
		vec!["name", "iso_two_letter"]
	}

	fn row(&self) -> Vec<SqlValue> {
		vec![
			SqlValue::from(self.name.clone()),
			SqlValue::from(self.iso_two_letter.clone()),
		]
	}
}

// One level of subclass-table inheritance: rows land in the subclass
// table with an explicitly assigned primary key.
struct Restaurant {
	id: i64,
	name: String,
}

impl Model for Restaurant {
	fn table_name() -> &'static str {
		"restaurant"
	}

	fn columns() -> Vec<&'static str> {
		vec!["id", "name"]
	}

	fn row(&self) -> Vec<SqlValue> {
		vec![SqlValue::from(self.id), SqlValue::from(self.name.clone())]
	}

	fn has_auto_pk() -> bool {
		false
	}

	fn parent_tables() -> &'static [&'static str] {
		&["place"]
	}
}

// Two inherited tables deep.
struct Pizzeria {
	id: i64,
	name: String,
}

impl Model for Pizzeria {
	fn table_name() -> &'static str {
		"pizzeria"
	}

	fn columns() -> Vec<&'static str> {
		vec!["id", "name"]
	}

	fn row(&self) -> Vec<SqlValue> {
		vec![SqlValue::from(self.id), SqlValue::from(self.name.clone())]
	}

	fn has_auto_pk() -> bool {
		false
	}

	fn parent_tables() -> &'static [&'static str] {
		&["restaurant", "place"]
	}
}

struct State {
	two_letter_code: String,
}

impl Model for State {
	fn table_name() -> &'static str {
		"state"
	}

	fn columns() -> Vec<&'static str> {
		vec!["two_letter_code"]
	}

	fn row(&self) -> Vec<SqlValue> {
		vec![SqlValue::from(self.two_letter_code.clone())]
	}

	fn has_auto_pk() -> bool {
		false
	}
}

fn connection() -> Arc<dyn DatabaseConnection> {
	Arc::new(InMemoryConnection::new())
}

fn column(rows: &[grappelli_db::Row], name: &str) -> Vec<String> {
	rows.iter()
		.map(|row| {
			row.get(name)
				.and_then(SqlValue::as_str)
				.unwrap_or_default()
				.to_string()
		})
		.collect()
}

#[tokio::test]
async fn creates_all_objects_in_one_statement() {
	let manager: Manager<Country> = Manager::new(connection());
	let created = manager
		.bulk_create(vec![
			Country::new("United States of America", "US"),
			Country::new("The Netherlands", "NL"),
			Country::new("Germany", "DE"),
			Country::new("Czech Republic", "CZ"),
		])
		.await
		.unwrap();

	assert_eq!(created.len(), 4);
	assert_eq!(manager.count().await.unwrap(), 4);

	let rows = manager
		.find(&manager.query().order_by(OrderBy::desc("name")))
		.await
		.unwrap();
	assert_eq!(
		column(&rows, "name"),
		vec![
			"United States of America",
			"The Netherlands",
			"Germany",
			"Czech Republic"
		]
	);
}

#[tokio::test]
async fn single_level_inheritance_with_explicit_pks_succeeds() {
	let manager: Manager<Restaurant> = Manager::new(connection());
	let created = manager
		.bulk_create(vec![
			Restaurant {
				id: 1,
				name: "Nicholas's".to_string(),
			},
			Restaurant {
				id: 2,
				name: "Louise's".to_string(),
			},
		])
		.await
		.unwrap();

	assert_eq!(created.len(), 2);
	assert_eq!(manager.count().await.unwrap(), 2);
}

#[tokio::test]
async fn deep_inheritance_fails_without_touching_the_table() {
	let conn = connection();
	let restaurants: Manager<Restaurant> = Manager::new(Arc::clone(&conn));
	restaurants
		.bulk_create(vec![Restaurant {
			id: 1,
			name: "Nicholas's".to_string(),
		}])
		.await
		.unwrap();

	let pizzerias: Manager<Pizzeria> = Manager::new(Arc::clone(&conn));
	let result = pizzerias
		.bulk_create(vec![Pizzeria {
			id: 1,
			name: "Scarpellino's".to_string(),
		}])
		.await;

	assert!(matches!(result, Err(DbError::Value(_))));
	// The failed call wrote nothing anywhere.
	assert_eq!(pizzerias.count().await.unwrap(), 0);
	assert_eq!(restaurants.count().await.unwrap(), 1);
}

#[tokio::test]
async fn natural_primary_keys_are_preserved() {
	let manager: Manager<State> = Manager::new(connection());
	manager
		.bulk_create(vec![
			State {
				two_letter_code: "CA".to_string(),
			},
			State {
				two_letter_code: "IL".to_string(),
			},
			State {
				two_letter_code: "ME".to_string(),
			},
			State {
				two_letter_code: "NY".to_string(),
			},
		])
		.await
		.unwrap();

	let rows = manager
		.find(
			&SelectQuery::new("state")
				.columns(["two_letter_code"])
				.order_by(OrderBy::asc("two_letter_code")),
		)
		.await
		.unwrap();
	assert_eq!(
		column(&rows, "two_letter_code"),
		vec!["CA", "IL", "ME", "NY"]
	);
}
