// Database Models
//
// Records for users and catalog items, plus the input shapes the
// repositories accept.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio_postgres::Row;
use uuid::Uuid;

/// Build a record from a tokio-postgres row
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>;
}

/// Registered user. The password hash never leaves the server.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl FromRow for User {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Fields needed to persist a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

/// Catalog item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub sold_out: bool,
    /// Creator of the item, if known
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow for Item {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            sold_out: row.try_get("sold_out")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Validated input for a new item
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub user_id: Option<Uuid>,
}

impl NewItem {
    /// Materialize the record with a fresh id and timestamps
    pub fn into_item(self, now: DateTime<Utc>) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            price: self.price,
            sold_out: false,
            user_id: self.user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub sold_out: Option<bool>,
}

impl ItemChanges {
    pub fn apply(self, item: &mut Item, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(sold_out) = self.sold_out {
            item.sold_out = sold_out;
        }
        item.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(now: DateTime<Utc>) -> Item {
        NewItem {
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: Decimal::new(999, 2),
            user_id: None,
        }
        .into_item(now)
    }

    #[test]
    fn test_partial_changes_only_touch_supplied_fields() {
        let created = Utc::now();
        let mut item = sample(created);
        let later = created + Duration::seconds(5);

        ItemChanges { price: Some(Decimal::new(1250, 2)), ..Default::default() }.apply(&mut item, later);

        assert_eq!(item.name, "Widget");
        assert_eq!(item.description, "A widget");
        assert_eq!(item.price, Decimal::new(1250, 2));
        assert!(!item.sold_out);
        assert_eq!(item.created_at, created);
        assert_eq!(item.updated_at, later);
    }

    #[test]
    fn test_item_serializes_price_as_number() {
        let item = sample(Utc::now());
        let value = serde_json::to_value(&item).unwrap();
        assert!(value["price"].is_number());
        assert!((value["price"].as_f64().unwrap() - 9.99).abs() < 1e-9);
        assert_eq!(value["sold_out"], false);
        assert!(value["user_id"].is_null());
    }
}
