//! Postgres item repository

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use super::connection::{DatabaseConnection, map_pg_error};
use super::models::{FromRow, Item, ItemChanges, NewItem};
use crate::repositories::{ItemRepository, RepositoryError};

const ITEM_COLUMNS: &str = "id, name, description, price, sold_out, user_id, created_at, updated_at";

/// Postgres keeps microseconds; truncating up front keeps returned records
/// identical to what a later read yields.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn decode(row: &tokio_postgres::Row) -> Result<Item, RepositoryError> {
    Item::from_row(row).map_err(|e| map_pg_error(e, "Failed to decode item row"))
}

#[async_trait]
impl ItemRepository for DatabaseConnection {
    async fn create_item(&self, item: NewItem) -> Result<Item, RepositoryError> {
        let item = item.into_item(now());
        let client = self.client().await?;
        client
            .execute(
                "INSERT INTO items (id, name, description, price, sold_out, user_id, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                &[
                    &item.id,
                    &item.name,
                    &item.description,
                    &item.price,
                    &item.sold_out,
                    &item.user_id,
                    &item.created_at,
                    &item.updated_at,
                ],
            )
            .await
            .map_err(|e| map_pg_error(e, "Failed to insert item"))?;
        Ok(item)
    }

    async fn find_all_items(&self) -> Result<Vec<Item>, RepositoryError> {
        let client = self.client().await?;
        let rows = client
            .query(
                &format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY created_at ASC, id ASC"),
                &[],
            )
            .await
            .map_err(|e| map_pg_error(e, "Failed to query items"))?;
        rows.iter().map(decode).collect()
    }

    async fn find_item_by_id(&self, id: Uuid) -> Result<Item, RepositoryError> {
        let client = self.client().await?;
        let row = client
            .query_opt(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"), &[&id])
            .await
            .map_err(|e| map_pg_error(e, "Failed to query item"))?;
        match row {
            Some(row) => decode(&row),
            None => Err(RepositoryError::item_not_found(id)),
        }
    }

    async fn update_item(&self, id: Uuid, changes: ItemChanges) -> Result<Item, RepositoryError> {
        let client = self.client().await?;
        let row = client
            .query_opt(
                &format!(
                    "UPDATE items SET \
                         name = COALESCE($2, name), \
                         description = COALESCE($3, description), \
                         price = COALESCE($4, price), \
                         sold_out = COALESCE($5, sold_out), \
                         updated_at = $6 \
                     WHERE id = $1 RETURNING {ITEM_COLUMNS}"
                ),
                &[
                    &id,
                    &changes.name,
                    &changes.description,
                    &changes.price,
                    &changes.sold_out,
                    &now(),
                ],
            )
            .await
            .map_err(|e| map_pg_error(e, "Failed to update item"))?;
        match row {
            Some(row) => decode(&row),
            None => Err(RepositoryError::item_not_found(id)),
        }
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), RepositoryError> {
        let client = self.client().await?;
        let deleted = client
            .execute("DELETE FROM items WHERE id = $1", &[&id])
            .await
            .map_err(|e| map_pg_error(e, "Failed to delete item"))?;
        if deleted == 0 {
            return Err(RepositoryError::item_not_found(id));
        }
        Ok(())
    }
}
