//! # Item Repository
//!
//! Database operations for cart lines.
//!
//! ## Key Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_by_id(id)                       - line by primary key             │
//! │  find_by_cart_and_snack(cart, snack) - the line merging targets        │
//! │  list_by_cart(cart)                  - lines ordered by id             │
//! │  save(item)                          - insert or update quantity       │
//! │  delete(id)                          - remove one line                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use nomnaa_core::CartItem;

const ITEM_COLUMNS: &str = r#"
    id,
    cart_id,
    snack_id,
    quantity,
    created_at,
    updated_at
"#;

/// Repository for cart item database operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Gets a line by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(CartItem))` - Line found (snack not attached)
    /// * `Ok(None)` - No such line
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets the line holding `snack_id` in `cart_id`, if any.
    pub async fn find_by_cart_and_snack(
        &self,
        cart_id: &str,
        snack_id: &str,
    ) -> DbResult<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE cart_id = ?1 AND snack_id = ?2"
        ))
        .bind(cart_id)
        .bind(snack_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets all lines of a cart, ordered by item id.
    pub async fn list_by_cart(&self, cart_id: &str) -> DbResult<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE cart_id = ?1 ORDER BY id"
        ))
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts the line, or updates its quantity if the id already exists.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - a different line already holds this snack
    /// * `DbError::ForeignKeyViolation` - unknown cart or snack
    /// * `DbError::CheckViolation` - quantity is not positive
    pub async fn save(&self, item: &CartItem) -> DbResult<()> {
        debug!(
            id = %item.id,
            cart_id = %item.cart_id,
            snack_id = %item.snack_id,
            quantity = item.quantity,
            "Saving cart item"
        );

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO items (id, cart_id, snack_id, quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (id) DO UPDATE SET
                quantity = excluded.quantity,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&item.id)
        .bind(&item.cart_id)
        .bind(&item.snack_id)
        .bind(item.quantity)
        .bind(item.created_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a line.
    ///
    /// ## Returns
    /// * `Ok(())` - Line removed
    /// * `Err(DbError::NotFound)` - Line doesn't exist
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting cart item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::pool::{Database, DbConfig};
    use nomnaa_core::{Cart, Snack};

    async fn setup() -> (Database, Cart, Snack) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let snack = Snack {
            id: Uuid::new_v4().to_string(),
            name: "Koh-Kae Peanuts".to_string(),
            description: None,
            price_cents: 1500,
            quantity: 10,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        db.snacks().insert(&snack).await.unwrap();
        let cart = db
            .carts()
            .create_pending(&Uuid::new_v4().to_string())
            .await
            .unwrap();
        (db, cart, snack)
    }

    #[tokio::test]
    async fn test_save_inserts_then_updates() {
        let (db, cart, snack) = setup().await;
        let mut item = CartItem::new(&cart.id, &snack.id, 2);

        db.items().save(&item).await.unwrap();
        item.quantity = 5;
        db.items().save(&item).await.unwrap();

        let lines = db.items().list_by_cart(&cart.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
        assert_eq!(lines[0].snack_id, snack.id);
    }

    #[tokio::test]
    async fn test_find_by_cart_and_snack() {
        let (db, cart, snack) = setup().await;
        let item = CartItem::new(&cart.id, &snack.id, 1);
        db.items().save(&item).await.unwrap();

        let found = db
            .items()
            .find_by_cart_and_snack(&cart.id, &snack.id)
            .await
            .unwrap();
        assert_eq!(found.map(|i| i.id), Some(item.id));

        let none = db
            .items()
            .find_by_cart_and_snack(&cart.id, &Uuid::new_v4().to_string())
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_second_line_for_same_snack_rejected() {
        let (db, cart, snack) = setup().await;
        db.items()
            .save(&CartItem::new(&cart.id, &snack.id, 1))
            .await
            .unwrap();

        let err = db
            .items()
            .save(&CartItem::new(&cart.id, &snack.id, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_unknown_snack_rejected() {
        let (db, cart, _) = setup().await;
        let err = db
            .items()
            .save(&CartItem::new(&cart.id, &Uuid::new_v4().to_string(), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected() {
        let (db, cart, snack) = setup().await;
        let err = db
            .items()
            .save(&CartItem::new(&cart.id, &snack.id, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let (db, cart, snack) = setup().await;
        let item = CartItem::new(&cart.id, &snack.id, 1);
        db.items().save(&item).await.unwrap();

        db.items().delete(&item.id).await.unwrap();
        assert!(db.items().get_by_id(&item.id).await.unwrap().is_none());

        let err = db.items().delete(&item.id).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
