//! # Cart Repository
//!
//! Database operations for carts.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Lifecycle                                  │
//! │                                                                         │
//! │  create_pending(user)                                                  │
//! │       │   (partial unique index: one pending cart per user)            │
//! │       ▼                                                                 │
//! │  ┌─────────┐   items added / updated / deleted (ItemRepository)        │
//! │  │ pending │◄──────────────────────────────────────────┐               │
//! │  └────┬────┘                                            │               │
//! │       │ update_status(pending → confirmed)  [transaction]              │
//! │       ▼                                                                 │
//! │  ┌───────────┐                                                         │
//! │  │ confirmed │  terminal, never touched again                          │
//! │  └───────────┘                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups return `Ok(None)` when no row matches, so callers can tell
//! "not found" from a failed query.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::item::ItemRepository;
use nomnaa_core::{Cart, CartItem, CartStatus, Snack};

const CART_COLUMNS: &str = "id, user_id, status, created_at, updated_at";

/// One item joined with its snack.
#[derive(Debug, sqlx::FromRow)]
struct ItemWithSnackRow {
    item_id: String,
    cart_id: String,
    snack_id: String,
    item_quantity: i64,
    item_created_at: DateTime<Utc>,
    item_updated_at: DateTime<Utc>,
    snack_name: String,
    snack_description: Option<String>,
    snack_price_cents: i64,
    snack_quantity: i64,
    snack_image_url: Option<String>,
    snack_created_at: DateTime<Utc>,
    snack_updated_at: DateTime<Utc>,
}

impl From<ItemWithSnackRow> for CartItem {
    fn from(row: ItemWithSnackRow) -> Self {
        CartItem {
            id: row.item_id,
            cart_id: row.cart_id,
            snack: Some(Snack {
                id: row.snack_id.clone(),
                name: row.snack_name,
                description: row.snack_description,
                price_cents: row.snack_price_cents,
                quantity: row.snack_quantity,
                image_url: row.snack_image_url,
                created_at: row.snack_created_at,
                updated_at: row.snack_updated_at,
            }),
            snack_id: row.snack_id,
            quantity: row.item_quantity,
            created_at: row.item_created_at,
            updated_at: row.item_updated_at,
        }
    }
}

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    fn items(&self) -> ItemRepository {
        ItemRepository::new(self.pool.clone())
    }

    /// Gets the user's pending cart with its lines (snacks not attached).
    ///
    /// ## Returns
    /// * `Ok(Some(Cart))` - The single pending cart
    /// * `Ok(None)` - The user has no pending cart
    pub async fn find_pending_for_user(&self, user_id: &str) -> DbResult<Option<Cart>> {
        debug!(user_id = %user_id, "Loading pending cart");

        let cart = sqlx::query_as::<_, Cart>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE user_id = ?1 AND status = ?2"
        ))
        .bind(user_id)
        .bind(CartStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        self.with_items(cart).await
    }

    /// Gets a cart by its own ID with its lines (snacks not attached).
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Cart>> {
        let cart = self.get_row(id).await?;
        self.with_items(cart).await
    }

    /// Gets a cart by ID with every line's snack attached.
    ///
    /// Lines are ordered by item id ascending. A single JOIN loads lines and
    /// snacks together.
    pub async fn get_with_snacks(&self, id: &str) -> DbResult<Option<Cart>> {
        let Some(mut cart) = self.get_row(id).await? else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, ItemWithSnackRow>(
            r#"
            SELECT
                i.id AS item_id,
                i.cart_id AS cart_id,
                i.snack_id AS snack_id,
                i.quantity AS item_quantity,
                i.created_at AS item_created_at,
                i.updated_at AS item_updated_at,
                s.name AS snack_name,
                s.description AS snack_description,
                s.price_cents AS snack_price_cents,
                s.quantity AS snack_quantity,
                s.image_url AS snack_image_url,
                s.created_at AS snack_created_at,
                s.updated_at AS snack_updated_at
            FROM items i
            INNER JOIN snacks s ON s.id = i.snack_id
            WHERE i.cart_id = ?1
            ORDER BY i.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        cart.items = rows.into_iter().map(CartItem::from).collect();
        Ok(Some(cart))
    }

    /// Opens a new pending cart for a user.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the user already has a pending cart.
    pub async fn create_pending(&self, user_id: &str) -> DbResult<Cart> {
        let cart = Cart::new_pending(user_id);

        debug!(id = %cart.id, user_id = %user_id, "Creating pending cart");

        sqlx::query(
            r#"
            INSERT INTO carts (id, user_id, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&cart.id)
        .bind(&cart.user_id)
        .bind(cart.status)
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(cart)
    }

    /// Moves a cart from `from` to `to` inside a transaction.
    ///
    /// ## What This Does
    /// 1. BEGIN
    /// 2. UPDATE the status, guarded by `status = from`
    /// 3. COMMIT, or ROLLBACK if the update failed or matched no row
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no cart with this id in status `from`
    /// * `DbError::TransactionFailed` - begin/commit/rollback failed
    pub async fn update_status(&self, id: &str, from: CartStatus, to: CartStatus) -> DbResult<()> {
        debug!(id = %id, from = %from, to = %to, "Updating cart status");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let updated = sqlx::query(
            r#"
            UPDATE carts SET
                status = ?2,
                updated_at = ?3
            WHERE id = ?1 AND status = ?4
            "#,
        )
        .bind(id)
        .bind(to)
        .bind(Utc::now())
        .bind(from)
        .execute(&mut *tx)
        .await;

        let result = match updated {
            Ok(result) => result,
            Err(e) => {
                warn!(id = %id, error = %e, "Status update failed, rolling back");
                tx.rollback()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                return Err(e.into());
            }
        };

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            return Err(DbError::not_found(format!("Cart ({from})"), id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Confirms a pending cart. See [`CartRepository::update_status`].
    pub async fn confirm(&self, id: &str) -> DbResult<()> {
        self.update_status(id, CartStatus::Pending, CartStatus::Confirmed)
            .await
    }

    /// Counts carts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM carts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn get_row(&self, id: &str) -> DbResult<Option<Cart>> {
        let cart = sqlx::query_as::<_, Cart>(&format!(
            "SELECT {CART_COLUMNS} FROM carts WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cart)
    }

    async fn with_items(&self, cart: Option<Cart>) -> DbResult<Option<Cart>> {
        let Some(mut cart) = cart else {
            return Ok(None);
        };
        cart.items = self.items().list_by_cart(&cart.id).await?;
        Ok(Some(cart))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn insert_snack(db: &Database, quantity: i64) -> Snack {
        let now = Utc::now();
        let snack = Snack {
            id: Uuid::new_v4().to_string(),
            name: "Hanami Prawn Crackers".to_string(),
            description: None,
            price_cents: 2000,
            quantity,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        db.snacks().insert(&snack).await.unwrap()
    }

    fn user() -> String {
        Uuid::new_v4().to_string()
    }

    #[tokio::test]
    async fn test_create_and_find_pending() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user_id = user();

        let created = db.carts().create_pending(&user_id).await.unwrap();
        let found = db
            .carts()
            .find_pending_for_user(&user_id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.status, CartStatus::Pending);
        assert!(found.items.is_empty());

        assert!(db
            .carts()
            .find_pending_for_user(&user())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_one_pending_cart_per_user() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user_id = user();

        db.carts().create_pending(&user_id).await.unwrap();
        let err = db.carts().create_pending(&user_id).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_new_pending_cart_allowed_after_confirm() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user_id = user();

        let first = db.carts().create_pending(&user_id).await.unwrap();
        db.carts().confirm(&first.id).await.unwrap();

        let second = db.carts().create_pending(&user_id).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_get_with_snacks_orders_items_by_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cart = db.carts().create_pending(&user()).await.unwrap();

        for qty in 1..=3 {
            let snack = insert_snack(&db, 10).await;
            db.items()
                .save(&CartItem::new(&cart.id, &snack.id, qty))
                .await
                .unwrap();
        }

        let loaded = db.carts().get_with_snacks(&cart.id).await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 3);

        let ids: Vec<&str> = loaded.items.iter().map(|i| i.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);

        for item in &loaded.items {
            let snack = item.snack.as_ref().unwrap();
            assert_eq!(snack.id, item.snack_id);
            assert_eq!(snack.quantity, 10);
        }
    }

    #[tokio::test]
    async fn test_get_with_snacks_missing_cart() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.carts().get_with_snacks(&user()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_confirm_is_one_way() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cart = db.carts().create_pending(&user()).await.unwrap();

        db.carts().confirm(&cart.id).await.unwrap();
        let loaded = db.carts().get_by_id(&cart.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, CartStatus::Confirmed);

        // Second confirm finds no pending row and rolls back
        let err = db.carts().confirm(&cart.id).await.unwrap_err();
        assert!(err.is_not_found());

        // Pool is still usable after the rollback
        assert_eq!(db.carts().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_deleting_cart_cascades_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cart = db.carts().create_pending(&user()).await.unwrap();
        let snack = insert_snack(&db, 5).await;
        db.items()
            .save(&CartItem::new(&cart.id, &snack.id, 2))
            .await
            .unwrap();

        sqlx::query("DELETE FROM carts WHERE id = ?1")
            .bind(&cart.id)
            .execute(db.pool())
            .await
            .unwrap();

        assert!(db.items().list_by_cart(&cart.id).await.unwrap().is_empty());
    }
}
