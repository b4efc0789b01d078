//! # Snack Repository
//!
//! Inventory lookup for the cart: the snack record and its stock level.
//!
//! The cart core only reads snacks. `insert` exists for seeding and tests;
//! stock is never decremented from here.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use nomnaa_core::Snack;

const SNACK_COLUMNS: &str = r#"
    id,
    name,
    description,
    price_cents,
    quantity,
    image_url,
    created_at,
    updated_at
"#;

/// Repository for snack database operations.
#[derive(Debug, Clone)]
pub struct SnackRepository {
    pool: SqlitePool,
}

impl SnackRepository {
    /// Creates a new SnackRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SnackRepository { pool }
    }

    /// Gets a snack by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Snack))` - Snack found
    /// * `Ok(None)` - Snack not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Snack>> {
        let snack = sqlx::query_as::<_, Snack>(&format!(
            "SELECT {SNACK_COLUMNS} FROM snacks WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(snack)
    }

    /// Lists snacks ordered by name.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Snack>> {
        let snacks = sqlx::query_as::<_, Snack>(&format!(
            "SELECT {SNACK_COLUMNS} FROM snacks ORDER BY name LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(snacks)
    }

    /// Inserts a new snack.
    ///
    /// ## Returns
    /// * `Ok(Snack)` - The inserted snack
    /// * `Err(DbError::UniqueViolation)` - ID already exists
    pub async fn insert(&self, snack: &Snack) -> DbResult<Snack> {
        debug!(id = %snack.id, name = %snack.name, "Inserting snack");

        sqlx::query(
            r#"
            INSERT INTO snacks (
                id, name, description, price_cents, quantity,
                image_url, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&snack.id)
        .bind(&snack.name)
        .bind(&snack.description)
        .bind(snack.price_cents)
        .bind(snack.quantity)
        .bind(&snack.image_url)
        .bind(snack.created_at)
        .bind(snack.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(snack.clone())
    }

    /// Counts snacks (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM snacks")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new snack ID.
pub fn generate_snack_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    fn test_snack(name: &str, quantity: i64) -> Snack {
        let now = Utc::now();
        Snack {
            id: generate_snack_id(),
            name: name.to_string(),
            description: Some("crunchy".to_string()),
            price_cents: 2000,
            quantity,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let snack = test_snack("Pocky", 12);

        db.snacks().insert(&snack).await.unwrap();

        let loaded = db.snacks().get_by_id(&snack.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Pocky");
        assert_eq!(loaded.quantity, 12);
        assert_eq!(loaded.description.as_deref(), Some("crunchy"));
        assert_eq!(db.snacks().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let missing = db.snacks().get_by_id(&generate_snack_id()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let snack = test_snack("Pocky", 12);

        db.snacks().insert(&snack).await.unwrap();
        let err = db.snacks().insert(&snack).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_negative_stock_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.snacks().insert(&test_snack("Broken", -1)).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.snacks().insert(&test_snack("Tao Kae Noi", 3)).await.unwrap();
        db.snacks().insert(&test_snack("Bento", 3)).await.unwrap();

        let names: Vec<String> = db
            .snacks()
            .list(10)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Bento", "Tao Kae Noi"]);
    }
}
