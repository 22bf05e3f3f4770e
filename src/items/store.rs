use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::model::{Item, PageParams, Pagination, ValidationErrors};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("item not found")]
    NotFound,

    #[error("item failed validation")]
    Invalid(ValidationErrors),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for items. Validation happens here, before any write.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Item, StoreError>;

    /// Newest first.
    async fn list(&self, params: PageParams) -> Result<(Vec<Item>, Pagination), StoreError>;

    async fn create(&self, item: Item) -> Result<Item, StoreError>;

    async fn update(&self, item: Item) -> Result<Item, StoreError>;

    async fn destroy(&self, id: Uuid) -> Result<(), StoreError>;
}

pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn find(&self, id: Uuid) -> Result<Item, StoreError> {
        sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, created_at, updated_at
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn list(&self, params: PageParams) -> Result<(Vec<Item>, Pagination), StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, created_at, updated_at
            FROM items
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.per_page())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((items, Pagination::new(params, total)))
    }

    async fn create(&self, item: Item) -> Result<Item, StoreError> {
        let errors = item.validate();
        if errors.has_any() {
            return Err(StoreError::Invalid(errors));
        }

        let rec = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&item.title)
        .bind(&item.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(rec)
    }

    async fn update(&self, item: Item) -> Result<Item, StoreError> {
        let errors = item.validate();
        if errors.has_any() {
            return Err(StoreError::Invalid(errors));
        }

        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET
                title = $2,
                description = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, created_at, updated_at
            "#,
        )
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn destroy(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
