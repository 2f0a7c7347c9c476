use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Statement used to replace an account's metadata document
pub const UPDATE_METADATA_SQL: &str = "UPDATE users SET metadata = $1::jsonb WHERE id = $2";

#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("invalid user id: {0}")]
    InvalidUserId(String),

    #[error("account backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Relational account records owned by the host
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Replace the metadata column of `user_id` with `metadata` as given
    async fn update_metadata(&self, user_id: &str, metadata: &str) -> Result<(), AccountStoreError>;
}

/// Account store over the host's `users` table
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn update_metadata(&self, user_id: &str, metadata: &str) -> Result<(), AccountStoreError> {
        // users.id is a uuid column
        let id = Uuid::parse_str(user_id)
            .map_err(|_| AccountStoreError::InvalidUserId(user_id.to_string()))?;

        let result = sqlx::query(UPDATE_METADATA_SQL)
            .bind(metadata)
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Updated metadata for {} ({} rows)", user_id, result.rows_affected());
        Ok(())
    }
}
