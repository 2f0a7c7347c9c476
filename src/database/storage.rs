//! Key/value storage gateway.
//!
//! Objects are addressed by (collection, key, owner). The storage engine
//! belongs to the host; this module only describes the contract the
//! handlers rely on and a thin Postgres adapter over the host's `storage`
//! table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use thiserror::Error;
use uuid::Uuid;

/// Who may read a storage object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum ReadPermission {
    NoRead = 0,
    OwnerRead = 1,
    PublicRead = 2,
}

/// Who may write a storage object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum WritePermission {
    NoWrite = 0,
    OwnerWrite = 1,
}

impl ReadPermission {
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::NoRead),
            1 => Some(Self::OwnerRead),
            2 => Some(Self::PublicRead),
            _ => None,
        }
    }
}

impl WritePermission {
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::NoWrite),
            1 => Some(Self::OwnerWrite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRead {
    pub collection: String,
    pub key: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageWrite {
    pub collection: String,
    pub key: String,
    pub user_id: String,
    /// Serialized JSON document
    pub value: String,
    pub permission_read: ReadPermission,
    pub permission_write: WritePermission,
}

/// A stored document as returned by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageObject {
    pub collection: String,
    pub key: String,
    pub user_id: String,
    pub value: String,
    pub version: String,
    pub permission_read: ReadPermission,
    pub permission_write: WritePermission,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

/// Identifies the object version produced by a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAck {
    pub collection: String,
    pub key: String,
    pub user_id: String,
    pub version: String,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid user id: {0}")]
    InvalidUserId(String),

    #[error("invalid permission value {0} in column {1}")]
    InvalidPermission(i16, &'static str),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Contract over the host key/value store.
///
/// Each call is a single at-most-once backend operation; no retries or
/// transactions are layered on top.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Objects matching the request. An empty vector means "not present".
    async fn read(&self, request: &StorageRead) -> Result<Vec<StorageObject>, StorageError>;

    async fn write(&self, request: &StorageWrite) -> Result<StorageAck, StorageError>;
}

/// Content version recorded alongside each value
pub fn object_version(value: &str) -> String {
    format!("{:x}", Sha256::digest(value.as_bytes()))
}

/// Storage gateway over the host's `storage` table
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_user_id(user_id: &str) -> Result<Uuid, StorageError> {
        Uuid::parse_str(user_id).map_err(|_| StorageError::InvalidUserId(user_id.to_string()))
    }
}

#[async_trait]
impl StorageGateway for PgStorage {
    async fn read(&self, request: &StorageRead) -> Result<Vec<StorageObject>, StorageError> {
        let user_id = Self::parse_user_id(&request.user_id)?;

        let query = r#"
            SELECT collection, key, user_id, value::text AS value, version,
                   read, write, create_time, update_time
            FROM storage
            WHERE collection = $1 AND key = $2 AND user_id = $3
        "#;

        let rows = sqlx::query(query)
            .bind(&request.collection)
            .bind(&request.key)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<StorageObject, StorageError> {
                let read: i16 = row.try_get("read")?;
                let write: i16 = row.try_get("write")?;
                let owner: Uuid = row.try_get("user_id")?;
                Ok(StorageObject {
                    collection: row.try_get("collection")?,
                    key: row.try_get("key")?,
                    user_id: owner.to_string(),
                    value: row.try_get("value")?,
                    version: row.try_get("version")?,
                    permission_read: ReadPermission::from_i16(read)
                        .ok_or(StorageError::InvalidPermission(read, "read"))?,
                    permission_write: WritePermission::from_i16(write)
                        .ok_or(StorageError::InvalidPermission(write, "write"))?,
                    create_time: row.try_get("create_time")?,
                    update_time: row.try_get("update_time")?,
                })
            })
            .collect()
    }

    async fn write(&self, request: &StorageWrite) -> Result<StorageAck, StorageError> {
        let user_id = Self::parse_user_id(&request.user_id)?;
        let version = object_version(&request.value);

        let query = r#"
            INSERT INTO storage (collection, key, user_id, value, version, read, write, create_time, update_time)
            VALUES ($1, $2, $3, $4::jsonb, $5, $6, $7, now(), now())
            ON CONFLICT (collection, key, user_id)
            DO UPDATE SET value = $4::jsonb, version = $5, read = $6, write = $7, update_time = now()
        "#;

        sqlx::query(query)
            .bind(&request.collection)
            .bind(&request.key)
            .bind(user_id)
            .bind(&request.value)
            .bind(&version)
            .bind(request.permission_read as i16)
            .bind(request.permission_write as i16)
            .execute(&self.pool)
            .await?;

        Ok(StorageAck {
            collection: request.collection.clone(),
            key: request.key.clone(),
            user_id: request.user_id.clone(),
            version,
        })
    }
}
