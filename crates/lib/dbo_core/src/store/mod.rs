//! Record store seam.
//!
//! Orchestrators only ever see `RecordStore<R>`: create, update, delete,
//! point lookup, a keyword-filtered page ordered by `created_at` descending,
//! and a matching count. `postgres` backs it with sqlx, `memory` with
//! in-process tables.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::{Account, Credential, Order};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store failures. Everything except a uniqueness conflict is internal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Replace a conflict's message, leaving other errors untouched.
    pub fn conflict_as(self, message: impl Into<String>) -> Self {
        match self {
            StoreError::Conflict(_) => StoreError::Conflict(message.into()),
            other => other,
        }
    }
}

/// Map sqlx errors, lifting unique violations to `Conflict`.
pub(crate) fn map_sqlx(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e
        && db.is_unique_violation()
    {
        return StoreError::Conflict("record already exists".into());
    }
    StoreError::Database(e)
}

/// Keyword / offset / limit for one page scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFilter {
    /// Case-insensitive substring on the record's name (username for credentials).
    pub keyword: Option<String>,
    pub offset: i64,
    /// `None` returns every row from `offset` on.
    pub limit: Option<i64>,
}

/// CRUD + count over one record type.
#[async_trait]
pub trait RecordStore<R: Send + Sync>: Send + Sync {
    /// Insert a record, returning its id.
    async fn create(&self, record: &R) -> Result<String, StoreError>;

    /// Overwrite the mutable fields of the record with the same id.
    /// Updating a missing id is a no-op.
    async fn update(&self, record: &R) -> Result<(), StoreError>;

    /// Delete by id. Deleting a missing id is a no-op.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<R>, StoreError>;

    /// One page, newest first.
    async fn find_page(&self, filter: &PageFilter) -> Result<Vec<R>, StoreError>;

    async fn count(&self, keyword: Option<&str>) -> Result<i64, StoreError>;
}

/// The three stores an application needs, behind trait objects.
#[derive(Clone)]
pub struct Stores {
    pub accounts: Arc<dyn RecordStore<Account>>,
    pub credentials: Arc<dyn RecordStore<Credential>>,
    pub orders: Arc<dyn RecordStore<Order>>,
}

impl Stores {
    /// Bundle one backend that implements all three record types.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: RecordStore<Account> + RecordStore<Credential> + RecordStore<Order> + 'static,
    {
        Self {
            accounts: backend.clone(),
            credentials: backend.clone(),
            orders: backend,
        }
    }

    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self::from_backend(Arc::new(PgStore::new(pool)))
    }

    /// Empty in-process stores.
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::default()))
    }
}
