//! PostgreSQL record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{PageFilter, RecordStore, StoreError, map_sqlx};
use crate::models::{Account, Credential, Order, Role};

type AccountRow = (String, String, DateTime<Utc>, DateTime<Utc>);
type CredentialRow = (
    String,
    String,
    String,
    Option<String>,
    DateTime<Utc>,
    DateTime<Utc>,
);
type OrderRow = (String, String, String, i64, DateTime<Utc>, DateTime<Utc>);

fn account_from_row((id, name, created_at, updated_at): AccountRow) -> Account {
    Account {
        id,
        name,
        created_at,
        updated_at,
    }
}

fn credential_from_row(
    (username, password_hash, role, customer_id, created_at, updated_at): CredentialRow,
) -> Credential {
    Credential {
        username,
        password_hash,
        role: Role::from(role),
        customer_id,
        created_at,
        updated_at,
    }
}

fn order_from_row((id, customer_id, name, qty, created_at, updated_at): OrderRow) -> Order {
    Order {
        id,
        customer_id,
        name,
        qty,
        created_at,
        updated_at,
    }
}

/// Substring pattern for `ILIKE ... ESCAPE '\'`, with the keyword's own
/// wildcards taken literally.
fn like_pattern(keyword: Option<&str>) -> Option<String> {
    keyword.map(|k| {
        let mut pattern = String::with_capacity(k.len() + 2);
        pattern.push('%');
        for c in k.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    })
}

/// sqlx-backed store sharing one connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<Account> for PgStore {
    async fn create(&self, record: &Account) -> Result<String, StoreError> {
        sqlx::query_scalar::<_, String>(
            "INSERT INTO accounts (id, name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn update(&self, record: &Account) -> Result<(), StoreError> {
        sqlx::query("UPDATE accounts SET name = $2, updated_at = $3 WHERE id = $1")
            .bind(&record.id)
            .bind(&record.name)
            .bind(record.updated_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, name, created_at, updated_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(row.map(account_from_row))
    }

    async fn find_page(&self, filter: &PageFilter) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT id, name, created_at, updated_at FROM accounts \
             WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\\') \
             ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3",
        )
        .bind(like_pattern(filter.keyword.as_deref()))
        .bind(filter.offset)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(rows.into_iter().map(account_from_row).collect())
    }

    async fn count(&self, keyword: Option<&str>) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM accounts \
             WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\\')",
        )
        .bind(like_pattern(keyword))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}

#[async_trait]
impl RecordStore<Credential> for PgStore {
    async fn create(&self, record: &Credential) -> Result<String, StoreError> {
        sqlx::query_scalar::<_, String>(
            "INSERT INTO credentials \
             (username, password_hash, role, customer_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING username",
        )
        .bind(&record.username)
        .bind(&record.password_hash)
        .bind(record.role.as_str())
        .bind(record.customer_id.as_deref())
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    /// Keeps the existing account link when `customer_id` is `None`.
    async fn update(&self, record: &Credential) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE credentials SET password_hash = $2, role = $3, \
             customer_id = COALESCE($4, customer_id), updated_at = $5 \
             WHERE username = $1",
        )
        .bind(&record.username)
        .bind(&record.password_hash)
        .bind(record.role.as_str())
        .bind(record.customer_id.as_deref())
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM credentials WHERE username = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Credential>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT username, password_hash, role, customer_id, created_at, updated_at \
             FROM credentials WHERE username = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(row.map(credential_from_row))
    }

    async fn find_page(&self, filter: &PageFilter) -> Result<Vec<Credential>, StoreError> {
        let rows = sqlx::query_as::<_, CredentialRow>(
            "SELECT username, password_hash, role, customer_id, created_at, updated_at \
             FROM credentials \
             WHERE ($1::text IS NULL OR username ILIKE $1 ESCAPE '\\') \
             ORDER BY created_at DESC, username DESC OFFSET $2 LIMIT $3",
        )
        .bind(like_pattern(filter.keyword.as_deref()))
        .bind(filter.offset)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(rows.into_iter().map(credential_from_row).collect())
    }

    async fn count(&self, keyword: Option<&str>) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM credentials \
             WHERE ($1::text IS NULL OR username ILIKE $1 ESCAPE '\\')",
        )
        .bind(like_pattern(keyword))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}

#[async_trait]
impl RecordStore<Order> for PgStore {
    async fn create(&self, record: &Order) -> Result<String, StoreError> {
        sqlx::query_scalar::<_, String>(
            "INSERT INTO orders (id, customer_id, name, qty, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&record.id)
        .bind(&record.customer_id)
        .bind(&record.name)
        .bind(record.qty)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn update(&self, record: &Order) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE orders SET customer_id = $2, name = $3, qty = $4, updated_at = $5 \
             WHERE id = $1",
        )
        .bind(&record.id)
        .bind(&record.customer_id)
        .bind(&record.name)
        .bind(record.qty)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_id, name, qty, created_at, updated_at \
             FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(row.map(order_from_row))
    }

    async fn find_page(&self, filter: &PageFilter) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, customer_id, name, qty, created_at, updated_at FROM orders \
             WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\\') \
             ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3",
        )
        .bind(like_pattern(filter.keyword.as_deref()))
        .bind(filter.offset)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(rows.into_iter().map(order_from_row).collect())
    }

    async fn count(&self, keyword: Option<&str>) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders \
             WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\\')",
        )
        .bind(like_pattern(keyword))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)
    }
}
