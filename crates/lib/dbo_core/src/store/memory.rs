//! In-process record store.
//!
//! Mirrors the PostgreSQL schema's behaviour: unique keys, newest-first
//! paging, case-insensitive keyword search, and cascading account deletes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{PageFilter, RecordStore, StoreError};
use crate::models::{Account, Credential, Order};

/// Row behaviour the generic table needs.
trait Row: Clone + Send + Sync {
    fn key(&self) -> &str;
    fn search_text(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    /// Copy the mutable fields of `update` onto `self`.
    fn apply(&mut self, update: &Self);
}

impl Row for Account {
    fn key(&self) -> &str {
        &self.id
    }
    fn search_text(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn apply(&mut self, update: &Self) {
        self.name = update.name.clone();
        self.updated_at = update.updated_at;
    }
}

impl Row for Credential {
    fn key(&self) -> &str {
        &self.username
    }
    fn search_text(&self) -> &str {
        &self.username
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn apply(&mut self, update: &Self) {
        self.password_hash = update.password_hash.clone();
        self.role = update.role.clone();
        if update.customer_id.is_some() {
            self.customer_id = update.customer_id.clone();
        }
        self.updated_at = update.updated_at;
    }
}

impl Row for Order {
    fn key(&self) -> &str {
        &self.id
    }
    fn search_text(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn apply(&mut self, update: &Self) {
        self.customer_id = update.customer_id.clone();
        self.name = update.name.clone();
        self.qty = update.qty;
        self.updated_at = update.updated_at;
    }
}

/// Rows kept in insertion order.
struct Table<R> {
    rows: RwLock<Vec<R>>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

fn matches_keyword(text: &str, keyword: Option<&str>) -> bool {
    match keyword {
        Some(k) => text.to_lowercase().contains(&k.to_lowercase()),
        None => true,
    }
}

impl<R: Row> Table<R> {
    async fn insert(&self, record: &R) -> Result<String, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.key() == record.key()) {
            return Err(StoreError::Conflict("record already exists".into()));
        }
        rows.push(record.clone());
        Ok(record.key().to_string())
    }

    async fn update(&self, record: &R) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        if let Some(row) = rows.iter_mut().find(|r| r.key() == record.key()) {
            row.apply(record);
        }
        Ok(())
    }

    async fn delete(&self, key: &str) {
        self.rows.write().await.retain(|r| r.key() != key);
    }

    async fn find(&self, key: &str) -> Option<R> {
        self.rows.read().await.iter().find(|r| r.key() == key).cloned()
    }

    async fn page(&self, filter: &PageFilter) -> Vec<R> {
        let rows = self.rows.read().await;
        // Newest insert first among equal timestamps.
        let mut matched: Vec<R> = rows
            .iter()
            .rev()
            .filter(|r| matches_keyword(r.search_text(), filter.keyword.as_deref()))
            .cloned()
            .collect();
        matched.sort_by_key(|r| std::cmp::Reverse(r.created_at()));

        let skip = usize::try_from(filter.offset.max(0)).unwrap_or(usize::MAX);
        let take = filter
            .limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);
        matched.into_iter().skip(skip).take(take).collect()
    }

    async fn count(&self, keyword: Option<&str>) -> i64 {
        let rows = self.rows.read().await;
        let n = rows
            .iter()
            .filter(|r| matches_keyword(r.search_text(), keyword))
            .count();
        i64::try_from(n).unwrap_or(i64::MAX)
    }
}

/// In-memory accounts, credentials and orders.
#[derive(Default)]
pub struct MemoryStore {
    accounts: Table<Account>,
    credentials: Table<Credential>,
    orders: Table<Order>,
}

#[async_trait]
impl RecordStore<Account> for MemoryStore {
    async fn create(&self, record: &Account) -> Result<String, StoreError> {
        self.accounts.insert(record).await
    }

    async fn update(&self, record: &Account) -> Result<(), StoreError> {
        self.accounts.update(record).await
    }

    /// Cascades to linked credentials and orders.
    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.accounts.delete(id).await;
        self.credentials
            .rows
            .write()
            .await
            .retain(|c| c.customer_id.as_deref() != Some(id));
        self.orders.rows.write().await.retain(|o| o.customer_id != id);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.find(id).await)
    }

    async fn find_page(&self, filter: &PageFilter) -> Result<Vec<Account>, StoreError> {
        Ok(self.accounts.page(filter).await)
    }

    async fn count(&self, keyword: Option<&str>) -> Result<i64, StoreError> {
        Ok(self.accounts.count(keyword).await)
    }
}

#[async_trait]
impl RecordStore<Credential> for MemoryStore {
    async fn create(&self, record: &Credential) -> Result<String, StoreError> {
        self.credentials.insert(record).await
    }

    async fn update(&self, record: &Credential) -> Result<(), StoreError> {
        self.credentials.update(record).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.credentials.delete(id).await;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self.credentials.find(id).await)
    }

    async fn find_page(&self, filter: &PageFilter) -> Result<Vec<Credential>, StoreError> {
        Ok(self.credentials.page(filter).await)
    }

    async fn count(&self, keyword: Option<&str>) -> Result<i64, StoreError> {
        Ok(self.credentials.count(keyword).await)
    }
}

#[async_trait]
impl RecordStore<Order> for MemoryStore {
    async fn create(&self, record: &Order) -> Result<String, StoreError> {
        self.orders.insert(record).await
    }

    async fn update(&self, record: &Order) -> Result<(), StoreError> {
        self.orders.update(record).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.orders.delete(id).await;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.find(id).await)
    }

    async fn find_page(&self, filter: &PageFilter) -> Result<Vec<Order>, StoreError> {
        Ok(self.orders.page(filter).await)
    }

    async fn count(&self, keyword: Option<&str>) -> Result<i64, StoreError> {
        Ok(self.orders.count(keyword).await)
    }
}
