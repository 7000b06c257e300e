//! Account orchestration.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::list_page;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    Account, CreateAccountRequest, DeleteRequest, ListQuery, Page, UpdateAccountRequest,
};
use crate::store::RecordStore;
use crate::uuid::new_record_id;
use crate::validation::Validate;

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn RecordStore<Account>>,
}

impl AccountService {
    pub fn new(store: Arc<dyn RecordStore<Account>>) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: &ListQuery) -> ServiceResult<Page<Account>> {
        list_page(self.store.as_ref(), query).await
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<Account> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("account", id))
    }

    pub async fn create(&self, request: &CreateAccountRequest) -> ServiceResult<Account> {
        request.validate()?;
        let account = Account::new(new_record_id(), request.name.trim().to_string());
        self.store.create(&account).await?;
        info!(account_id = %account.id, "account created");
        Ok(account)
    }

    pub async fn update(&self, request: &UpdateAccountRequest) -> ServiceResult<()> {
        request.validate()?;
        let now = Utc::now();
        let account = Account {
            id: request.id.clone(),
            name: request.name.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.update(&account).await?;
        Ok(())
    }

    /// Removes the account together with its orders and linked credentials.
    pub async fn delete(&self, request: &DeleteRequest) -> ServiceResult<()> {
        request.validate()?;
        self.store.delete(&request.id).await?;
        info!(account_id = %request.id, "account deleted");
        Ok(())
    }
}
