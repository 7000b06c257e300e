//! Credential orchestration: provisioning, login and password changes.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::{AccountService, list_page};
use crate::auth::AuthError;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    CreateAccountRequest, CreateCredentialRequest, Credential, DeleteRequest, ListQuery,
    LoginRequest, Page, Role, UpdateCredentialRequest,
};
use crate::store::RecordStore;
use crate::validation::Validate;

#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn RecordStore<Credential>>,
    accounts: AccountService,
}

fn username_taken(username: &str) -> String {
    format!("username {username} already exists")
}

impl CredentialService {
    pub fn new(store: Arc<dyn RecordStore<Credential>>, accounts: AccountService) -> Self {
        Self { store, accounts }
    }

    pub async fn list(&self, query: &ListQuery) -> ServiceResult<Page<Credential>> {
        list_page(self.store.as_ref(), query).await
    }

    /// True until the first credential has been stored.
    pub async fn is_empty(&self) -> ServiceResult<bool> {
        Ok(self.store.count(None).await? == 0)
    }

    pub async fn get_by_id(&self, username: &str) -> ServiceResult<Credential> {
        self.store
            .find_by_id(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", username))
    }

    /// Create a credential. Customers get an account named after their
    /// username; it is removed again if the credential cannot be stored.
    pub async fn create(&self, request: &CreateCredentialRequest) -> ServiceResult<Credential> {
        request.validate()?;
        let username = request.username.trim().to_string();
        if self.store.find_by_id(&username).await?.is_some() {
            return Err(ServiceError::BadRequest(username_taken(&username)));
        }

        let role = Role::from(request.role.trim());
        let password_hash = hash_password(&request.password)?;

        let customer_id = if role.requires_account() {
            let account = self
                .accounts
                .create(&CreateAccountRequest {
                    name: username.clone(),
                })
                .await?;
            Some(account.id)
        } else {
            None
        };

        let now = Utc::now();
        let credential = Credential {
            username,
            password_hash,
            role,
            customer_id,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.store.create(&credential).await {
            if let Some(account_id) = &credential.customer_id {
                let rollback = DeleteRequest::new(account_id.clone());
                if let Err(cleanup) = self.accounts.delete(&rollback).await {
                    warn!(%account_id, "failed to remove provisioned account: {cleanup}");
                }
            }
            return Err(e.conflict_as(username_taken(&credential.username)).into());
        }

        info!(username = %credential.username, role = %credential.role, "credential created");
        Ok(credential)
    }

    /// Check a username/password pair. Unknown users and wrong passwords
    /// fail the same way.
    pub async fn authenticate(&self, request: &LoginRequest) -> ServiceResult<Credential> {
        request.validate()?;
        let Some(credential) = self.store.find_by_id(request.username.trim()).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };
        if !verify_password(&request.password, &credential.password_hash)? {
            return Err(AuthError::InvalidCredentials.into());
        }
        Ok(credential)
    }

    /// Replace password and role. A given account link must resolve; a
    /// missing one keeps the current link.
    pub async fn update(&self, request: &UpdateCredentialRequest) -> ServiceResult<()> {
        request.validate()?;
        let role = Role::from(request.role.trim());
        let customer_id = request
            .customer_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());

        match customer_id {
            Some(id) => {
                self.accounts.get_by_id(id).await?;
            }
            None if role.requires_account() => {
                let current = self.store.find_by_id(&request.username).await?;
                if current.is_some_and(|c| c.customer_id.is_none()) {
                    return Err(ServiceError::BadRequest(
                        "customer role requires a customerId".into(),
                    ));
                }
            }
            None => {}
        }

        let now = Utc::now();
        let credential = Credential {
            username: request.username.clone(),
            password_hash: hash_password(&request.password)?,
            role,
            customer_id: customer_id.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        self.store.update(&credential).await?;
        Ok(())
    }

    pub async fn delete(&self, request: &DeleteRequest) -> ServiceResult<()> {
        request.validate()?;
        self.store.delete(&request.id).await?;
        info!(username = %request.id, "credential deleted");
        Ok(())
    }
}
