//! Order orchestration. Every write resolves the owning account first.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::{AccountService, list_page};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    CreateOrderRequest, DeleteRequest, ListQuery, Order, Page, UpdateOrderRequest,
};
use crate::store::RecordStore;
use crate::uuid::new_record_id;
use crate::validation::Validate;

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn RecordStore<Order>>,
    accounts: AccountService,
}

impl OrderService {
    pub fn new(store: Arc<dyn RecordStore<Order>>, accounts: AccountService) -> Self {
        Self { store, accounts }
    }

    pub async fn list(&self, query: &ListQuery) -> ServiceResult<Page<Order>> {
        list_page(self.store.as_ref(), query).await
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<Order> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("order", id))
    }

    pub async fn create(&self, request: &CreateOrderRequest) -> ServiceResult<Order> {
        request.validate()?;
        let account = self.accounts.get_by_id(request.customer_id.trim()).await?;

        let now = Utc::now();
        let order = Order {
            id: new_record_id(),
            customer_id: account.id,
            name: request.name.trim().to_string(),
            qty: request.qty.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&order).await?;
        info!(order_id = %order.id, customer_id = %order.customer_id, "order created");
        Ok(order)
    }

    pub async fn update(&self, request: &UpdateOrderRequest) -> ServiceResult<()> {
        request.validate()?;
        let account = self.accounts.get_by_id(request.customer_id.trim()).await?;

        let now = Utc::now();
        let order = Order {
            id: request.id.clone(),
            customer_id: account.id,
            name: request.name.trim().to_string(),
            qty: request.qty.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.store.update(&order).await?;
        Ok(())
    }

    pub async fn delete(&self, request: &DeleteRequest) -> ServiceResult<()> {
        request.validate()?;
        self.store.delete(&request.id).await?;
        info!(order_id = %request.id, "order deleted");
        Ok(())
    }
}
