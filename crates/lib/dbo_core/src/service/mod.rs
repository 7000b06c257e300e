//! Resource orchestrators.
//!
//! One service per resource, each holding the record store it owns plus the
//! services it consults for cross-entity checks. Services are cheap to clone
//! and share nothing but the stores.

pub mod accounts;
pub mod credentials;
pub mod orders;

pub use accounts::AccountService;
pub use credentials::CredentialService;
pub use orders::OrderService;

use crate::error::ServiceResult;
use crate::models::{ListQuery, Page};
use crate::pagination::PageWindow;
use crate::store::{PageFilter, RecordStore, Stores};

/// All three orchestrators wired over one set of stores.
#[derive(Clone)]
pub struct Services {
    pub accounts: AccountService,
    pub credentials: CredentialService,
    pub orders: OrderService,
}

impl Services {
    pub fn new(stores: Stores) -> Self {
        let accounts = AccountService::new(stores.accounts);
        Self {
            credentials: CredentialService::new(stores.credentials, accounts.clone()),
            orders: OrderService::new(stores.orders, accounts.clone()),
            accounts,
        }
    }
}

/// Count, resolve the window, then fetch one page newest first.
pub(crate) async fn list_page<R>(
    store: &dyn RecordStore<R>,
    query: &ListQuery,
) -> ServiceResult<Page<R>>
where
    R: Send + Sync,
{
    let total = store.count(query.keyword.as_deref()).await?;
    let window = PageWindow::resolve(query.page, query.limit, total)?;
    let filter = PageFilter {
        keyword: query.keyword.clone(),
        offset: window.offset,
        limit: window.limit,
    };
    let data = store.find_page(&filter).await?;
    Ok(Page {
        data,
        limit: query.limit,
        page: window.page,
        total_page: window.total_pages,
    })
}
