//! Domain models.
//!
//! Persisted records (`Account`, `Credential`, `Order`), the requests the
//! orchestrators accept, and the paged result wrapper.

pub mod account;
pub mod auth;
pub mod credential;
pub mod order;
pub mod page;

pub use account::{Account, CreateAccountRequest, UpdateAccountRequest};
pub use auth::{Role, TokenClaims};
pub use credential::{
    CreateCredentialRequest, Credential, LoginRequest, UpdateCredentialRequest,
};
pub use order::{CreateOrderRequest, Order, UpdateOrderRequest};
pub use page::{DeleteRequest, ListQuery, Page};
