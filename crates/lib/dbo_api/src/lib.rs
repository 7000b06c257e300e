//! # dbo_api
//!
//! HTTP API library for DBO.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::Router;
use axum::routing::{get, post};
use dbo_core::service::Services;
use dbo_core::store::Stores;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{accounts, auth, credentials, health, orders};

/// Route paths.
pub mod routes {
    pub const HEALTH: &str = "/health";
    pub const REGISTER: &str = "/api/register";
    pub const LOGIN: &str = "/api/login";
    pub const ACCOUNTS: &str = "/api/account";
    pub const ACCOUNT: &str = "/api/account/{id}";
    pub const USERS: &str = "/api/user";
    pub const USER: &str = "/api/user/{id}";
    pub const ORDERS: &str = "/api/order";
    pub const ORDER: &str = "/api/order/{id}";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Resource orchestrators.
    pub services: Services,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(stores: Stores, config: ApiConfig) -> Self {
        Self {
            services: Services::new(stores),
            config,
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `dbo_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    dbo_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::HEALTH, get(health::health_handler))
        .route(routes::REGISTER, post(auth::register_handler))
        .route(routes::LOGIN, post(auth::login_handler));

    // Protected routes (bearer token + role policy)
    let protected = Router::new()
        .route(
            routes::ACCOUNTS,
            get(accounts::list_handler).post(accounts::create_handler),
        )
        .route(
            routes::ACCOUNT,
            get(accounts::get_handler)
                .put(accounts::update_handler)
                .delete(accounts::delete_handler),
        )
        .route(
            routes::USERS,
            get(credentials::list_handler).post(credentials::create_handler),
        )
        .route(
            routes::USER,
            get(credentials::get_handler)
                .put(credentials::update_handler)
                .delete(credentials::delete_handler),
        )
        .route(
            routes::ORDERS,
            get(orders::list_handler).post(orders::create_handler),
        )
        .route(
            routes::ORDER,
            get(orders::get_handler)
                .put(orders::update_handler)
                .delete(orders::delete_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
