//! Request handlers.

pub mod accounts;
pub mod auth;
pub mod credentials;
pub mod health;
pub mod orders;
