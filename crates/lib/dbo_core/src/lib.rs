//! # dbo_core
//!
//! Core domain logic for DBO: token issuance and validation, the role
//! policy, paging, request validation, the record store seam and the
//! per-resource orchestrators that sit on top of it.

pub mod auth;
pub mod error;
pub mod migrate;
pub mod models;
pub mod pagination;
pub mod service;
pub mod store;
pub mod uuid;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
