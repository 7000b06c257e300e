//! Authentication and authorization logic.
//!
//! Provides password hashing, JWT issuance/validation and the role policy
//! shared by the HTTP middleware and the orchestrators' ownership checks.

pub mod jwt;
pub mod password;
pub mod policy;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing authorization")]
    MissingAuthorization,

    #[error("token is not valid: {0}")]
    InvalidToken(String),

    #[error("{0}")]
    AccessDenied(String),

    #[error("username or password invalid")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}
