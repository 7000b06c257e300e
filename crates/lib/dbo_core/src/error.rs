//! Orchestration errors.
//!
//! Every orchestrator operation returns `ServiceResult`; the status class
//! travels with the error so the HTTP boundary can map it without guessing.

use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;
use crate::validation::FieldViolation;

/// Convenience alias for orchestrator return types.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// HTTP-equivalent status class of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    BadRequest,
    Unauthorized,
    NotFound,
    InternalError,
}

impl StatusClass {
    pub fn code(self) -> u16 {
        match self {
            StatusClass::BadRequest => 400,
            StatusClass::Unauthorized => 401,
            StatusClass::NotFound => 404,
            StatusClass::InternalError => 500,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("mandatory field is missing: {}", join_fields(.0))]
    Validation(Vec<FieldViolation>),

    #[error("{0}")]
    BadRequest(String),

    #[error("page {page} greater than totalPage {total_pages}")]
    PageOutOfRange { page: i64, total_pages: i64 },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status_class(&self) -> StatusClass {
        match self {
            ServiceError::Validation(_)
            | ServiceError::BadRequest(_)
            | ServiceError::PageOutOfRange { .. } => StatusClass::BadRequest,
            ServiceError::Unauthorized(_) => StatusClass::Unauthorized,
            ServiceError::NotFound(_) => StatusClass::NotFound,
            ServiceError::Internal(_) => StatusClass::InternalError,
        }
    }

    pub fn not_found(kind: &str, id: &str) -> Self {
        ServiceError::NotFound(format!("no {kind} found with id {id}"))
    }
}

fn join_fields(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Internal(msg) => ServiceError::Internal(msg),
            other => ServiceError::Unauthorized(other.to_string()),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => ServiceError::BadRequest(msg),
            StoreError::Database(e) => ServiceError::Internal(e.to_string()),
        }
    }
}
