//! Field-level request validation.
//!
//! Each request type lists its own rules; violations are collected rather
//! than short-circuited so callers see every missing field at once.

use std::fmt;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    CreateAccountRequest, CreateCredentialRequest, CreateOrderRequest, DeleteRequest,
    LoginRequest, UpdateAccountRequest, UpdateCredentialRequest, UpdateOrderRequest,
};

/// A single failed rule on a request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: &'static str,
}

impl FieldViolation {
    pub fn new(field: &'static str, rule: &'static str) -> Self {
        Self { field, rule }
    }

    pub fn required(field: &'static str) -> Self {
        Self::new(field, "required")
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.field, self.rule)
    }
}

/// Request types with field rules.
pub trait Validate {
    fn violations(&self) -> Vec<FieldViolation>;

    fn validate(&self) -> ServiceResult<()> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(violations))
        }
    }
}

/// Collects violations for one request.
#[derive(Default)]
struct Rules(Vec<FieldViolation>);

impl Rules {
    fn required(mut self, field: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.0.push(FieldViolation::required(field));
        }
        self
    }

    fn non_negative(mut self, field: &'static str, value: Option<i64>) -> Self {
        match value {
            None => self.0.push(FieldViolation::required(field)),
            Some(v) if v < 0 => self.0.push(FieldViolation::new(field, "min=0")),
            Some(_) => {}
        }
        self
    }

    fn finish(self) -> Vec<FieldViolation> {
        self.0
    }
}

impl Validate for LoginRequest {
    fn violations(&self) -> Vec<FieldViolation> {
        Rules::default()
            .required("username", &self.username)
            .required("password", &self.password)
            .finish()
    }
}

impl Validate for CreateCredentialRequest {
    fn violations(&self) -> Vec<FieldViolation> {
        Rules::default()
            .required("username", &self.username)
            .required("password", &self.password)
            .required("role", &self.role)
            .finish()
    }
}

impl Validate for UpdateCredentialRequest {
    fn violations(&self) -> Vec<FieldViolation> {
        Rules::default()
            .required("username", &self.username)
            .required("password", &self.password)
            .required("role", &self.role)
            .finish()
    }
}

impl Validate for CreateAccountRequest {
    fn violations(&self) -> Vec<FieldViolation> {
        Rules::default().required("name", &self.name).finish()
    }
}

impl Validate for UpdateAccountRequest {
    fn violations(&self) -> Vec<FieldViolation> {
        Rules::default()
            .required("id", &self.id)
            .required("name", &self.name)
            .finish()
    }
}

impl Validate for CreateOrderRequest {
    fn violations(&self) -> Vec<FieldViolation> {
        Rules::default()
            .required("name", &self.name)
            .non_negative("qty", self.qty)
            .required("customerId", &self.customer_id)
            .finish()
    }
}

impl Validate for UpdateOrderRequest {
    fn violations(&self) -> Vec<FieldViolation> {
        Rules::default()
            .required("id", &self.id)
            .required("name", &self.name)
            .non_negative("qty", self.qty)
            .required("customerId", &self.customer_id)
            .finish()
    }
}

impl Validate for DeleteRequest {
    fn violations(&self) -> Vec<FieldViolation> {
        Rules::default().required("id", &self.id).finish()
    }
}
