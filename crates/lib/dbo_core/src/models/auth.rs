//! Authentication domain models.
//!
//! `Role` is the only authorization signal carried by a token; there is no
//! separate permission table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role name granting unrestricted access.
pub const ROLE_ADMIN: &str = "admin";

/// Role name of self-service account holders.
pub const ROLE_CUSTOMER: &str = "customer";

/// Credential role.
///
/// Any name other than `admin` or `customer` is kept verbatim as an operator
/// role and is treated like a non-admin by the policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Customer,
    Operator(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Customer => ROLE_CUSTOMER,
            Role::Operator(name) => name,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Customer credentials must be backed by an account.
    pub fn requires_account(&self) -> bool {
        matches!(self, Role::Customer)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            ROLE_ADMIN => Role::Admin,
            ROLE_CUSTOMER => Role::Customer,
            _ => Role::Operator(value),
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::from(value.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Operator(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from(s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Credential username.
    pub username: String,
    /// Credential role.
    pub role: Role,
    /// Linked account id. Absent for credentials without an account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Subject: the username again (standard JWT `sub` claim).
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(Role::from("admin"), Role::Admin);
        assert_eq!(Role::from("customer"), Role::Customer);
        assert_eq!(Role::from("warehouse"), Role::Operator("warehouse".into()));
        assert_eq!(String::from(Role::Operator("warehouse".into())), "warehouse");
        assert_eq!(Role::Customer.to_string(), "customer");
    }

    #[test]
    fn role_serializes_as_plain_string() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
        let back: Role = serde_json::from_str("\"ops\"").unwrap();
        assert_eq!(back, Role::Operator("ops".into()));
    }

    #[test]
    fn only_customers_require_an_account() {
        assert!(Role::Customer.requires_account());
        assert!(!Role::Admin.requires_account());
        assert!(!Role::Operator("ops".into()).requires_account());
    }
}
