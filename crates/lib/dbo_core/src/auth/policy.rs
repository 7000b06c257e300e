//! Role policy: a fixed decision table over (role, resource, method).
//!
//! The coarse gate runs on every protected request and never touches the
//! store. Ownership of individual records is checked separately, only on the
//! update paths that need it.

use http::Method;

use super::AuthError;
use super::jwt::validate_token;
use crate::models::auth::TokenClaims;

/// Denial reason returned for role/route mismatches.
pub const NO_ACCESS: &str = "this user doesn't have access to this endpoint";

const BEARER_PREFIX: &str = "Bearer ";

/// Outcome of the role gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Route category a request path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Order,
    Account,
    Credential,
    Other,
}

impl Resource {
    /// Classify a request path by its resource segment, the one right after
    /// `/api`: `/api/order/42` is `Order`, `/api/user/orders` is `Credential`.
    pub fn from_path(path: &str) -> Self {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let resource = match segments.next() {
            Some("api") => segments.next(),
            first => first,
        };
        match resource {
            Some("order" | "orders") => Resource::Order,
            Some("account" | "accounts") => Resource::Account,
            Some("user" | "users") => Resource::Credential,
            _ => Resource::Other,
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The value must use the `Bearer` scheme and carry a structurally valid
/// three-segment JWT. Anything else is `MissingAuthorization`.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let token = header
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .ok_or(AuthError::MissingAuthorization)?;

    let mut segments = token.split('.');
    let well_formed = segments.by_ref().take(3).filter(|s| !s.is_empty()).count() == 3
        && segments.next().is_none();
    if !well_formed {
        return Err(AuthError::MissingAuthorization);
    }
    Ok(token)
}

/// Decide whether validated claims may call `method` on `path`.
///
/// - `admin`: always allowed.
/// - any other role: orders with any method; accounts except create/delete.
pub fn authorize(claims: &TokenClaims, path: &str, method: &Method) -> Decision {
    if claims.role.is_admin() {
        return Decision::Allow;
    }
    match Resource::from_path(path) {
        Resource::Order => Decision::Allow,
        Resource::Account if *method != Method::DELETE && *method != Method::POST => {
            Decision::Allow
        }
        _ => Decision::Deny(NO_ACCESS.to_string()),
    }
}

/// Full gate for a protected request: bearer extraction, token validation,
/// then the role table. Returns the caller's claims when allowed.
pub fn authorize_request(
    header: Option<&str>,
    path: &str,
    method: &Method,
    secret: &[u8],
) -> Result<TokenClaims, AuthError> {
    let token = bearer_token(header)?;
    let claims = validate_token(token, secret)?;
    match authorize(&claims, path, method) {
        Decision::Allow => Ok(claims),
        Decision::Deny(reason) => Err(AuthError::AccessDenied(reason)),
    }
}

/// Non-admin callers may only update the account their token is linked to.
pub fn ensure_account_owner(claims: &TokenClaims, account_id: &str) -> Result<(), AuthError> {
    if claims.role.is_admin() || claims.customer_id.as_deref() == Some(account_id) {
        return Ok(());
    }
    Err(AuthError::AccessDenied(format!(
        "this user can't update this id {account_id}"
    )))
}

/// Non-admin callers may only update their own credential, and may not
/// point it at an account other than the one their token is linked to.
///
/// The role table currently keeps non-admins off `/api/user` entirely, so
/// through the router this only ever sees admins. The non-admin rule still
/// applies to any caller that reaches the update path some other way.
pub fn ensure_credential_owner(
    claims: &TokenClaims,
    username: &str,
    requested_account: Option<&str>,
) -> Result<(), AuthError> {
    if claims.role.is_admin() {
        return Ok(());
    }
    let own_credential = claims.username == username;
    let own_account = requested_account.is_none_or(|id| claims.customer_id.as_deref() == Some(id));
    if own_credential && own_account {
        return Ok(());
    }
    Err(AuthError::AccessDenied(format!(
        "this user can't update this id {username}"
    )))
}
