//! Authentication service: login and self-registration flows delegating to
//! `dbo_core`.

use dbo_core::auth::jwt::issue_token;
use dbo_core::models::{CreateCredentialRequest, Credential, LoginRequest, Role};
use dbo_core::service::CredentialService;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::LoginResponse;

/// Authenticate with username + password and issue an access token.
pub async fn login(
    credentials: &CredentialService,
    request: &LoginRequest,
    secret: &[u8],
) -> AppResult<LoginResponse> {
    let credential = credentials.authenticate(request).await?;
    let token = issue_token(&credential, secret)?;
    info!(username = %credential.username, role = %credential.role, "login");
    Ok(LoginResponse { token })
}

/// Self-service registration.
///
/// The first credential of a fresh deployment may claim the `admin` role.
/// After that, admin credentials can only be created by an admin through
/// the user endpoints.
pub async fn register(
    credentials: &CredentialService,
    request: &CreateCredentialRequest,
) -> AppResult<Credential> {
    let wants_admin = Role::from(request.role.trim()).is_admin();
    if wants_admin && !credentials.is_empty().await? {
        return Err(AppError::BadRequest(
            "admin role can't be self-registered".into(),
        ));
    }
    let credential = credentials.create(request).await?;
    if wants_admin {
        info!(username = %credential.username, "first credential registered as admin");
    }
    Ok(credential)
}
