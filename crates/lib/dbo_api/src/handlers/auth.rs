//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use dbo_core::models::{CreateCredentialRequest, Credential, LoginRequest};

use crate::AppState;
use crate::error::AppResult;
use crate::models::{Envelope, LoginResponse, MSG_LOGIN};
use crate::services::auth;

/// `POST /api/login`: authenticate with username + password.
pub async fn login_handler(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<LoginResponse>>> {
    let Json(body) = body?;
    let resp = auth::login(&state.services.credentials, &body, state.config.secret()).await?;
    Ok(Json(Envelope::data(MSG_LOGIN, resp)))
}

/// `POST /api/register`: create a credential; `admin` only on an empty deployment.
pub async fn register_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateCredentialRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<Credential>>> {
    let Json(body) = body?;
    let credential = auth::register(&state.services.credentials, &body).await?;
    Ok(Json(Envelope::created(credential.username.clone(), credential)))
}
