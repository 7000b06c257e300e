//! Credential (`/api/user`) handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use dbo_core::auth::policy::ensure_credential_owner;
use dbo_core::models::{
    CreateCredentialRequest, Credential, DeleteRequest, UpdateCredentialRequest,
};
use dbo_core::pagination::parse_list_query;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{Envelope, ListParams, MSG_DELETE, MSG_RETRIEVE, MSG_UPDATE};

/// `GET /api/user?keyword=&limit=&page=`
pub async fn list_handler(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<Envelope<Vec<Credential>>>> {
    let Query(params) = params?;
    let query = parse_list_query(
        params.keyword,
        params.limit.as_deref(),
        params.page.as_deref(),
    )?;
    let page = state.services.credentials.list(&query).await?;
    Ok(Json(Envelope::page(page)))
}

/// `GET /api/user/{username}`
pub async fn get_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<Envelope<Credential>>> {
    let credential = state.services.credentials.get_by_id(&username).await?;
    Ok(Json(Envelope::data(MSG_RETRIEVE, credential)))
}

/// `POST /api/user`
pub async fn create_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateCredentialRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<Credential>>> {
    let Json(body) = body?;
    let credential = state.services.credentials.create(&body).await?;
    Ok(Json(Envelope::created(credential.username.clone(), credential)))
}

/// `PUT /api/user/{username}`
pub async fn update_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(username): Path<String>,
    body: Result<Json<UpdateCredentialRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<()>>> {
    let Json(mut body) = body?;
    ensure_credential_owner(&user.0, &username, body.customer_id.as_deref())?;
    body.username = username;
    state.services.credentials.update(&body).await?;
    Ok(Json(Envelope::id(MSG_UPDATE, body.username)))
}

/// `DELETE /api/user/{username}`
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<Envelope<()>>> {
    let request = DeleteRequest::new(username);
    state.services.credentials.delete(&request).await?;
    Ok(Json(Envelope::id(MSG_DELETE, request.id)))
}
