//! Account handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use dbo_core::auth::policy::ensure_account_owner;
use dbo_core::models::{Account, CreateAccountRequest, DeleteRequest, UpdateAccountRequest};
use dbo_core::pagination::parse_list_query;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{Envelope, ListParams, MSG_DELETE, MSG_RETRIEVE, MSG_UPDATE};

/// `GET /api/account?keyword=&limit=&page=`
pub async fn list_handler(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<Envelope<Vec<Account>>>> {
    let Query(params) = params?;
    let query = parse_list_query(
        params.keyword,
        params.limit.as_deref(),
        params.page.as_deref(),
    )?;
    let page = state.services.accounts.list(&query).await?;
    Ok(Json(Envelope::page(page)))
}

/// `GET /api/account/{id}`
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<Account>>> {
    let account = state.services.accounts.get_by_id(&id).await?;
    Ok(Json(Envelope::data(MSG_RETRIEVE, account)))
}

/// `POST /api/account` (admin only)
pub async fn create_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<Account>>> {
    let Json(body) = body?;
    let account = state.services.accounts.create(&body).await?;
    Ok(Json(Envelope::created(account.id.clone(), account)))
}

/// `PUT /api/account/{id}`: non-admins may only rename their own account.
pub async fn update_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    body: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<()>>> {
    let Json(mut body) = body?;
    ensure_account_owner(&user.0, &id)?;
    body.id = id;
    state.services.accounts.update(&body).await?;
    Ok(Json(Envelope::id(MSG_UPDATE, body.id)))
}

/// `DELETE /api/account/{id}` (admin only)
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<()>>> {
    let request = DeleteRequest::new(id);
    state.services.accounts.delete(&request).await?;
    Ok(Json(Envelope::id(MSG_DELETE, request.id)))
}
