//! Order handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use dbo_core::models::{CreateOrderRequest, DeleteRequest, Order, UpdateOrderRequest};
use dbo_core::pagination::parse_list_query;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{Envelope, ListParams, MSG_DELETE, MSG_RETRIEVE, MSG_UPDATE};

/// `GET /api/order?keyword=&limit=&page=`
pub async fn list_handler(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<Envelope<Vec<Order>>>> {
    let Query(params) = params?;
    let query = parse_list_query(
        params.keyword,
        params.limit.as_deref(),
        params.page.as_deref(),
    )?;
    let page = state.services.orders.list(&query).await?;
    Ok(Json(Envelope::page(page)))
}

/// `GET /api/order/{id}`
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<Order>>> {
    let order = state.services.orders.get_by_id(&id).await?;
    Ok(Json(Envelope::data(MSG_RETRIEVE, order)))
}

/// `POST /api/order`
pub async fn create_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<Order>>> {
    let Json(body) = body?;
    let order = state.services.orders.create(&body).await?;
    Ok(Json(Envelope::created(order.id.clone(), order)))
}

/// `PUT /api/order/{id}`
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<()>>> {
    let Json(mut body) = body?;
    body.id = id;
    state.services.orders.update(&body).await?;
    Ok(Json(Envelope::id(MSG_UPDATE, body.id)))
}

/// `DELETE /api/order/{id}`
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<()>>> {
    let request = DeleteRequest::new(id);
    state.services.orders.delete(&request).await?;
    Ok(Json(Envelope::id(MSG_DELETE, request.id)))
}
