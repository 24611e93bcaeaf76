use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::Dispatched;
use crate::error::AppError;
use crate::models::courier::Courier;
use crate::models::order::{NewOrder, Order, OrderPatch, OrderStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order).get(list_active_orders))
        .route("/orders/archive", get(list_archived_orders))
        .route(
            "/orders/:id",
            get(get_order).patch(edit_order).delete(delete_order),
        )
        .route("/orders/:id/courier", put(assign_courier))
        .route("/orders/:id/status", put(change_status))
        .route("/orders/:id/couriers", get(assignable_couriers))
}

#[derive(Deserialize)]
pub struct AssignCourierRequest {
    pub courier_id: Uuid,
}

#[derive(Deserialize)]
pub struct ChangeStatusRequest {
    pub status: OrderStatus,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewOrder>,
) -> Result<Json<Dispatched>, AppError> {
    Ok(Json(state.dispatcher.create_order(payload).await?))
}

async fn list_active_orders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.dispatcher.active_orders().await?))
}

async fn list_archived_orders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.dispatcher.archived_orders().await?))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.dispatcher.order(id).await?))
}

async fn edit_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrderPatch>,
) -> Result<Json<Dispatched>, AppError> {
    Ok(Json(state.dispatcher.edit_order(id, payload).await?))
}

async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.dispatcher.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_courier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignCourierRequest>,
) -> Result<Json<Dispatched>, AppError> {
    Ok(Json(
        state
            .dispatcher
            .assign_courier(id, payload.courier_id)
            .await?,
    ))
}

async fn change_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeStatusRequest>,
) -> Result<Json<Dispatched>, AppError> {
    Ok(Json(
        state.dispatcher.change_status(id, payload.status).await?,
    ))
}

async fn assignable_couriers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Courier>>, AppError> {
    Ok(Json(state.dispatcher.assignable_couriers(id).await?))
}
