use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::Json;
use axum::Router;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::courier::{Courier, NewCourier};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/couriers", post(create_courier).get(list_couriers))
        .route("/couriers/:id", delete(delete_courier))
}

async fn create_courier(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCourier>,
) -> Result<Json<Courier>, AppError> {
    let courier = state.dispatcher.create_courier(payload).await?;
    Ok(Json(courier))
}

async fn list_couriers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Courier>>, AppError> {
    Ok(Json(state.dispatcher.couriers().await?))
}

async fn delete_courier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.dispatcher.delete_courier(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
