use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::order::OrderStatus;
use crate::store::StoreError;

/// Rejections and failures of the assignment state machine.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("order {0} not found")]
    OrderNotFound(Uuid),

    #[error("courier {0} not found")]
    CourierNotFound(Uuid),

    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("order {0} has no courier assigned")]
    MissingCourier(Uuid),

    #[error("courier {0} is not available")]
    CourierUnavailable(Uuid),

    #[error("courier {0} is assigned to an active order")]
    CourierInUse(Uuid),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{cause}; rollback failed: {rollback}")]
    RollbackFailed { cause: StoreError, rollback: StoreError },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Dispatch(err) => dispatch_status(err),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

fn dispatch_status(err: &DispatchError) -> StatusCode {
    match err {
        DispatchError::OrderNotFound(_) | DispatchError::CourierNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        DispatchError::Validation(_) => StatusCode::BAD_REQUEST,
        DispatchError::InvalidTransition { .. }
        | DispatchError::MissingCourier(_)
        | DispatchError::CourierUnavailable(_)
        | DispatchError::CourierInUse(_) => StatusCode::CONFLICT,
        DispatchError::Store(store) | DispatchError::RollbackFailed { cause: store, .. } => {
            match store {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::VersionConflict { .. } | StoreError::Duplicate(_) => {
                    StatusCode::CONFLICT
                }
                StoreError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                StoreError::Backend(_) => StatusCode::BAD_GATEWAY,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_rejections_map_to_conflict() {
        let err = DispatchError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        };
        assert_eq!(dispatch_status(&err), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "invalid transition from Delivered to Pending");
    }

    #[test]
    fn store_failures_keep_their_own_status() {
        let timeout = DispatchError::Store(StoreError::Timeout(std::time::Duration::from_millis(5)));
        assert_eq!(dispatch_status(&timeout), StatusCode::GATEWAY_TIMEOUT);

        let rollback = DispatchError::RollbackFailed {
            cause: StoreError::Backend("write refused".to_string()),
            rollback: StoreError::Backend("connection reset".to_string()),
        };
        assert_eq!(dispatch_status(&rollback), StatusCode::BAD_GATEWAY);
        assert!(rollback.to_string().contains("rollback failed"));
    }
}
