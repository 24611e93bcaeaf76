use serde::Serialize;
use uuid::Uuid;

use crate::models::courier::Courier;
use crate::models::order::Order;

/// Change-feed message pushed to websocket subscribers after a successful
/// operation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum DispatchEvent {
    OrderChanged(Order),
    CourierChanged(Courier),
    OrderDeleted { id: Uuid },
    CourierDeleted { id: Uuid },
}
