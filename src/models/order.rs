use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    InTransit,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Delivered and cancelled orders accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InTransit => "InTransit",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub client_name: String,
    pub address: String,
    pub description: String,
    pub status: OrderStatus,
    pub courier_id: Option<Uuid>,
    pub delivery_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl Order {
    /// The courier this order keeps unavailable, if any. Only active orders
    /// hold their courier; terminal orders keep `courier_id` as history.
    pub fn held_courier(&self) -> Option<Uuid> {
        if self.status.is_active() {
            self.courier_id
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub client_name: String,
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub courier_id: Option<Uuid>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
}

/// Edit-form patch. `courier_id` and `delivery_date` distinguish "leave as
/// is" (absent) from "clear" (`null`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub courier_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub delivery_date: Option<Option<NaiveDate>>,
}

fn deserialize_explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_delivered_and_cancelled_are_terminal() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::InTransit.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn patch_distinguishes_absent_from_null_courier() {
        let absent: OrderPatch = serde_json::from_str(r#"{"address":"Main St 1"}"#).unwrap();
        assert_eq!(absent.courier_id, None);

        let cleared: OrderPatch = serde_json::from_str(r#"{"courier_id":null}"#).unwrap();
        assert_eq!(cleared.courier_id, Some(None));

        let id = Uuid::from_u128(7);
        let set: OrderPatch =
            serde_json::from_str(&format!(r#"{{"courier_id":"{id}"}}"#)).unwrap();
        assert_eq!(set.courier_id, Some(Some(id)));
    }

    #[test]
    fn patch_parses_and_clears_delivery_date() {
        let set: OrderPatch = serde_json::from_str(r#"{"delivery_date":"2024-05-17"}"#).unwrap();
        assert_eq!(
            set.delivery_date,
            Some(NaiveDate::from_ymd_opt(2024, 5, 17))
        );

        let cleared: OrderPatch = serde_json::from_str(r#"{"delivery_date":null}"#).unwrap();
        assert_eq!(cleared.delivery_date, Some(None));
        assert_eq!(cleared.courier_id, None);
    }
}
