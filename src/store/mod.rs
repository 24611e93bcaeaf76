//! Persistence collaborator for the dispatch engine.
//!
//! The engine only talks to the [`OrderStore`] and [`CourierStore`] traits;
//! the in-memory backend in [`memory`] is what the binary and the tests wire
//! in. Every update may carry the row version the caller read, which the
//! backend checks before writing.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::courier::Courier;
use crate::models::order::{Order, OrderStatus};

pub mod memory;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(Uuid),

    #[error("record {id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict { id: Uuid, expected: u64, actual: u64 },

    #[error("record {0} already exists")]
    Duplicate(Uuid),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Fields of an order update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFields {
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub status: Option<OrderStatus>,
    pub courier_id: Option<Option<Uuid>>,
    pub delivery_date: Option<Option<NaiveDate>>,
}

impl OrderFields {
    /// Every mutable column of `order`, used to put a row back the way it was.
    pub fn restore(order: &Order) -> Self {
        Self {
            client_name: Some(order.client_name.clone()),
            address: Some(order.address.clone()),
            description: Some(order.description.clone()),
            status: Some(order.status),
            courier_id: Some(order.courier_id),
            delivery_date: Some(order.delivery_date),
        }
    }

    pub fn apply(self, order: &mut Order) {
        if let Some(client_name) = self.client_name {
            order.client_name = client_name;
        }
        if let Some(address) = self.address {
            order.address = address;
        }
        if let Some(description) = self.description {
            order.description = description;
        }
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(courier_id) = self.courier_id {
            order.courier_id = courier_id;
        }
        if let Some(delivery_date) = self.delivery_date {
            order.delivery_date = delivery_date;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CourierFields {
    pub available: Option<bool>,
}

impl CourierFields {
    pub fn availability(available: bool) -> Self {
        Self {
            available: Some(available),
        }
    }

    pub fn apply(self, courier: &mut Courier) {
        if let Some(available) = self.available {
            courier.available = available;
        }
    }
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order(&self, order: Order) -> Result<Order, StoreError>;

    async fn get_order(&self, id: Uuid) -> Result<Order, StoreError>;

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Applies `fields` and bumps the row version. Fails with
    /// `VersionConflict` when `expected_version` is set and stale.
    async fn update_order(
        &self,
        id: Uuid,
        fields: OrderFields,
        expected_version: Option<u64>,
    ) -> Result<Order, StoreError>;

    async fn delete_order(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CourierStore: Send + Sync {
    async fn insert_courier(&self, courier: Courier) -> Result<Courier, StoreError>;

    async fn get_courier(&self, id: Uuid) -> Result<Courier, StoreError>;

    async fn list_couriers(&self) -> Result<Vec<Courier>, StoreError>;

    async fn update_courier(
        &self,
        id: Uuid,
        fields: CourierFields,
        expected_version: Option<u64>,
    ) -> Result<Courier, StoreError>;

    async fn delete_courier(&self, id: Uuid) -> Result<(), StoreError>;
}
