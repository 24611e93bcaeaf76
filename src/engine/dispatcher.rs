//! Order/courier assignment state machine.
//!
//! Every mutating operation runs under one write lock and applies its writes
//! as a saga: couriers are reserved before the order row changes, released
//! after it, and on failure the writes already made are undone in reverse
//! order before the error is returned. Each write carries the row version
//! read at the start of the operation.
//!
//! A write whose reply times out may still have reached the store. Before
//! unwinding, the dispatcher re-reads the row: if the version moved, the
//! write is recorded like any other; if it did not, the row is fenced with
//! an empty write so the late one can no longer apply. When neither can be
//! established the caller gets `RollbackFailed`.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::engine::audit::{self, Violation};
use crate::engine::transition::{self, CourierMoves};
use crate::error::DispatchError;
use crate::models::courier::{Courier, NewCourier};
use crate::models::event::DispatchEvent;
use crate::models::order::{NewOrder, Order, OrderPatch, OrderStatus};
use crate::observability::metrics::Metrics;
use crate::store::{CourierFields, CourierStore, OrderFields, OrderStore, StoreError};

/// The order an operation left behind plus every courier it wrote.
#[derive(Debug, Clone, Serialize)]
pub struct Dispatched {
    pub order: Order,
    pub couriers: Vec<Courier>,
}

enum Undo {
    Courier { id: Uuid, available: bool, version: u64 },
    Order { previous: Order, version: u64 },
    Inserted { id: Uuid },
    Deleted { previous: Order },
}

#[derive(Default)]
struct Saga {
    steps: Vec<Undo>,
    unresolved: Option<StoreError>,
}

impl Saga {
    fn record(&mut self, undo: Undo) {
        self.steps.push(undo);
    }

    /// A timed-out write whose effect could not be determined.
    fn unresolved(&mut self, err: StoreError) {
        self.unresolved.get_or_insert(err);
    }
}

pub struct Dispatcher {
    orders: Arc<dyn OrderStore>,
    couriers: Arc<dyn CourierStore>,
    store_timeout: Duration,
    write_lock: Mutex<()>,
    events_tx: broadcast::Sender<DispatchEvent>,
    metrics: Metrics,
}

impl Dispatcher {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        couriers: Arc<dyn CourierStore>,
        store_timeout: Duration,
        event_buffer_size: usize,
        metrics: Metrics,
    ) -> Self {
        let (events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            orders,
            couriers,
            store_timeout,
            write_lock: Mutex::new(()),
            events_tx,
            metrics,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DispatchEvent> {
        self.events_tx.subscribe()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub async fn create_courier(&self, new: NewCourier) -> Result<Courier, DispatchError> {
        let start = Instant::now();
        let result: Result<Courier, DispatchError> = async {
            let name = required("name", &new.name)?;
            let now = Utc::now();
            let courier = Courier {
                id: Uuid::new_v4(),
                name,
                phone: new.phone.trim().to_string(),
                email: new.email.trim().to_string(),
                available: true,
                created_at: now,
                updated_at: now,
                version: 1,
            };

            let courier = self.bounded(self.couriers.insert_courier(courier)).await?;
            info!(courier_id = %courier.id, "courier created");
            self.publish(DispatchEvent::CourierChanged(courier.clone()));
            Ok(courier)
        }
        .await;

        self.finish("create_courier", start, &result);
        if result.is_ok() {
            self.refresh_courier_gauge().await;
        }
        result
    }

    pub async fn create_order(&self, new: NewOrder) -> Result<Dispatched, DispatchError> {
        let start = Instant::now();
        let result: Result<Dispatched, DispatchError> = async {
            let client_name = required("client_name", &new.client_name)?;
            let address = required("address", &new.address)?;

            let _guard = self.write_lock.lock().await;

            let reserve = match new.courier_id {
                Some(courier_id) => Some(self.available_courier(courier_id, None).await?),
                None => None,
            };

            let now = Utc::now();
            let order = Order {
                id: Uuid::new_v4(),
                client_name,
                address,
                description: new.description.trim().to_string(),
                status: if reserve.is_some() {
                    OrderStatus::InTransit
                } else {
                    OrderStatus::Pending
                },
                courier_id: new.courier_id,
                delivery_date: new.delivery_date,
                created_at: now,
                updated_at: now,
                version: 1,
            };

            let mut saga = Saga::default();
            let inserted = self.insert_with_courier(&mut saga, order, reserve).await;
            let outcome = match inserted {
                Ok(outcome) => outcome,
                Err(cause) => return Err(self.unwind(saga, cause).await),
            };

            info!(
                order_id = %outcome.order.id,
                status = %outcome.order.status,
                courier_id = ?outcome.order.courier_id,
                "order created"
            );
            Ok(outcome)
        }
        .await;

        self.conclude("create_order", start, result, changed).await
    }

    /// Puts `courier_id` on the order and moves it to `InTransit`. The
    /// previous courier, if any, is freed.
    pub async fn assign_courier(
        &self,
        order_id: Uuid,
        courier_id: Uuid,
    ) -> Result<Dispatched, DispatchError> {
        let start = Instant::now();
        let result: Result<Dispatched, DispatchError> = async {
            let _guard = self.write_lock.lock().await;

            let order = self.load_order(order_id).await?;
            transition::check_assign(&order)?;
            let courier = self.load_courier(courier_id).await?;

            if order.courier_id == Some(courier_id) && order.status == OrderStatus::InTransit {
                debug!(%order_id, %courier_id, "courier already assigned");
                return Ok(Dispatched {
                    order,
                    couriers: Vec::new(),
                });
            }

            if !courier.available && order.courier_id != Some(courier_id) {
                warn!(%order_id, %courier_id, "courier unavailable for assignment");
                return Err(DispatchError::CourierUnavailable(courier_id));
            }

            let fields = OrderFields {
                status: Some(OrderStatus::InTransit),
                courier_id: Some(Some(courier_id)),
                ..OrderFields::default()
            };

            let outcome = self.commit(order, fields, Some(courier)).await?;
            info!(%order_id, %courier_id, "courier assigned");
            Ok(outcome)
        }
        .await;

        self.conclude("assign_courier", start, result, changed).await
    }

    /// Forward-only status change used during normal operation.
    pub async fn change_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Dispatched, DispatchError> {
        let start = Instant::now();
        let result: Result<Dispatched, DispatchError> = async {
            let _guard = self.write_lock.lock().await;

            let order = self.load_order(order_id).await?;
            if let Err(err) = transition::check_forward(&order, status) {
                warn!(
                    %order_id,
                    from = %order.status,
                    to = %status,
                    error = %err,
                    "status change rejected"
                );
                return Err(err);
            }

            let from = order.status;
            let fields = OrderFields {
                status: Some(status),
                ..OrderFields::default()
            };

            let outcome = self.commit(order, fields, None).await?;
            info!(%order_id, %from, to = %status, "order status changed");
            Ok(outcome)
        }
        .await;

        self.conclude("change_status", start, result, changed).await
    }

    /// Administrative edit: any status, any courier, with the same courier
    /// bookkeeping as assignment but without forcing `InTransit`.
    pub async fn edit_order(
        &self,
        order_id: Uuid,
        patch: OrderPatch,
    ) -> Result<Dispatched, DispatchError> {
        let start = Instant::now();
        let result: Result<Dispatched, DispatchError> = async {
            let client_name = patch
                .client_name
                .as_deref()
                .map(|value| required("client_name", value))
                .transpose()?;
            let address = patch
                .address
                .as_deref()
                .map(|value| required("address", value))
                .transpose()?;

            let _guard = self.write_lock.lock().await;

            let order = self.load_order(order_id).await?;
            let status = patch.status.unwrap_or(order.status);
            transition::check_edit(&order, status)?;

            let fields = OrderFields {
                client_name,
                address,
                description: patch.description.map(|value| value.trim().to_string()),
                status: patch.status,
                courier_id: patch.courier_id,
                delivery_date: patch.delivery_date,
            };

            let mut preview = order.clone();
            fields.clone().apply(&mut preview);
            transition::check_courier_present(&preview)?;

            // A courier named on a terminal edit is not reserved, but it still
            // has to be free or already on the order.
            let moves = transition::courier_moves(Some(&order), Some(&preview));
            let reserve = match moves.reserve {
                Some(courier_id) => Some(self.available_courier(courier_id, Some(&order)).await?),
                None => {
                    if let Some(Some(courier_id)) = patch.courier_id {
                        self.available_courier(courier_id, Some(&order)).await?;
                    }
                    None
                }
            };

            let outcome = self.commit(order, fields, reserve).await?;
            info!(
                %order_id,
                status = %outcome.order.status,
                courier_id = ?outcome.order.courier_id,
                "order edited"
            );
            Ok(outcome)
        }
        .await;

        self.conclude("edit_order", start, result, changed).await
    }

    /// Removes an order. An active order's courier is freed once the row is
    /// gone.
    pub async fn delete_order(&self, order_id: Uuid) -> Result<Dispatched, DispatchError> {
        let start = Instant::now();
        let result: Result<Dispatched, DispatchError> = async {
            let _guard = self.write_lock.lock().await;

            let order = self.load_order(order_id).await?;
            let moves = transition::courier_moves(Some(&order), None);

            let mut saga = Saga::default();
            let removed = self.remove_with_courier(&mut saga, order, moves).await;
            let outcome = match removed {
                Ok(outcome) => outcome,
                Err(cause) => return Err(self.unwind(saga, cause).await),
            };

            info!(%order_id, "order deleted");
            Ok(outcome)
        }
        .await;

        self.conclude("delete_order", start, result, deleted).await
    }

    /// Removes a courier that no active order holds.
    pub async fn delete_courier(&self, courier_id: Uuid) -> Result<(), DispatchError> {
        let start = Instant::now();
        let result: Result<(), DispatchError> = async {
            let _guard = self.write_lock.lock().await;

            self.load_courier(courier_id).await?;
            let orders = self.bounded(self.orders.list_orders()).await?;
            if orders
                .iter()
                .any(|order| order.held_courier() == Some(courier_id))
            {
                warn!(%courier_id, "courier still assigned; refusing delete");
                return Err(DispatchError::CourierInUse(courier_id));
            }

            self.bounded(self.couriers.delete_courier(courier_id))
                .await
                .map_err(|err| courier_not_found(courier_id, err))?;
            self.publish(DispatchEvent::CourierDeleted { id: courier_id });
            info!(%courier_id, "courier deleted");
            Ok(())
        }
        .await;

        self.finish("delete_courier", start, &result);
        if result.is_ok() {
            self.refresh_courier_gauge().await;
        }
        result
    }

    pub async fn order(&self, order_id: Uuid) -> Result<Order, DispatchError> {
        self.load_order(order_id).await
    }

    /// Pending and in-transit orders, newest first.
    pub async fn active_orders(&self) -> Result<Vec<Order>, DispatchError> {
        self.orders_where(OrderStatus::is_active).await
    }

    /// Delivered and cancelled orders, newest first.
    pub async fn archived_orders(&self) -> Result<Vec<Order>, DispatchError> {
        self.orders_where(OrderStatus::is_terminal).await
    }

    /// Every courier, newest first.
    pub async fn couriers(&self) -> Result<Vec<Courier>, DispatchError> {
        let mut couriers = self.bounded(self.couriers.list_couriers()).await?;
        couriers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(couriers)
    }

    /// Couriers that may be picked for the order: the available ones plus
    /// the courier it already has.
    pub async fn assignable_couriers(&self, order_id: Uuid) -> Result<Vec<Courier>, DispatchError> {
        let order = self.load_order(order_id).await?;
        let couriers = self.couriers().await?;

        Ok(couriers
            .into_iter()
            .filter(|courier| courier.available || order.courier_id == Some(courier.id))
            .collect())
    }

    pub async fn audit(&self) -> Result<Vec<Violation>, DispatchError> {
        let orders = self.bounded(self.orders.list_orders()).await?;
        let couriers = self.bounded(self.couriers.list_couriers()).await?;
        Ok(audit::audit(&orders, &couriers))
    }

    async fn orders_where(
        &self,
        keep: impl Fn(OrderStatus) -> bool,
    ) -> Result<Vec<Order>, DispatchError> {
        let mut orders: Vec<Order> = self
            .bounded(self.orders.list_orders())
            .await?
            .into_iter()
            .filter(|order| keep(order.status))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(orders)
    }

    /// Applies `fields` to `order` and the courier writes they imply. The
    /// caller has already validated the change and, when a courier becomes
    /// held, passes it as `reserve`.
    async fn commit(
        &self,
        order: Order,
        fields: OrderFields,
        reserve: Option<Courier>,
    ) -> Result<Dispatched, DispatchError> {
        let mut preview = order.clone();
        fields.clone().apply(&mut preview);
        let moves = transition::courier_moves(Some(&order), Some(&preview));

        let mut saga = Saga::default();
        let applied = self
            .apply_update(&mut saga, order, fields, moves, reserve)
            .await;
        match applied {
            Ok(outcome) => Ok(outcome),
            Err(cause) => Err(self.unwind(saga, cause).await),
        }
    }

    async fn apply_update(
        &self,
        saga: &mut Saga,
        order: Order,
        fields: OrderFields,
        moves: CourierMoves,
        reserve: Option<Courier>,
    ) -> Result<Dispatched, StoreError> {
        let mut touched = Vec::new();

        if let Some(courier) = reserve.filter(|c| moves.reserve == Some(c.id)) {
            touched.push(self.set_available(saga, &courier, false).await?);
        }

        let updated = self.write_order(saga, order, fields).await?;

        if let Some(courier_id) = moves.release {
            if let Some(courier) = self.release(saga, courier_id).await? {
                touched.push(courier);
            }
        }

        Ok(Dispatched {
            order: updated,
            couriers: touched,
        })
    }

    async fn insert_with_courier(
        &self,
        saga: &mut Saga,
        order: Order,
        reserve: Option<Courier>,
    ) -> Result<Dispatched, StoreError> {
        let mut touched = Vec::new();

        if let Some(courier) = reserve {
            touched.push(self.set_available(saga, &courier, false).await?);
        }

        let id = order.id;
        let inserted = match self.bounded(self.orders.insert_order(order)).await {
            Ok(inserted) => inserted,
            Err(StoreError::Timeout(after)) => {
                match self.bounded(self.orders.get_order(id)).await {
                    Ok(_) => saga.record(Undo::Inserted { id }),
                    Err(StoreError::NotFound(_)) => saga.unresolved(unknown_outcome(id)),
                    Err(err) => saga.unresolved(err),
                }
                return Err(StoreError::Timeout(after));
            }
            Err(err) => return Err(err),
        };
        saga.record(Undo::Inserted { id });

        Ok(Dispatched {
            order: inserted,
            couriers: touched,
        })
    }

    async fn remove_with_courier(
        &self,
        saga: &mut Saga,
        order: Order,
        moves: CourierMoves,
    ) -> Result<Dispatched, StoreError> {
        match self.bounded(self.orders.delete_order(order.id)).await {
            Ok(()) => {}
            Err(StoreError::Timeout(after)) => {
                match self.bounded(self.orders.get_order(order.id)).await {
                    Err(StoreError::NotFound(_)) => saga.record(Undo::Deleted { previous: order }),
                    Ok(_) => saga.unresolved(unknown_outcome(order.id)),
                    Err(err) => saga.unresolved(err),
                }
                return Err(StoreError::Timeout(after));
            }
            Err(err) => return Err(err),
        }
        saga.record(Undo::Deleted {
            previous: order.clone(),
        });

        let mut touched = Vec::new();
        if let Some(courier_id) = moves.release {
            if let Some(courier) = self.release(saga, courier_id).await? {
                touched.push(courier);
            }
        }

        Ok(Dispatched {
            order,
            couriers: touched,
        })
    }

    async fn write_order(
        &self,
        saga: &mut Saga,
        order: Order,
        fields: OrderFields,
    ) -> Result<Order, StoreError> {
        let written = self
            .bounded(self.orders.update_order(order.id, fields, Some(order.version)))
            .await;

        match written {
            Ok(updated) => {
                saga.record(Undo::Order {
                    version: updated.version,
                    previous: order,
                });
                Ok(updated)
            }
            Err(StoreError::Timeout(after)) => {
                match self.settle_order(order.id, order.version).await {
                    Ok(Some(version)) => saga.record(Undo::Order {
                        previous: order,
                        version,
                    }),
                    Ok(None) => {}
                    Err(err) => saga.unresolved(err),
                }
                Err(StoreError::Timeout(after))
            }
            Err(err) => Err(err),
        }
    }

    async fn set_available(
        &self,
        saga: &mut Saga,
        courier: &Courier,
        available: bool,
    ) -> Result<Courier, StoreError> {
        let written = self
            .bounded(self.couriers.update_courier(
                courier.id,
                CourierFields::availability(available),
                Some(courier.version),
            ))
            .await;

        match written {
            Ok(updated) => {
                saga.record(Undo::Courier {
                    id: courier.id,
                    available: courier.available,
                    version: updated.version,
                });
                Ok(updated)
            }
            Err(StoreError::Timeout(after)) => {
                match self.settle_courier(courier.id, courier.version).await {
                    Ok(Some(version)) => saga.record(Undo::Courier {
                        id: courier.id,
                        available: courier.available,
                        version,
                    }),
                    Ok(None) => {}
                    Err(err) => saga.unresolved(err),
                }
                Err(StoreError::Timeout(after))
            }
            Err(err) => Err(err),
        }
    }

    /// Finds out whether a timed-out order write landed. Returns the version
    /// it produced, or `None` once it can no longer apply.
    async fn settle_order(&self, id: Uuid, expected: u64) -> Result<Option<u64>, StoreError> {
        let current = self.bounded(self.orders.get_order(id)).await?;
        if current.version != expected {
            warn!(order_id = %id, version = current.version, "timed-out write landed");
            return Ok(Some(current.version));
        }

        let fence = self
            .bounded(self.orders.update_order(id, OrderFields::default(), Some(expected)))
            .await;
        match fence {
            Ok(_) => Ok(None),
            Err(StoreError::VersionConflict { actual, .. }) => Ok(Some(actual)),
            Err(err) => Err(err),
        }
    }

    async fn settle_courier(&self, id: Uuid, expected: u64) -> Result<Option<u64>, StoreError> {
        let current = self.bounded(self.couriers.get_courier(id)).await?;
        if current.version != expected {
            warn!(courier_id = %id, version = current.version, "timed-out write landed");
            return Ok(Some(current.version));
        }

        let fence = self
            .bounded(self.couriers.update_courier(id, CourierFields::default(), Some(expected)))
            .await;
        match fence {
            Ok(_) => Ok(None),
            Err(StoreError::VersionConflict { actual, .. }) => Ok(Some(actual)),
            Err(err) => Err(err),
        }
    }

    // A courier that no longer exists has nothing to free.
    async fn release(
        &self,
        saga: &mut Saga,
        courier_id: Uuid,
    ) -> Result<Option<Courier>, StoreError> {
        let courier = match self.bounded(self.couriers.get_courier(courier_id)).await {
            Ok(courier) => courier,
            Err(StoreError::NotFound(_)) => {
                warn!(%courier_id, "released courier no longer exists");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        self.set_available(saga, &courier, true).await.map(Some)
    }

    /// Reverts recorded writes, newest first. Keeps going past a failed
    /// step so as much state as possible is restored.
    async fn unwind(&self, saga: Saga, cause: StoreError) -> DispatchError {
        let Saga { steps, unresolved } = saga;
        if steps.is_empty() && unresolved.is_none() {
            return DispatchError::Store(cause);
        }

        warn!(error = %cause, steps = steps.len(), "rolling back partial dispatch");
        if let Some(err) = &unresolved {
            error!(error = %err, cause = %cause, "could not settle timed-out write");
        }
        let mut first_failure = unresolved;

        for step in steps.into_iter().rev() {
            let reverted = match step {
                Undo::Courier {
                    id,
                    available,
                    version,
                } => self
                    .bounded(self.couriers.update_courier(
                        id,
                        CourierFields::availability(available),
                        Some(version),
                    ))
                    .await
                    .map(|_| ()),
                Undo::Order { previous, version } => self
                    .bounded(self.orders.update_order(
                        previous.id,
                        OrderFields::restore(&previous),
                        Some(version),
                    ))
                    .await
                    .map(|_| ()),
                Undo::Inserted { id } => self.bounded(self.orders.delete_order(id)).await,
                Undo::Deleted { previous } => self
                    .bounded(self.orders.insert_order(previous))
                    .await
                    .map(|_| ()),
            };

            if let Err(err) = reverted {
                error!(error = %err, cause = %cause, "rollback step failed");
                first_failure.get_or_insert(err);
            }
        }

        match first_failure {
            None => {
                self.metrics.rollbacks_total.with_label_values(&["ok"]).inc();
                DispatchError::Store(cause)
            }
            Some(rollback) => {
                self.metrics
                    .rollbacks_total
                    .with_label_values(&["failed"])
                    .inc();
                DispatchError::RollbackFailed { cause, rollback }
            }
        }
    }

    async fn load_order(&self, order_id: Uuid) -> Result<Order, DispatchError> {
        self.bounded(self.orders.get_order(order_id))
            .await
            .map_err(|err| match err {
                StoreError::NotFound(_) => DispatchError::OrderNotFound(order_id),
                other => DispatchError::Store(other),
            })
    }

    async fn load_courier(&self, courier_id: Uuid) -> Result<Courier, DispatchError> {
        self.bounded(self.couriers.get_courier(courier_id))
            .await
            .map_err(|err| courier_not_found(courier_id, err))
    }

    /// Loads a courier that is about to become held. It must be free unless
    /// `order` already names it.
    async fn available_courier(
        &self,
        courier_id: Uuid,
        order: Option<&Order>,
    ) -> Result<Courier, DispatchError> {
        let courier = self.load_courier(courier_id).await?;
        let current = order.and_then(|order| order.courier_id) == Some(courier_id);

        if !courier.available && !current {
            warn!(%courier_id, "courier unavailable");
            return Err(DispatchError::CourierUnavailable(courier_id));
        }
        Ok(courier)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.store_timeout))?
    }

    fn publish(&self, event: DispatchEvent) {
        let _ = self.events_tx.send(event);
    }

    fn finish<T>(&self, operation: &str, start: Instant, result: &Result<T, DispatchError>) {
        let outcome = match result {
            Ok(_) => "success",
            Err(DispatchError::Store(_) | DispatchError::RollbackFailed { .. }) => "error",
            Err(_) => "rejected",
        };
        self.metrics
            .observe(operation, outcome, start.elapsed().as_secs_f64());

        if let Err(err) = result {
            debug!(operation, error = %err, "dispatch operation failed");
        }
    }

    async fn conclude(
        &self,
        operation: &str,
        start: Instant,
        result: Result<Dispatched, DispatchError>,
        order_event: fn(&Order) -> DispatchEvent,
    ) -> Result<Dispatched, DispatchError> {
        self.finish(operation, start, &result);

        if let Ok(outcome) = &result {
            self.publish(order_event(&outcome.order));
            for courier in &outcome.couriers {
                self.publish(DispatchEvent::CourierChanged(courier.clone()));
            }
            if !outcome.couriers.is_empty() {
                self.refresh_courier_gauge().await;
            }
        }

        result
    }

    async fn refresh_courier_gauge(&self) {
        match self.bounded(self.couriers.list_couriers()).await {
            Ok(couriers) => {
                let available = couriers.iter().filter(|c| c.available).count();
                self.metrics.couriers_available.set(available as i64);
            }
            Err(err) => warn!(error = %err, "failed to refresh courier gauge"),
        }
    }
}

fn changed(order: &Order) -> DispatchEvent {
    DispatchEvent::OrderChanged(order.clone())
}

fn deleted(order: &Order) -> DispatchEvent {
    DispatchEvent::OrderDeleted { id: order.id }
}

fn required(field: &str, value: &str) -> Result<String, DispatchError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DispatchError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn unknown_outcome(id: Uuid) -> StoreError {
    StoreError::Backend(format!("outcome of timed-out write to {id} is unknown"))
}

fn courier_not_found(courier_id: Uuid, err: StoreError) -> DispatchError {
    match err {
        StoreError::NotFound(_) => DispatchError::CourierNotFound(courier_id),
        other => DispatchError::Store(other),
    }
}
