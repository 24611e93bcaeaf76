use std::sync::Arc;
use std::time::Duration;

use crate::engine::Dispatcher;
use crate::observability::metrics::Metrics;
use crate::store::{CourierStore, OrderStore};

pub struct AppState {
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        couriers: Arc<dyn CourierStore>,
        store_timeout: Duration,
        event_buffer_size: usize,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(
                orders,
                couriers,
                store_timeout,
                event_buffer_size,
                Metrics::new(),
            ),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        self.dispatcher.metrics()
    }
}
