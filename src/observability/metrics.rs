use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub operations_total: IntCounterVec,
    pub operation_latency_seconds: HistogramVec,
    pub rollbacks_total: IntCounterVec,
    pub couriers_available: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let operations_total = IntCounterVec::new(
            Opts::new(
                "dispatch_operations_total",
                "Dispatch operations by operation and outcome",
            ),
            &["operation", "outcome"],
        )
        .expect("valid dispatch_operations_total metric");

        let operation_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "dispatch_operation_latency_seconds",
                "Latency of dispatch operations in seconds",
            ),
            &["operation"],
        )
        .expect("valid dispatch_operation_latency_seconds metric");

        let rollbacks_total = IntCounterVec::new(
            Opts::new(
                "dispatch_rollbacks_total",
                "Compensating rollbacks by outcome",
            ),
            &["outcome"],
        )
        .expect("valid dispatch_rollbacks_total metric");

        let couriers_available =
            IntGauge::new("couriers_available", "Couriers currently available")
                .expect("valid couriers_available metric");

        registry
            .register(Box::new(operations_total.clone()))
            .expect("register dispatch_operations_total");
        registry
            .register(Box::new(operation_latency_seconds.clone()))
            .expect("register dispatch_operation_latency_seconds");
        registry
            .register(Box::new(rollbacks_total.clone()))
            .expect("register dispatch_rollbacks_total");
        registry
            .register(Box::new(couriers_available.clone()))
            .expect("register couriers_available");

        Self {
            registry,
            operations_total,
            operation_latency_seconds,
            rollbacks_total,
            couriers_available,
        }
    }

    pub fn observe(&self, operation: &str, outcome: &str, elapsed_seconds: f64) {
        self.operations_total
            .with_label_values(&[operation, outcome])
            .inc();
        self.operation_latency_seconds
            .with_label_values(&[operation])
            .observe(elapsed_seconds);
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
