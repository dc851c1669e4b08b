use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref READINGS_CREATED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "readings_created_total",
        "Total readings persisted"
    ))
    .expect("valid metric");
    pub static ref QUERIES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "readings_queries_total",
        "Total reading queries served"
    ))
    .expect("valid metric");
    pub static ref VALIDATION_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "readings_validation_failures_total",
        "Total requests rejected by validation"
    ))
    .expect("valid metric");
    pub static ref STORE_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "readings_store_failures_total",
        "Total failed store operations, connects included"
    ))
    .expect("valid metric");
    pub static ref CONNECT_ATTEMPTS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "readings_connect_attempts_total",
        "Total attempts to connect to the document store"
    ))
    .expect("valid metric");
    pub static ref STORE_LATENCY_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "readings_store_latency_seconds",
            "Time spent in store operations per request"
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0
        ])
    )
    .expect("valid metric");
}

pub fn init_metrics() -> prometheus::Result<()> {
    REGISTRY.register(Box::new(READINGS_CREATED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(QUERIES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(VALIDATION_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(STORE_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CONNECT_ATTEMPTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(STORE_LATENCY_SECONDS.clone()))?;
    Ok(())
}

pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
