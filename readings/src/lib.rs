//! Telemetry readings service.
//!
//! Sensor clients POST temperature/humidity readings to `/api/dados` and
//! consumers GET newest-first, device-filtered, size-capped pages of them.
//! All request handling lives in [`service::ReadingsService`]; the HTTP
//! server (`readings`) and the single-invocation entry point
//! (`readings-invoke`) are thin adapters around it.

pub mod config;
pub mod connection;
pub mod cors;
pub mod errors;
pub mod metrics;
pub mod model;
pub mod response;
pub mod rest;
pub mod service;
pub mod store;
pub mod validate;

use config::Config;
use connection::ConnectionManager;
use service::ReadingsService;
use std::sync::Arc;
use store::mongo::MongoConnector;

/// Builds the service backed by MongoDB. No connection is opened here.
pub fn build_service(config: &Config) -> ReadingsService {
    let connector = MongoConnector::new(
        config.mongodb_database.clone(),
        config.mongodb_collection.clone(),
    );
    let connection = ConnectionManager::new(config.mongodb_uri.clone(), Arc::new(connector));
    ReadingsService::new(connection, config.max_limit)
}

/// Installs the `tracing` subscriber, honouring `RUST_LOG` (default `info`).
pub fn init_tracing(to_stderr: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if to_stderr {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder.init();
    }
}
