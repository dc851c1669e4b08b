//! Persistence seam for readings.
//!
//! The service only needs create, find and count. `Connector` produces a
//! store from a connection string so the connection manager can defer the
//! connect until the first request that touches the store.

pub mod memory;
pub mod mongo;

use crate::errors::Result;
use crate::model::{NewReading, Reading, ReadingFilter};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Persists one reading and returns its store-assigned id.
    async fn insert(&self, reading: NewReading) -> Result<String>;

    /// Matching readings, newest timestamp first, at most `limit` of them.
    async fn find_latest(&self, filter: &ReadingFilter, limit: u32) -> Result<Vec<Reading>>;

    /// Size of the whole matching population, independent of any page size.
    async fn count(&self, filter: &ReadingFilter) -> Result<u64>;
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, uri: &str) -> Result<Arc<dyn ReadingStore>>;
}
