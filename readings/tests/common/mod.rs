#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use readings::connection::ConnectionManager;
use readings::errors::{Error, Result};
use readings::model::{NewReading, Reading, ReadingFilter};
use readings::rest::create_router;
use readings::service::ReadingsService;
use readings::store::memory::MemoryConnector;
use readings::store::{Connector, ReadingStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_URI: &str = "mongodb://localhost:27017/test";

pub struct TestApp {
    pub router: Router,
    pub connector: Arc<MemoryConnector>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_max_limit(1000)
    }

    pub fn with_max_limit(max_limit: u32) -> Self {
        let connector = Arc::new(MemoryConnector::default());
        let connection = ConnectionManager::new(Some(TEST_URI.to_string()), connector.clone());
        let service = Arc::new(ReadingsService::new(connection, max_limit));
        Self {
            router: create_router(service),
            connector,
        }
    }

    pub async fn stored(&self) -> usize {
        self.connector.store().len().await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Option<Value>) {
        send(&self.router, Method::GET, uri, None).await
    }

    pub async fn post(&self, body: Value) -> (StatusCode, Option<Value>) {
        send(&self.router, Method::POST, "/api/dados", Some(body.to_string())).await
    }
}

pub fn router_with(uri: Option<&str>, connector: Arc<dyn Connector>) -> Router {
    let connection = ConnectionManager::new(uri.map(str::to_string), connector);
    create_router(Arc::new(ReadingsService::new(connection, 1000)))
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Option<Value>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    if bytes.is_empty() {
        (status, None)
    } else {
        (status, Some(serde_json::from_slice(&bytes).unwrap()))
    }
}

/// A store whose every operation fails, as when the server goes away mid-flight.
pub struct BrokenStore;

#[async_trait]
impl ReadingStore for BrokenStore {
    async fn insert(&self, _reading: NewReading) -> Result<String> {
        Err(Error::store("connection reset by peer"))
    }

    async fn find_latest(&self, _filter: &ReadingFilter, _limit: u32) -> Result<Vec<Reading>> {
        Err(Error::store("connection reset by peer"))
    }

    async fn count(&self, _filter: &ReadingFilter) -> Result<u64> {
        Err(Error::store("connection reset by peer"))
    }
}

pub struct BrokenStoreConnector;

#[async_trait]
impl Connector for BrokenStoreConnector {
    async fn connect(&self, _uri: &str) -> Result<Arc<dyn ReadingStore>> {
        Ok(Arc::new(BrokenStore))
    }
}

pub struct UnreachableConnector;

#[async_trait]
impl Connector for UnreachableConnector {
    async fn connect(&self, _uri: &str) -> Result<Arc<dyn ReadingStore>> {
        Err(Error::connection("server selection timeout"))
    }
}
