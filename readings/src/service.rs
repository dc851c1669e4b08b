use crate::connection::ConnectionManager;
use crate::errors::{Error, Result};
use crate::metrics::{
    QUERIES_TOTAL, READINGS_CREATED_TOTAL, STORE_FAILURES_TOTAL, STORE_LATENCY_SECONDS,
    VALIDATION_FAILURES_TOTAL,
};
use crate::model::{CreateReading, ReadingsPage, ReadingsQuery};
use crate::response::{ApiResponse, CreatedEnvelope, ListEnvelope};
use crate::validate::{validate, validate_query};
use axum::http::{Method, StatusCode};
use tokio::time::Instant;
use tracing::{debug, error};

/// A request as seen by the service, independent of the transport that carried it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub query: ReadingsQuery,
    /// Set when the transport could not decode the query string.
    pub invalid_query: Option<String>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: ReadingsQuery::default(),
            invalid_query: None,
            body: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: ReadingsQuery) -> Self {
        self.query = query;
        self
    }

    pub fn with_invalid_query(mut self, detail: impl Into<String>) -> Self {
        self.invalid_query = Some(detail.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

pub struct ReadingsService {
    connection: ConnectionManager,
    max_limit: u32,
}

impl ReadingsService {
    pub fn new(connection: ConnectionManager, max_limit: u32) -> Self {
        Self {
            connection,
            max_limit,
        }
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Dispatches one request. Pre-flight and unsupported methods never touch the store.
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        let result = match request.method {
            Method::OPTIONS => return ApiResponse::empty(StatusCode::OK),
            Method::GET => self
                .query_request(&request)
                .await
                .map(|page| ApiResponse::json(StatusCode::OK, &ListEnvelope::from(page))),
            Method::POST => self
                .create(&request.body)
                .await
                .map(|id| ApiResponse::json(StatusCode::CREATED, &CreatedEnvelope::new(id))),
            other => Err(Error::MethodNotAllowed(other)),
        };

        result.unwrap_or_else(|e| ApiResponse::from_error(&e))
    }

    /// Validates and persists one reading, returning its id.
    pub async fn create(&self, body: &[u8]) -> Result<String> {
        let store = self.connection.ensure_connected().await?;

        let reading = parse_body(body).and_then(validate).map_err(|e| {
            VALIDATION_FAILURES_TOTAL.inc();
            debug!("Rejected reading: {}", e);
            e
        })?;

        let start = Instant::now();
        let id = store.insert(reading).await.map_err(|e| {
            STORE_FAILURES_TOTAL.inc();
            error!("Failed to store reading: {}", e);
            e
        })?;
        STORE_LATENCY_SECONDS.observe(start.elapsed().as_secs_f64());
        READINGS_CREATED_TOTAL.inc();

        debug!("Reading {} stored", id);
        Ok(id)
    }

    async fn query_request(&self, request: &ApiRequest) -> Result<ReadingsPage> {
        if let Some(detail) = &request.invalid_query {
            self.connection.ensure_connected().await?;
            VALIDATION_FAILURES_TOTAL.inc();
            return Err(Error::validation(format!(
                "Parâmetros de consulta inválidos: {}",
                detail
            )));
        }

        self.query(&request.query).await
    }

    /// Newest-first page of readings plus the uncapped matching total.
    pub async fn query(&self, query: &ReadingsQuery) -> Result<ReadingsPage> {
        let store = self.connection.ensure_connected().await?;

        let (filter, limit) = validate_query(query, self.max_limit).map_err(|e| {
            VALIDATION_FAILURES_TOTAL.inc();
            e
        })?;

        let start = Instant::now();
        let fetched = async {
            let readings = store.find_latest(&filter, limit).await?;
            let total = store.count(&filter).await?;
            Ok::<_, Error>(ReadingsPage { total, readings })
        }
        .await;

        let page = fetched.map_err(|e| {
            STORE_FAILURES_TOTAL.inc();
            error!("Failed to query readings: {}", e);
            e
        })?;
        STORE_LATENCY_SECONDS.observe(start.elapsed().as_secs_f64());
        QUERIES_TOTAL.inc();

        debug!(
            "Query device={:?} limit={} returned {}/{}",
            filter.device,
            limit,
            page.readings.len(),
            page.total
        );
        Ok(page)
    }
}

fn parse_body(body: &[u8]) -> Result<CreateReading> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateReading::default());
    }

    serde_json::from_slice(body).map_err(|e| Error::validation(format!("JSON inválido: {}", e)))
}
