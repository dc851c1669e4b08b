use crate::cors;
use crate::metrics;
use crate::model::ReadingsQuery;
use crate::response::ApiResponse;
use crate::service::{ApiRequest, ReadingsService};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::Method,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const READINGS_PATH: &str = "/api/dados";

pub fn create_router(service: Arc<ReadingsService>) -> Router {
    Router::new()
        .route(READINGS_PATH, any(readings))
        .route("/metrics", get(metrics_handler))
        .layer(cors::layer())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn readings(
    State(service): State<Arc<ReadingsService>>,
    method: Method,
    query: Result<Query<ReadingsQuery>, QueryRejection>,
    body: Bytes,
) -> Response {
    let request = match query {
        Ok(Query(query)) => ApiRequest::new(method).with_query(query),
        Err(rejection) => ApiRequest::new(method).with_invalid_query(rejection.body_text()),
    }
    .with_body(body.to_vec());

    service.handle(request).await.into_response()
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}
