//! Permissive CORS policy shared by both adapters.

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];
pub const ALLOWED_HEADERS: [HeaderName; 1] = [header::CONTENT_TYPE];

pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
}

/// The same policy as plain response headers, for adapters without middleware.
pub fn headers() -> Vec<(HeaderName, HeaderValue)> {
    let methods = joined(ALLOWED_METHODS.iter().map(Method::as_str));
    let allowed_headers = joined(ALLOWED_HEADERS.iter().map(HeaderName::as_str));

    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, Some(HeaderValue::from_static("*"))),
        (header::ACCESS_CONTROL_ALLOW_METHODS, methods),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, allowed_headers),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|value| (name, value)))
    .collect()
}

fn joined<'a>(items: impl Iterator<Item = &'a str>) -> Option<HeaderValue> {
    HeaderValue::from_str(&items.collect::<Vec<_>>().join(", ")).ok()
}
