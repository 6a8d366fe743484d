//! Service middleware for request ids, metrics, and access logging.
//!
//! ## Metrics Logged
//!
//! Metrics are emitted as `tracing` events under the `boring_booking::metrics`
//! target so they can be aggregated from logs:
//!
//! - `request_metric`: path pattern, method, status, latency
//! - `booking_metric`: booking outcome and seat count

use std::sync::OnceLock;
use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use regex_lite::Regex;
use tracing::{info, info_span, Instrument};

/// Header carrying the request correlation id.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id of the current request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Assign a correlation id and log request completion.
///
/// Reuses an incoming `X-Request-Id` header or generates a UUID, exposes it to
/// handlers as a [`RequestId`] extension, and echoes it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let method = request.method().clone();
    let uri = request.uri().path().to_string();
    request.extensions_mut().insert(RequestId(request_id.clone()));

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %uri,
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    );

    let mut response = next.run(request).instrument(span.clone()).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();
    span.record("status", status);
    span.record("latency_ms", latency.as_millis() as u64);

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    }

    info!(
        target: "boring_booking::access",
        request_id = %request_id,
        method = %method,
        path = %uri,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "request completed"
    );

    response
}

/// Metrics middleware that records request counts and latency.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    info!(
        target: "boring_booking::metrics",
        metric_type = "request",
        path = %path,
        method = %method,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "request_metric"
    );

    response
}

/// Normalize path for metrics to avoid high cardinality.
///
/// Movie and theater names in the path become `:name`.
fn normalize_path(path: &str) -> String {
    static NAME_SEGMENTS: OnceLock<Regex> = OnceLock::new();
    static SHOWING_SEGMENTS: OnceLock<Regex> = OnceLock::new();

    let showing = SHOWING_SEGMENTS.get_or_init(|| {
        Regex::new(r"^/api/showings/[^/]+/[^/]+").expect("valid showing path pattern")
    });
    let named = NAME_SEGMENTS.get_or_init(|| {
        Regex::new(r"^/api/(movies|theaters)/[^/]+").expect("valid name path pattern")
    });

    let path = showing.replace(path, "/api/showings/:name/:name");
    named.replace(&path, "/api/$1/:name").to_string()
}

/// Record the outcome of a booking attempt.
///
/// `outcome` is `booked`, `conflict`, `not_found`, or `invalid_argument`.
pub fn record_booking_outcome(outcome: &str, seat_count: u32) {
    info!(
        target: "boring_booking::metrics",
        metric_type = "booking",
        outcome = outcome,
        seat_count = seat_count,
        "booking_metric"
    );
}
