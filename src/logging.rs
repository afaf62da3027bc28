//! Middleware for logging requests and responses.

use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::Level;

use crate::Error;

/// The number of bytes of a body to include in the debug logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest request body, in bytes, that will be buffered for logging.
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Log the method, URI, status and latency of each request.
///
/// The log level follows the status: `error` for 5xx, `warn` for 4xx and
/// `info` otherwise. When `debug` is enabled the first
/// [LOG_BODY_LENGTH_LIMIT] bytes of JSON request and response bodies are
/// logged too.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let log_bodies = tracing::enabled!(Level::DEBUG);

    let request = if log_bodies && is_json(request.headers()) {
        let (parts, body) = request.into_parts();
        let bytes = match axum::body::to_bytes(body, MAX_BODY_SIZE).await {
            Ok(bytes) => bytes,
            Err(error) => return Error::RequestBody(error.to_string()).into_response(),
        };
        tracing::debug!("Request body: {}", truncate(&bytes));
        Request::from_parts(parts, Body::from(bytes))
    } else {
        request
    };

    let response = next.run(request).await;

    let response = if log_bodies && is_json(response.headers()) {
        let (parts, body) = response.into_parts();
        let bytes = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(error) => return Error::ResponseBody(error.to_string()).into_response(),
        };
        tracing::debug!("Response body: {}", truncate(&bytes));
        Response::from_parts(parts, Body::from(bytes))
    } else {
        response
    };

    log_response(&method, &uri, response.status(), start);

    response
}

fn log_response(
    method: &axum::http::Method,
    uri: &axum::http::Uri,
    status: StatusCode,
    start: Instant,
) {
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    if status.is_server_error() {
        tracing::error!("{method} {uri} -> {status} ({elapsed_ms:.1} ms)");
    } else if status.is_client_error() {
        tracing::warn!("{method} {uri} -> {status} ({elapsed_ms:.1} ms)");
    } else {
        tracing::info!("{method} {uri} -> {status} ({elapsed_ms:.1} ms)");
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.contains("json"))
}

fn truncate(body: &[u8]) -> String {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        format!(
            "{}...",
            String::from_utf8_lossy(&body[..LOG_BODY_LENGTH_LIMIT])
        )
    } else {
        String::from_utf8_lossy(body).to_string()
    }
}
