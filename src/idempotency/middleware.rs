//! Middleware that routes write requests through the [IdempotencyCache].

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderName, HeaderValue, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Error as HeaderError, Header, HeaderMapExt};

use crate::Error;

use super::cache::{CacheStatus, IdempotencyCache, Intercepted, StoredResponse};

/// The request header carrying the client's idempotency key.
pub static IDEMPOTENCY_KEY: HeaderName = HeaderName::from_static("idempotency-key");
/// The response header that reports whether a response was replayed.
pub static IDEMPOTENCY_CACHE: HeaderName = HeaderName::from_static("idempotency-cache");

/// `TypedHeader` for the `Idempotency-Key` request header.
///
/// The key is an opaque, non-empty string chosen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyKey(pub String);

impl Header for IdempotencyKey {
    fn name() -> &'static HeaderName {
        &IDEMPOTENCY_KEY
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, HeaderError>
    where
        Self: Sized,
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(HeaderError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(HeaderError::invalid());
        };
        if value.is_empty() {
            return Err(HeaderError::invalid());
        }

        Ok(IdempotencyKey(value.to_owned()))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        match HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode idempotency-key header"),
        }
    }
}

/// Replay the stored response for a repeated `Idempotency-Key`.
///
/// Only requests with a key and a cached method are buffered, everything
/// else is passed straight through. Responses that went through the cache
/// carry an `Idempotency-Cache: HIT` or `Idempotency-Cache: MISS` header.
pub async fn idempotency_middleware(
    State(cache): State<Arc<IdempotencyCache>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();

    let key = match request.headers().typed_get::<IdempotencyKey>() {
        Some(IdempotencyKey(key)) if cache.applies_to(&method) => key,
        _ => return next.run(request).await,
    };

    let result = cache
        .intercept(&method, Some(&key), || async move {
            buffer_response(next.run(request).await).await
        })
        .await;

    match result {
        Ok(Intercepted { response, status }) => replay(response, status),
        Err(error) => error.into_response(),
    }
}

async fn buffer_response(response: Response) -> Result<StoredResponse, Error> {
    let (parts, body) = response.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|error| Error::ResponseBody(error.to_string()))?;

    Ok(StoredResponse {
        status: parts.status,
        content_type: parts.headers.get(CONTENT_TYPE).cloned(),
        body,
    })
}

fn replay(stored: StoredResponse, status: CacheStatus) -> Response {
    let mut response = Response::new(Body::from(stored.body));
    *response.status_mut() = stored.status;

    let headers = response.headers_mut();
    if let Some(content_type) = stored.content_type {
        headers.insert(CONTENT_TYPE, content_type);
    }
    if let Some(value) = status.header_value() {
        headers.insert(IDEMPOTENCY_CACHE.clone(), HeaderValue::from_static(value));
    }

    response
}
