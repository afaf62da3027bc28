//! Deduplication of retried write requests.
//!
//! Clients send an `Idempotency-Key` header with `POST`, `PUT` and `PATCH`
//! requests. The first response for a key is stored for a fixed TTL and
//! replayed for any later request with the same key.

mod cache;
mod middleware;

pub use cache::{CacheStatus, IdempotencyCache, IdempotencyConfig, Intercepted, StoredResponse};
pub use middleware::{IDEMPOTENCY_CACHE, IDEMPOTENCY_KEY, IdempotencyKey, idempotency_middleware};
