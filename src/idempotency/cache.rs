//! The key to response map that replays write responses for retried requests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use axum::{
    body::Bytes,
    http::{HeaderValue, Method, StatusCode},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, clock::Clock};

/// Controls which requests are cached and for how long.
#[derive(Debug, Clone, PartialEq)]
pub struct IdempotencyConfig {
    /// How long a stored response is replayed for after it was first produced.
    pub ttl: Duration,
    /// The request methods that go through the cache.
    pub methods: Vec<Method>,
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(5),
            methods: vec![Method::POST, Method::PUT, Method::PATCH],
        }
    }
}

/// A fully buffered response that can be sent again byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResponse {
    /// The status code of the original response.
    pub status: StatusCode,
    /// The `Content-Type` header of the original response.
    pub content_type: Option<HeaderValue>,
    /// The complete body of the original response.
    pub body: Bytes,
}

/// How [IdempotencyCache::intercept] produced its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// A stored response was replayed and the operation did not run.
    Hit,
    /// The operation ran and its response was stored.
    Miss,
    /// The request was not eligible for caching and the operation ran.
    Bypass,
}

impl CacheStatus {
    /// The value for the `Idempotency-Cache` response header, if any.
    pub fn header_value(self) -> Option<&'static str> {
        match self {
            CacheStatus::Hit => Some("HIT"),
            CacheStatus::Miss => Some("MISS"),
            CacheStatus::Bypass => None,
        }
    }
}

/// The response from [IdempotencyCache::intercept] and how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Intercepted {
    /// The response to send to the client.
    pub response: StoredResponse,
    /// Whether the response was replayed, stored or left uncached.
    pub status: CacheStatus,
}

#[derive(Debug)]
struct CacheEntry {
    response: StoredResponse,
    created_at: OffsetDateTime,
}

/// Remembers the response to each idempotency key for one TTL window.
///
/// Entries are keyed by the idempotency key alone. Reusing a key on a
/// different endpoint replays the first response.
///
/// The map lock is not held while the operation runs, so two concurrent
/// requests with a new key may both run it. The later response is kept.
#[derive(Debug)]
pub struct IdempotencyCache {
    config: IdempotencyConfig,
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl IdempotencyCache {
    /// Create an empty cache that reads the time from `clock`.
    pub fn new(config: IdempotencyConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Whether requests with `method` go through the cache.
    pub fn applies_to(&self, method: &Method) -> bool {
        self.config.methods.contains(method)
    }

    /// Replay the stored response for `key`, or run `proceed` and store its response.
    ///
    /// Requests with a method outside the configured set, or without a key,
    /// run `proceed` without touching the cache.
    ///
    /// # Errors
    /// Returns [Error::LockPoisoned] if the map lock was poisoned, or any error
    /// returned by `proceed`. Errors from `proceed` are not stored.
    pub async fn intercept<F, Fut>(
        &self,
        method: &Method,
        key: Option<&str>,
        proceed: F,
    ) -> Result<Intercepted, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<StoredResponse, Error>>,
    {
        let key = match key {
            Some(key) if self.applies_to(method) => key,
            _ => {
                return Ok(Intercepted {
                    response: proceed().await?,
                    status: CacheStatus::Bypass,
                });
            }
        };

        if let Some(response) = self.lookup(key)? {
            tracing::debug!("Replaying cached response for idempotency key {key:?}");
            return Ok(Intercepted {
                response,
                status: CacheStatus::Hit,
            });
        }

        let response = proceed().await?;
        self.store(key, response.clone())?;
        tracing::debug!(
            "Stored {} response for idempotency key {key:?}",
            response.status
        );

        Ok(Intercepted {
            response,
            status: CacheStatus::Miss,
        })
    }

    /// Return the live entry for `key`, evicting it if it has expired.
    fn lookup(&self, key: &str) -> Result<Option<StoredResponse>, Error> {
        let now = self.clock.now();
        let mut entries = self.lock()?;

        let Some(entry) = entries.get(key) else {
            return Ok(None);
        };

        if self.is_live(entry, now) {
            return Ok(Some(entry.response.clone()));
        }

        entries.remove(key);
        Ok(None)
    }

    fn store(&self, key: &str, response: StoredResponse) -> Result<(), Error> {
        let created_at = self.clock.now();
        self.lock()?.insert(
            key.to_owned(),
            CacheEntry {
                response,
                created_at,
            },
        );
        Ok(())
    }

    /// Remove every expired entry.
    ///
    /// Lookups already ignore expired entries, this only frees their memory.
    /// Returns the number of entries removed.
    ///
    /// # Errors
    /// Returns [Error::LockPoisoned] if the map lock was poisoned.
    pub fn purge_expired(&self) -> Result<usize, Error> {
        let now = self.clock.now();
        let mut entries = self.lock()?;
        let initial_length = entries.len();

        entries.retain(|_, entry| self.is_live(entry, now));

        Ok(initial_length - entries.len())
    }

    /// Purge expired entries once every TTL, forever.
    ///
    /// Meant to be spawned as a background task next to the server.
    pub async fn sweep_expired(self: Arc<Self>) {
        let period = std::time::Duration::try_from(self.config.ttl)
            .ok()
            .filter(|period| !period.is_zero())
            .unwrap_or(std::time::Duration::from_secs(300));
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;

            match self.purge_expired() {
                Ok(0) => {}
                Ok(removed) => tracing::debug!("Purged {removed} expired idempotency entries"),
                Err(error) => {
                    tracing::error!("Stopping the idempotency sweeper: {error}");
                    return;
                }
            }
        }
    }

    /// The number of stored entries, including expired ones not yet evicted.
    ///
    /// # Errors
    /// Returns [Error::LockPoisoned] if the map lock was poisoned.
    pub fn len(&self) -> Result<usize, Error> {
        Ok(self.lock()?.len())
    }

    fn is_live(&self, entry: &CacheEntry, now: OffsetDateTime) -> bool {
        now - entry.created_at <= self.config.ttl
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, CacheEntry>>, Error> {
        self.entries
            .lock()
            .map_err(|_| Error::LockPoisoned("idempotency cache"))
    }
}
